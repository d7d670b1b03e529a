//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 配置存储的失败全部是调用方或配置本身的错误（缺失属性、类型不一致），同步返回、从不内部重试；
//! - 集中定义错误枚举，使调用方可以按类别匹配，也便于日志中输出稳定错误码。
//!
//! ## 设计要求（What）
//! - 所有错误类型派生 `thiserror::Error`，且满足 `Send + Sync + 'static`；
//! - [`ConfigErrorKind::as_str`] 提供 `config.*` 前缀的稳定错误码。

use std::fmt;

use thiserror::Error;

use crate::value::ValueType;

/// 配置存储的统一错误类型。
///
/// # 教案式说明
/// - **意图 (Why)**：以显式结果值取代异常传播，调用方必须处理缺失与类型不一致两类硬错误；
/// - **契约 (What)**：
///   - `MissingProperty`：属性不存在且调用方未提供默认值；
///   - `TypeMismatch`：读取时期望类型与声明类型不符，或写入试图改变声明类型；写入被拒绝时旧值保持不变；
///   - `InvalidVariant`：声明类型匹配，但存储的枚举文本不属于调用方的 Rust 枚举；
///   - `InvalidSeed`：启动装配阶段某一层试图改变下层已声明的类型，或覆盖文本无法解析；
///   - `AlreadyInstalled`：进程级存储已被安装或初始化，禁止再次安装。
/// - **设计权衡 (Trade-offs)**：上下文使用 `String` 保存，错误路径上的少量分配换取可读的诊断信息。
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("property `{name}` is not defined and no default was supplied")]
    MissingProperty { name: String },

    #[error("property `{name}` is declared as {declared}, but {requested} was supplied")]
    TypeMismatch {
        name: String,
        declared: ValueType,
        requested: ValueType,
    },

    #[error("property `{name}` holds `{variant}`, which is not a variant of {type_name}")]
    InvalidVariant {
        name: String,
        type_name: String,
        variant: String,
    },

    #[error("seed layer `{layer}` rejected property `{name}`: {detail}")]
    InvalidSeed {
        layer: String,
        name: String,
        detail: String,
    },

    #[error("the process-wide configuration store is already installed")]
    AlreadyInstalled,
}

impl ConfigError {
    /// 返回错误类别。
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            Self::MissingProperty { .. } => ConfigErrorKind::MissingProperty,
            Self::TypeMismatch { .. } => ConfigErrorKind::TypeMismatch,
            Self::InvalidVariant { .. } => ConfigErrorKind::InvalidVariant,
            Self::InvalidSeed { .. } => ConfigErrorKind::InvalidSeed,
            Self::AlreadyInstalled => ConfigErrorKind::AlreadyInstalled,
        }
    }

    /// 错误涉及的属性名；与具体属性无关的错误返回 `None`。
    pub fn property(&self) -> Option<&str> {
        match self {
            Self::MissingProperty { name }
            | Self::TypeMismatch { name, .. }
            | Self::InvalidVariant { name, .. }
            | Self::InvalidSeed { name, .. } => Some(name),
            Self::AlreadyInstalled => None,
        }
    }

    pub(crate) fn missing(name: &str) -> Self {
        Self::MissingProperty {
            name: name.to_owned(),
        }
    }

    pub(crate) fn mismatch(name: &str, declared: ValueType, requested: ValueType) -> Self {
        Self::TypeMismatch {
            name: name.to_owned(),
            declared,
            requested,
        }
    }
}

/// 错误类别，便于按类匹配与上报。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ConfigErrorKind {
    MissingProperty,
    TypeMismatch,
    InvalidVariant,
    InvalidSeed,
    AlreadyInstalled,
}

impl ConfigErrorKind {
    /// 稳定错误码。
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingProperty => "config.property.missing",
            Self::TypeMismatch => "config.property.type_mismatch",
            Self::InvalidVariant => "config.property.invalid_variant",
            Self::InvalidSeed => "config.seed.invalid",
            Self::AlreadyInstalled => "config.store.already_installed",
        }
    }
}

impl fmt::Display for ConfigErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// crate 内统一使用的结果别名。
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

const _: fn() = || {
    fn assert_error_traits<T: std::error::Error + Send + Sync + 'static>() {}

    assert_error_traits::<ConfigError>();
};
