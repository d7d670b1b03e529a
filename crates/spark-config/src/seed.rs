//! # 启动期装配：分层种子与部署档案
//!
//! ## 设计目的（Why）
//! - 属性表必须在第一次读取之前就绪；种子来自若干层（基础配置、部署覆盖），由构建器一次性合并；
//! - 部署档案（`iaas`/`env`/`region`）来自进程环境，以原始文本形式覆盖基础层，并对齐到基础层已声明的类型。
//!
//! ## 合并规则（How）
//! - 层按注册顺序自下而上应用，后注册的层覆盖先注册的层（基础在前，覆盖在后）；
//! - 强类型条目必须与下层已声明的类型一致；文本条目按下层声明类型解析，下层未声明时视为字符串；
//! - 任一冲突都会使构建失败并返回 [`ConfigError::InvalidSeed`]，不会产出半装配的存储。

use std::borrow::Cow;

use tracing::info;

use crate::error::{ConfigError, Result};
use crate::store::ConfigStore;
use crate::table::PropertyTable;
use crate::value::TypedValue;

#[derive(Clone, Debug, PartialEq, Eq)]
enum SeedValue {
    Typed(TypedValue),
    Raw(String),
}

/// 单个种子层。
///
/// ### 契约说明（What）
/// - `name` 仅用于错误上下文与日志，例如 `"base"`、`"deployment-profile"`；
/// - 同一层内重复的属性名以最后一次为准，但仍受类型一致性约束。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedLayer {
    name: Cow<'static, str>,
    entries: Vec<(String, SeedValue)>,
}

impl SeedLayer {
    pub fn new<N>(name: N) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// 追加一个强类型条目。
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<TypedValue>,
    {
        self.insert(key, value);
        self
    }

    /// 追加一个原始文本条目，构建时按下层声明的类型解析。
    pub fn with_raw<K, V>(mut self, key: K, raw: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.entries.push((key.into(), SeedValue::Raw(raw.into())));
        self
    }

    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<TypedValue>,
    {
        self.entries
            .push((key.into(), SeedValue::Typed(value.into())));
    }

    /// 由 `key=value` 形式的覆盖对构造文本层。
    pub fn from_overrides<N, I, K, V>(name: N, overrides: I) -> Self
    where
        N: Into<Cow<'static, str>>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        overrides
            .into_iter()
            .fold(Self::new(name), |layer, (key, raw)| layer.with_raw(key, raw))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn apply(self, table: &mut PropertyTable) -> Result<()> {
        let layer = self.name;
        for (key, entry) in self.entries {
            let value = match entry {
                SeedValue::Typed(value) => value,
                SeedValue::Raw(raw) => match table.get(&key).map(TypedValue::value_type) {
                    Some(declared) => {
                        TypedValue::parse_as(&declared, &raw).ok_or_else(|| {
                            ConfigError::InvalidSeed {
                                layer: layer.to_string(),
                                name: key.clone(),
                                detail: format!("`{raw}` is not a valid {declared}"),
                            }
                        })?
                    }
                    None => TypedValue::Text(raw),
                },
            };
            table
                .replace(&key, value)
                .map_err(|err| ConfigError::InvalidSeed {
                    layer: layer.to_string(),
                    name: key.clone(),
                    detail: err.to_string(),
                })?;
        }
        Ok(())
    }
}

/// 进程的部署档案。
///
/// # 教案式说明
/// - **意图 (Why)**：同一套配置在不同云厂商、环境、区域之间只差少量覆盖，三者在启动时一次性读入；
/// - **契约 (What)**：
///   - 依次查找小写名 `iaas`/`env`/`region`，再回退到大写名 `IAAS`/`ENV`/`REGION`；
///   - 空白值视为未设置；未设置时分别取默认值 `local`、`dev`、`LOCAL`；
/// - **执行 (How)**：[`DeploymentProfile::from_lookup`] 接受任意查找函数，测试无需修改进程环境。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentProfile {
    pub iaas: String,
    pub env: String,
    pub region: String,
}

impl DeploymentProfile {
    pub const IAAS_KEY: &'static str = "iaas";
    pub const ENV_KEY: &'static str = "env";
    pub const REGION_KEY: &'static str = "region";

    pub const DEFAULT_IAAS: &'static str = "local";
    pub const DEFAULT_ENV: &'static str = "dev";
    pub const DEFAULT_REGION: &'static str = "LOCAL";

    /// 覆盖层在错误与日志中使用的名称。
    pub const LAYER_NAME: &'static str = "deployment-profile";

    pub fn new<I, E, R>(iaas: I, env: E, region: R) -> Self
    where
        I: Into<String>,
        E: Into<String>,
        R: Into<String>,
    {
        Self {
            iaas: iaas.into(),
            env: env.into(),
            region: region.into(),
        }
    }

    /// 从进程环境变量读取。
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过给定的查找函数读取。
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .or_else(|| {
                    lookup(&key.to_ascii_uppercase()).filter(|value| !value.trim().is_empty())
                })
                .map(|value| value.trim().to_owned())
                .unwrap_or_else(|| default.to_owned())
        };

        Self {
            iaas: resolve(Self::IAAS_KEY, Self::DEFAULT_IAAS),
            env: resolve(Self::ENV_KEY, Self::DEFAULT_ENV),
            region: resolve(Self::REGION_KEY, Self::DEFAULT_REGION),
        }
    }

    /// 转换为文本覆盖层。
    pub fn into_layer(self) -> SeedLayer {
        SeedLayer::new(Self::LAYER_NAME)
            .with_raw(Self::IAAS_KEY, self.iaas)
            .with_raw(Self::ENV_KEY, self.env)
            .with_raw(Self::REGION_KEY, self.region)
    }
}

/// 分层装配 [`ConfigStore`] 的构建器。
///
/// ```
/// use spark_config::{ConfigStore, DeploymentProfile, SeedLayer};
///
/// let store = ConfigStore::builder()
///     .layer(SeedLayer::new("base").with("name", "Mike").with("replicas", 3))
///     .layer(SeedLayer::from_overrides("cli", [("replicas", "5")]))
///     .with_profile(DeploymentProfile::new("aws", "dev", "EU_NORTH_1"))
///     .build()?;
///
/// assert_eq!(store.get_integer("replicas", None)?, 5);
/// assert_eq!(store.get_string("iaas", None)?, "aws");
/// # Ok::<(), spark_config::ConfigError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct StoreBuilder {
    layers: Vec<SeedLayer>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个种子层；后注册的层优先级更高。
    pub fn layer(mut self, layer: SeedLayer) -> Self {
        self.layers.push(layer);
        self
    }

    /// 以部署档案作为当前最高优先级的覆盖层。
    pub fn with_profile(self, profile: DeploymentProfile) -> Self {
        self.layer(profile.into_layer())
    }

    /// 按顺序合并全部层并产出存储。
    ///
    /// 任一层冲突时返回 [`ConfigError::InvalidSeed`]；装配写入不计入修订号。
    pub fn build(self) -> Result<ConfigStore> {
        let layers = self.layers.len();
        let mut table = PropertyTable::new();
        for layer in self.layers {
            layer.apply(&mut table)?;
        }
        info!(
            layers,
            properties = table.len(),
            "configuration seed assembled"
        );
        Ok(ConfigStore::from_table(table))
    }
}
