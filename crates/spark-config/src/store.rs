//! # ConfigStore：读多写少的强类型配置存储
//!
//! ## 核心意图（Why）
//! - 大量工作线程持续读取同名属性，写入只在极少数时刻发生，且时间点不可预测；
//! - 读者永远只能看到一个完整的值（写入前或写入后），不能看到撕裂的组合；
//! - 写入一旦返回，之后发起的全部读取都必须观察到新值。
//!
//! ## 并发纪律（How）
//! - 属性表由单把读写锁保护：`get` 与 `check_all_config` 走共享读锁，读者之间互不排斥；
//! - `set` 走独占写锁，每次只替换一个条目，写者之间串行；
//! - `parking_lot::RwLock` 在有写者等待时阻止新读者进入，已进入的读者带着它们观察到的值完成；
//!   写锁释放即提交，之后获取读锁的读者必然看到新值，单个属性上的读写因此可线性化。
//!
//! ## 行为契约（What）
//! - `get`：缺失且有默认值 → 返回默认值；缺失且无默认值 → `MissingProperty`；
//!   存在但类型不符 → `TypeMismatch`（即便提供了默认值）；
//! - `set`：若改变已有属性的声明类型 → `TypeMismatch`，旧值保留；否则原子插入或替换；
//! - 所有错误同步返回，从不在内部重试。
//!
//! ## 风险提示（Trade-offs）
//! - 读取返回值的克隆，字符串属性每次读取会分配一次；换来的是读者从不持有表内引用；
//! - 不保证跨属性的原子性：两次独立的 `set` 之间，读者可能看到一新一旧。快照在同一读锁内复制，
//!   因此快照内部相对任意单次 `set` 是一致的。

use std::fmt;
use std::sync::OnceLock;

use tracing::{debug, info, trace, warn};

use crate::error::{ConfigError, Result};
use crate::seed::{DeploymentProfile, StoreBuilder};
use crate::snapshot::ConfigSnapshot;
use crate::sync::RwLock;
use crate::table::PropertyTable;
use crate::value::{PropertyType, TypedValue, ValueType};

/// 进程级存储，仅初始化一次，进程退出前不会销毁。
static PROCESS_STORE: OnceLock<ConfigStore> = OnceLock::new();

/// 线程安全的强类型配置存储。
///
/// # 教案式注释
/// - **意图 (Why)**：封装属性表与读写锁，调用方无法绕过存储直接修改表，也拿不到表的引用；
/// - **契约 (What)**：`ConfigStore` 是 `Send + Sync`，可通过 `&'static` 单例或 `Arc` 在线程间共享；
/// - **风险 (Trade-offs)**：写入持锁期间会短暂阻塞新读者，写入本身只是一次哈希表替换，持锁时间极短。
pub struct ConfigStore {
    table: RwLock<PropertyTable>,
}

impl ConfigStore {
    /// 创建空存储。
    pub fn new() -> Self {
        Self::from_table(PropertyTable::new())
    }

    pub(crate) fn from_table(table: PropertyTable) -> Self {
        Self {
            table: RwLock::new(table),
        }
    }

    /// 返回用于分层装配的构建器。
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// 将装配好的存储安装为进程级单例。
    ///
    /// # 教案式注释
    /// - **意图 (Why)**：启动流程在第一次读取之前完成种子装配，然后一次性发布给全部线程；
    /// - **契约 (What)**：
    ///   - 成功返回 `&'static ConfigStore`，之后 [`ConfigStore::global`] 返回同一实例；
    ///   - 若单例已被安装，或已被 `global` 按默认方式初始化，返回 [`ConfigError::AlreadyInstalled`]，
    ///     传入的存储被丢弃；
    /// - **执行 (How)**：基于 `OnceLock::set`，并发安装时恰好一个调用方成功。
    pub fn install(store: ConfigStore) -> Result<&'static ConfigStore> {
        PROCESS_STORE
            .set(store)
            .map_err(|_| ConfigError::AlreadyInstalled)?;
        let installed = PROCESS_STORE.get().ok_or(ConfigError::AlreadyInstalled)?;
        info!(
            properties = installed.len(),
            "process configuration store installed"
        );
        Ok(installed)
    }

    /// 获取进程级单例。
    ///
    /// # 教案式注释
    /// - **意图 (Why)**：调用方无需关心初始化时序，首次访问时线程安全地完成惰性初始化；
    /// - **契约 (What)**：若此前未调用 [`ConfigStore::install`]，则以环境变量中的部署档案
    ///   （`iaas`/`env`/`region`）装配一个默认存储；初始化恰好发生一次；
    /// - **风险 (Trade-offs)**：默认装配只有一层纯字符串种子，不会失败；若未来引入会失败的默认层，
    ///   失败时退化为空存储并记录告警，不在单例初始化路径上 panic。
    pub fn global() -> &'static ConfigStore {
        PROCESS_STORE.get_or_init(|| {
            let profile = DeploymentProfile::from_env();
            let store = StoreBuilder::new()
                .with_profile(profile)
                .build()
                .unwrap_or_else(|err| {
                    warn!(error = %err, "default configuration seed rejected, starting empty");
                    ConfigStore::new()
                });
            info!(
                properties = store.len(),
                "process configuration store initialized from environment"
            );
            store
        })
    }

    /// 按期望类型读取属性值。
    ///
    /// # 教案式注释
    /// - **意图 (Why)**：对应无泛型的核心读取契约，类型标签在运行期给出；
    /// - **契约 (What)**：
    ///   - 属性缺失：有 `default` 且其类型为 `expected` 时原样返回，属性表不受影响；
    ///     `default` 类型不符返回 `TypeMismatch`；无 `default` 返回 `MissingProperty`；
    ///   - 属性存在但声明类型不是 `expected`：返回 `TypeMismatch`；
    ///   - 否则返回存储值的克隆；
    /// - **执行 (How)**：共享读锁内只做一次哈希查找与克隆，缺失分支的日志在释放锁之后输出。
    pub fn get_value(
        &self,
        name: &str,
        expected: &ValueType,
        default: Option<TypedValue>,
    ) -> Result<TypedValue> {
        let found = {
            let table = self.table.read();
            table.get(name).map(|value| {
                if value.is_type(expected) {
                    Ok(value.clone())
                } else {
                    Err(ConfigError::mismatch(
                        name,
                        value.value_type(),
                        expected.clone(),
                    ))
                }
            })
        };

        match (found, default) {
            (Some(result), _) => result,
            (None, Some(value)) if !value.is_type(expected) => Err(ConfigError::mismatch(
                name,
                value.value_type(),
                expected.clone(),
            )),
            (None, default) => resolve_missing(name, default),
        }
    }

    /// 泛型读取：期望类型由 `T` 在编译期确定。
    ///
    /// 除 [`ConfigStore::get_value`] 的规则外，若枚举属性存储的文本不属于 `T` 的任何变体，
    /// 返回 [`ConfigError::InvalidVariant`]。
    pub fn get<T>(&self, name: &str, default: Option<T>) -> Result<T>
    where
        T: PropertyType,
    {
        let expected = T::value_type();
        let found = {
            let table = self.table.read();
            table.get(name).map(|value| {
                if value.is_type(&expected) {
                    T::from_value(value).ok_or_else(|| invalid_variant(name, &expected, value))
                } else {
                    Err(ConfigError::mismatch(
                        name,
                        value.value_type(),
                        expected.clone(),
                    ))
                }
            })
        };

        match found {
            Some(result) => result,
            None => resolve_missing(name, default),
        }
    }

    /// 读取字符串属性。
    pub fn get_string(&self, name: &str, default: Option<&str>) -> Result<String> {
        self.get(name, default.map(str::to_owned))
    }

    /// 读取整数属性。
    pub fn get_integer(&self, name: &str, default: Option<i64>) -> Result<i64> {
        self.get(name, default)
    }

    /// 读取布尔属性。
    pub fn get_bool(&self, name: &str, default: Option<bool>) -> Result<bool> {
        self.get(name, default)
    }

    /// 读取由 [`property_enum!`](crate::property_enum) 声明的枚举属性。
    pub fn get_enum<E>(&self, name: &str, default: Option<E>) -> Result<E>
    where
        E: PropertyType,
    {
        self.get(name, default)
    }

    /// 写入属性值。
    ///
    /// # 教案式注释
    /// - **意图 (Why)**：运行期热更新的唯一入口，属性表只能经由此处修改；
    /// - **契约 (What)**：
    ///   - 若属性已存在且声明类型不同，返回 `TypeMismatch`，旧值保持不变；
    ///   - 否则原子地插入或替换条目，返回被替换的旧值（新属性返回 `None`）；
    ///   - 返回之后发起的所有读取都会观察到新值；
    /// - **执行 (How)**：获取独占写锁，锁内完成类型校验与替换，日志在释放锁之后输出。
    pub fn set<V>(&self, name: &str, value: V) -> Result<Option<TypedValue>>
    where
        V: Into<TypedValue>,
    {
        let value = value.into();
        let mut table = self.table.write();
        let outcome = table.commit(name, value);
        let revision = table.revision();
        drop(table);

        match &outcome {
            Ok(previous) => debug!(
                property = name,
                revision,
                replaced = previous.is_some(),
                "configuration property committed"
            ),
            Err(err) => warn!(property = name, error = %err, "configuration write rejected"),
        }
        outcome
    }

    /// 生成整个属性表的只读快照。
    ///
    /// # 教案式注释
    /// - **意图 (Why)**：面向巡检的“全量查看”，相对任意单次 `set` 是一次原子的整体读取；
    /// - **契约 (What)**：返回的 [`ConfigSnapshot`] 与存储完全独立，之后的写入不会影响它；
    /// - **风险 (Trade-offs)**：复制期间持有读锁，写者最多等待一次全表克隆的时间，不会被无限期阻塞。
    pub fn check_all_config(&self) -> ConfigSnapshot {
        let table = self.table.read();
        ConfigSnapshot::capture(&table)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.read().get(name).is_some()
    }

    /// 返回属性的声明类型；属性不存在时返回 `None`。
    pub fn declared_type(&self, name: &str) -> Option<ValueType> {
        self.table.read().get(name).map(TypedValue::value_type)
    }

    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 装配完成后已提交的写入次数。
    pub fn revision(&self) -> u64 {
        self.table.read().revision()
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.read();
        f.debug_struct("ConfigStore")
            .field("properties", &table.len())
            .field("revision", &table.revision())
            .finish()
    }
}

fn resolve_missing<T>(name: &str, default: Option<T>) -> Result<T> {
    match default {
        Some(value) => Ok(value),
        None => {
            trace!(property = name, "configuration property missing");
            Err(ConfigError::missing(name))
        }
    }
}

fn invalid_variant(name: &str, expected: &ValueType, value: &TypedValue) -> ConfigError {
    ConfigError::InvalidVariant {
        name: name.to_owned(),
        type_name: expected.to_string(),
        variant: value.to_string(),
    }
}
