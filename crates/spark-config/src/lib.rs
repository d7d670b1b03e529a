#![deny(unsafe_code)]
#![doc = "spark-config: 进程内强类型、读多写少的热更新配置存储。"]
#![doc = ""]
#![doc = "启动阶段由分层种子（基础配置 + `iaas`/`env`/`region` 等部署覆盖）构建出唯一的属性表，"]
#![doc = "运行期间由大量线程并发读取，并容忍零星的在线写入。"]

//! # 模块导览
//!
//! ## 定位与职责（Why）
//! - 读路径占绝对多数：`get` 只获取共享读锁并克隆单个值，读者之间互不排斥；
//! - 写路径极少出现：`set` 获取独占写锁，原子替换单个条目，写入提交后新发起的读取立即可见；
//! - 属性一经写入即确定其“声明类型”，之后任何改变类型的写入都会被拒绝，旧值保持不变。
//!
//! ## 结构（How）
//! - `value`：[`TypedValue`] 与 [`ValueType`]，以及面向调用方的 [`PropertyType`] 提取契约；
//! - `table`：属性表本体，仅在 crate 内部可见，不向外暴露引用；
//! - `store`：[`ConfigStore`] 读写 API 与进程级单例；
//! - `snapshot`：[`ConfigSnapshot`] 只读快照，按名称字典序稳定迭代；
//! - `seed`：[`StoreBuilder`]、[`SeedLayer`] 与 [`DeploymentProfile`]，负责启动期的一次性装配；
//! - `error`：统一错误类型 [`ConfigError`]。
//!
//! ## 使用方式（What）
//! ```
//! use spark_config::{ConfigError, ConfigStore, SeedLayer};
//!
//! let store = ConfigStore::builder()
//!     .layer(SeedLayer::new("base").with("name", "Mike"))
//!     .build()?;
//!
//! assert_eq!(store.get_string("name", None)?, "Mike");
//! store.set("name", "Jessica")?;
//! assert_eq!(store.get_string("name", None)?, "Jessica");
//! assert!(matches!(store.set("name", 1), Err(ConfigError::TypeMismatch { .. })));
//! # Ok::<(), spark_config::ConfigError>(())
//! ```

#[macro_use]
mod macros;

mod error;
mod seed;
mod snapshot;
mod store;
mod sync;
mod table;
mod value;

pub use error::{ConfigError, ConfigErrorKind, Result};
pub use seed::{DeploymentProfile, SeedLayer, StoreBuilder};
pub use snapshot::ConfigSnapshot;
pub use store::ConfigStore;
pub use value::{PropertyType, TypedValue, ValueType};
