//! 条件性读写锁适配层。
//!
//! # 设计初衷（Why）
//! - 常规构建直接复用 `parking_lot::RwLock`：读者共享进入，等待中的写者会阻止新读者进入，读写双方都不会饿死；
//! - `--cfg loom` / `--cfg spark_loom` 构建切换到 Loom 的模型锁，使并发测试可以穷举调度交错。
//!
//! # 契约说明（What）
//! - 两种实现暴露同一组方法：`new`、`read`、`write`，守卫直接解引用为内部数据；
//! - Loom 锁的中毒状态被忽略：写临界区内不存在会 panic 的半完成修改。

#[cfg(not(any(loom, spark_loom)))]
pub(crate) use parking_lot::RwLock;

#[cfg(any(loom, spark_loom))]
pub(crate) use loom_shim::RwLock;

#[cfg(any(loom, spark_loom))]
mod loom_shim {
    use std::sync::PoisonError;

    use loom::sync::{RwLockReadGuard, RwLockWriteGuard};

    pub(crate) struct RwLock<T> {
        inner: loom::sync::RwLock<T>,
    }

    impl<T> RwLock<T> {
        pub(crate) fn new(value: T) -> Self {
            Self {
                inner: loom::sync::RwLock::new(value),
            }
        }

        pub(crate) fn read(&self) -> RwLockReadGuard<'_, T> {
            self.inner.read().unwrap_or_else(PoisonError::into_inner)
        }

        pub(crate) fn write(&self) -> RwLockWriteGuard<'_, T> {
            self.inner.write().unwrap_or_else(PoisonError::into_inner)
        }
    }
}
