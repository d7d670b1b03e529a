//! 属性表：名称到 [`TypedValue`] 的映射，是存储中唯一的共享可变状态。
//!
//! 仅在 crate 内可见，所有访问都经由 [`ConfigStore`](crate::ConfigStore) 的读写锁完成；
//! 外部只会拿到值的克隆或 [`ConfigSnapshot`](crate::ConfigSnapshot)。

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ConfigError, Result};
use crate::value::TypedValue;

#[derive(Clone, Debug, Default)]
pub(crate) struct PropertyTable {
    entries: HashMap<Arc<str>, TypedValue>,
    // 自装配完成后提交的写入次数。
    revision: u64,
}

impl PropertyTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn get(&self, name: &str) -> Option<&TypedValue> {
        self.entries.get(name)
    }

    /// 插入或替换条目，不推进修订号；供启动装配使用。
    ///
    /// 已存在的条目若声明类型不同则返回 `TypeMismatch`，表保持原样。
    pub(crate) fn replace(&mut self, name: &str, value: TypedValue) -> Result<Option<TypedValue>> {
        if let Some(slot) = self.entries.get_mut(name) {
            if !slot.same_type_as(&value) {
                return Err(ConfigError::mismatch(
                    name,
                    slot.value_type(),
                    value.value_type(),
                ));
            }
            return Ok(Some(std::mem::replace(slot, value)));
        }

        self.entries.insert(Arc::from(name), value);
        Ok(None)
    }

    /// 运行期写入：替换成功后推进修订号。
    pub(crate) fn commit(&mut self, name: &str, value: TypedValue) -> Result<Option<TypedValue>> {
        let previous = self.replace(name, value)?;
        self.revision += 1;
        Ok(previous)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &TypedValue)> {
        self.entries.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }
}
