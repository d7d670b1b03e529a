use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::table::PropertyTable;
use crate::value::TypedValue;

/// 配置存储在某一时刻的只读快照。
///
/// ### 设计目标（Why）
/// - 为巡检与诊断日志提供完整、稳定的属性视图，且不持有任何指向存储内部的引用；
/// - 快照创建之后，存储上的任何写入都不会影响其内容。
///
/// ### 契约说明（What）
/// - 迭代顺序按属性名字典序，保证多次渲染结果可复现；
/// - `revision` 记录快照对应的存储修订号，即装配完成后已提交的写入次数；
/// - 序列化为扁平的 `名称 -> 标量` 映射，具体输出格式由调用方选择。
///
/// ### 实现细节（How）
/// - 在读锁内一次性复制全部条目，因此快照相对于任意单次 `set` 都是原子的；
/// - 属性名以 `Arc<str>` 共享，复制条目时不会重新分配键。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
    revision: u64,
    entries: BTreeMap<Arc<str>, TypedValue>,
}

impl ConfigSnapshot {
    pub(crate) fn capture(table: &PropertyTable) -> Self {
        Self {
            revision: table.revision(),
            entries: table
                .iter()
                .map(|(name, value)| (Arc::clone(name), value.clone()))
                .collect(),
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按名称字典序遍历全部属性。
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_ref(), value))
    }

    /// 渲染为 JSON 对象，供诊断日志直接输出。
    #[cfg(feature = "std_json")]
    pub fn to_json(&self) -> serde_json::Value {
        let object = self
            .entries
            .iter()
            .map(|(name, value)| {
                let rendered = match value {
                    TypedValue::Text(text) => serde_json::Value::from(text.as_str()),
                    TypedValue::Integer(number) => serde_json::Value::from(*number),
                    TypedValue::Boolean(flag) => serde_json::Value::from(*flag),
                    TypedValue::Enum { variant, .. } => serde_json::Value::from(variant.as_ref()),
                };
                (name.to_string(), rendered)
            })
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(object)
    }
}

impl Serialize for ConfigSnapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}
