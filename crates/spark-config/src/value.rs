use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, Serializer};

/// 属性的声明类型标签。
///
/// ### 设计目标（Why）
/// - 以显式枚举承载运行期类型信息，读写两侧都在 API 边界上直接比较标签，无需反射；
/// - 枚举类属性以类型名区分，`Region` 与 `Iaas` 即便变体文本相同也不会互相兼容。
///
/// ### 契约说明（What）
/// - `Enum` 中的名称通常来自 [`property_enum!`](crate::property_enum) 生成的 `TYPE_NAME`，
///   使用 `Cow` 允许常量与动态构造并存；
/// - 实现 `Eq + Hash`，可直接参与比较与映射。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ValueType {
    Text,
    Integer,
    Boolean,
    Enum(Cow<'static, str>),
}

impl ValueType {
    /// 构造枚举类属性的类型标签。
    #[inline]
    pub fn enumeration<N>(type_name: N) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        Self::Enum(type_name.into())
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("string"),
            Self::Integer => f.write_str("integer"),
            Self::Boolean => f.write_str("boolean"),
            Self::Enum(name) => write!(f, "enum<{name}>"),
        }
    }
}

/// 携带声明类型的配置值。
///
/// ### 设计目标（Why）
/// - 属性表中只存放这一种值类型，读者每次拿到的都是一个完整的克隆，不存在“新键旧值”的撕裂组合；
/// - 枚举类属性同时记录类型名与变体文本，既能做类型校验，也能原样输出到诊断快照。
///
/// ### 契约说明（What）
/// - [`TypedValue::value_type`] 返回的标签即该值的声明类型；
/// - `Integer` 以 `i64` 存储，写入与读取之间不发生精度损失；
/// - 序列化时输出原生标量（字符串、整数、布尔），枚举输出变体文本。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TypedValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    Enum {
        type_name: Cow<'static, str>,
        variant: Cow<'static, str>,
    },
}

impl TypedValue {
    /// 构造字符串值。
    #[inline]
    pub fn text<S>(value: S) -> Self
    where
        S: Into<String>,
    {
        Self::Text(value.into())
    }

    /// 构造枚举类值。
    #[inline]
    pub fn enumeration<N, V>(type_name: N, variant: V) -> Self
    where
        N: Into<Cow<'static, str>>,
        V: Into<Cow<'static, str>>,
    {
        Self::Enum {
            type_name: type_name.into(),
            variant: variant.into(),
        }
    }

    /// 返回该值的声明类型。
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Text(_) => ValueType::Text,
            Self::Integer(_) => ValueType::Integer,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Enum { type_name, .. } => ValueType::Enum(type_name.clone()),
        }
    }

    /// 判断该值是否属于给定类型，不产生任何分配。
    ///
    /// 读路径在持有读锁期间调用，因此刻意避免构造临时的 [`ValueType`]。
    pub fn is_type(&self, expected: &ValueType) -> bool {
        match (self, expected) {
            (Self::Text(_), ValueType::Text)
            | (Self::Integer(_), ValueType::Integer)
            | (Self::Boolean(_), ValueType::Boolean) => true,
            (Self::Enum { type_name, .. }, ValueType::Enum(expected)) => type_name == expected,
            _ => false,
        }
    }

    /// 两个值是否具有相同的声明类型。
    pub fn same_type_as(&self, other: &TypedValue) -> bool {
        match (self, other) {
            (Self::Text(_), Self::Text(_))
            | (Self::Integer(_), Self::Integer(_))
            | (Self::Boolean(_), Self::Boolean(_)) => true,
            (Self::Enum { type_name: lhs, .. }, Self::Enum { type_name: rhs, .. }) => lhs == rhs,
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// 若该值是 `type_name` 类型的枚举，返回其变体文本。
    pub fn as_variant(&self, type_name: &str) -> Option<&str> {
        match self {
            Self::Enum {
                type_name: actual,
                variant,
            } if actual == type_name => Some(variant),
            _ => None,
        }
    }

    /// 将原始文本按声明类型解析为配置值。
    ///
    /// ### 契约说明（What）
    /// - 服务于启动期的文本覆盖（环境变量、系统属性），覆盖值总是字符串，需要对齐到基础层已声明的类型；
    /// - 布尔值大小写不敏感，仅接受 `true`/`false`；整数按十进制解析，允许首尾空白；
    /// - 枚举只记录变体文本，变体是否合法在读取时由具体的 Rust 枚举判定；
    /// - 解析失败返回 `None`，由调用方决定错误上下文。
    pub fn parse_as(expected: &ValueType, raw: &str) -> Option<Self> {
        match expected {
            ValueType::Text => Some(Self::Text(raw.to_owned())),
            ValueType::Integer => raw.trim().parse().ok().map(Self::Integer),
            ValueType::Boolean => {
                let raw = raw.trim();
                if raw.eq_ignore_ascii_case("true") {
                    Some(Self::Boolean(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Some(Self::Boolean(false))
                } else {
                    None
                }
            }
            ValueType::Enum(type_name) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    None
                } else {
                    Some(Self::enumeration(type_name.clone(), raw.to_owned()))
                }
            }
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Enum { variant, .. } => f.write_str(variant),
        }
    }
}

impl Serialize for TypedValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Text(value) => serializer.serialize_str(value),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Boolean(value) => serializer.serialize_bool(*value),
            Self::Enum { variant, .. } => serializer.serialize_str(variant),
        }
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for TypedValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// 可从配置存储中按类型提取的 Rust 类型。
///
/// ### 设计目标（Why）
/// - 让 `store.get::<T>()` 在编译期确定期望类型，运行期只比较一次标签；
/// - 以 `Into<TypedValue>` 作为父 trait，保证同一类型的读写两侧使用完全相同的标签。
///
/// ### 契约说明（What）
/// - `value_type` 必须与 `Into<TypedValue>` 产出值的 [`TypedValue::value_type`] 一致；
/// - `from_value` 只会在类型标签匹配后被调用；返回 `None` 表示值无法映射到该类型
///   （例如枚举变体不在 Rust 枚举中），由存储层转换为错误。
pub trait PropertyType: Into<TypedValue> + Sized {
    fn value_type() -> ValueType;

    fn from_value(value: &TypedValue) -> Option<Self>;
}

impl PropertyType for String {
    fn value_type() -> ValueType {
        ValueType::Text
    }

    fn from_value(value: &TypedValue) -> Option<Self> {
        value.as_text().map(str::to_owned)
    }
}

impl PropertyType for i64 {
    fn value_type() -> ValueType {
        ValueType::Integer
    }

    fn from_value(value: &TypedValue) -> Option<Self> {
        value.as_integer()
    }
}

impl PropertyType for bool {
    fn value_type() -> ValueType {
        ValueType::Boolean
    }

    fn from_value(value: &TypedValue) -> Option<Self> {
        value.as_bool()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::property_enum! {
        enum Region {
            EuNorth1 => "EU_NORTH_1",
            UsEast1 => "US_EAST_1",
        }
    }

    crate::property_enum! {
        enum Zone {
            EuNorth1 => "EU_NORTH_1",
        }
    }

    #[test]
    fn type_tags_match_only_their_own_kind() {
        assert!(TypedValue::text("Mike").is_type(&ValueType::Text));
        assert!(!TypedValue::Integer(1).is_type(&ValueType::Text));
        assert!(TypedValue::Boolean(true).same_type_as(&TypedValue::Boolean(false)));
        assert!(!TypedValue::Boolean(true).same_type_as(&TypedValue::Integer(1)));
    }

    #[test]
    fn enum_types_are_distinguished_by_name() {
        let region = Region::EuNorth1.into();
        let zone: TypedValue = Zone::EuNorth1.into();

        assert!(!zone.same_type_as(&region));
        assert!(region.is_type(&Region::value_type()));
        assert!(!region.is_type(&Zone::value_type()));
        assert_eq!(Region::from_value(&region), Some(Region::EuNorth1));
        assert_eq!(Region::from_value(&zone), None);
    }

    #[test]
    fn unknown_variant_is_not_extracted() {
        let value = TypedValue::enumeration(Region::TYPE_NAME, "AP_SOUTH_9");
        assert!(value.is_type(&Region::value_type()));
        assert_eq!(Region::from_value(&value), None);
    }

    #[test]
    fn parse_as_follows_declared_type() {
        assert_eq!(
            TypedValue::parse_as(&ValueType::Integer, " 42 "),
            Some(TypedValue::Integer(42))
        );
        assert_eq!(
            TypedValue::parse_as(&ValueType::Boolean, "TRUE"),
            Some(TypedValue::Boolean(true))
        );
        assert_eq!(TypedValue::parse_as(&ValueType::Boolean, "yes"), None);
        assert_eq!(TypedValue::parse_as(&ValueType::Integer, "4x"), None);
        assert_eq!(
            TypedValue::parse_as(&Region::value_type(), "US_EAST_1"),
            Some(Region::UsEast1.into())
        );
        assert_eq!(
            TypedValue::parse_as(&ValueType::Text, " aws "),
            Some(TypedValue::text(" aws "))
        );
    }

    #[test]
    fn display_and_serialize_render_plain_scalars() {
        assert_eq!(ValueType::enumeration("Region").to_string(), "enum<Region>");
        assert_eq!(TypedValue::from(Region::EuNorth1).to_string(), "EU_NORTH_1");

        let rendered = serde_json::to_string(&vec![
            TypedValue::text("aws"),
            TypedValue::Integer(-7),
            TypedValue::Boolean(false),
            Region::UsEast1.into(),
        ])
        .expect("scalar values always serialize");
        assert_eq!(rendered, r#"["aws",-7,false,"US_EAST_1"]"#);
    }
}
