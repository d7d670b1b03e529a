/// 声明一个枚举类配置属性。
///
/// # 教案式说明
/// - **意图 (Why)**：`region=EU_NORTH_1` 这类属性本质是受限字符串，业务侧更希望直接拿到 Rust 枚举；
/// - **契约 (What)**：每个变体绑定一个稳定文本，宏会生成：
///   - `TYPE_NAME`：类型名，作为 [`ValueType::Enum`](crate::ValueType::Enum) 的标签；
///   - `as_str` / `parse`：变体与文本互转；
///   - [`PropertyType`](crate::PropertyType) 与 `From<Self> for TypedValue` 实现；
/// - **执行 (How)**：宏展开时自动派生 `Clone, Copy, Debug, PartialEq, Eq, Hash`，调用方只需补充额外属性。
///
/// ```
/// spark_config::property_enum! {
///     /// 部署区域。
///     pub enum Region {
///         EuNorth1 => "EU_NORTH_1",
///         UsEast1 => "US_EAST_1",
///     }
/// }
///
/// let store = spark_config::ConfigStore::new();
/// store.set("region", Region::EuNorth1)?;
/// assert_eq!(store.get::<Region>("region", None)?, Region::EuNorth1);
/// # Ok::<(), spark_config::ConfigError>(())
/// ```
#[macro_export]
macro_rules! property_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$variant_meta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$variant_meta])* $variant ),+
        }

        impl $name {
            /// 作为声明类型标签使用的类型名。
            pub const TYPE_NAME: &'static str = ::core::stringify!($name);

            /// 返回变体绑定的稳定文本。
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }

            /// 根据稳定文本解析变体。
            pub fn parse(text: &str) -> ::core::option::Option<Self> {
                match text {
                    $( $text => ::core::option::Option::Some(Self::$variant), )+
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::core::convert::From<$name> for $crate::TypedValue {
            fn from(value: $name) -> Self {
                $crate::TypedValue::enumeration($name::TYPE_NAME, value.as_str())
            }
        }

        impl $crate::PropertyType for $name {
            fn value_type() -> $crate::ValueType {
                $crate::ValueType::enumeration($name::TYPE_NAME)
            }

            fn from_value(value: &$crate::TypedValue) -> ::core::option::Option<Self> {
                value.as_variant($name::TYPE_NAME).and_then($name::parse)
            }
        }
    };
}
