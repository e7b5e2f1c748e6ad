//! Helper macro for closed string-valued enums.
//!
//! Every status/priority/role/category column is stored as `TEXT` and
//! exchanged as a JSON string. The macro generates the enum together with
//! its wire representation so the two can never drift apart.

/// Define a closed enum whose variants map 1:1 onto fixed string values.
///
/// Generates `as_str`, `from_str_value`, `ALL`, `Display`, `FromStr`, and
/// `TryFrom<String>` (the latter is what `#[sqlx(try_from = "String")]`
/// uses when decoding rows).
macro_rules! define_str_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $val)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The stored / serialized string value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }

            /// Parse from the stored string value.
            pub fn from_str_value(s: &str) -> Result<Self, String> {
                match s {
                    $( $val => Ok($name::$variant), )+
                    _ => Err(format!(
                        "Invalid {} '{}'. Must be one of: {}",
                        stringify!($name),
                        s,
                        [$($val),+].join(", ")
                    )),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_str_value(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::from_str_value(&value)
            }
        }
    };
}
