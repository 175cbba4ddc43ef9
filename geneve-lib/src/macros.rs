// Generates a big-endian protocol number newtype with named constants,
// a strum-backed name table, conversions, Display and serde support.
#[macro_export]
macro_rules! protocol_constants {
    (
        $(#[$outer:meta])*
        $type_name:ident, $ztype:ty, $primitive:ident, default = $default:ident:
        $( $(#[$inner:meta])* $const_name:ident = $val:literal; )+
    ) => {
        paste::paste! {
            #[doc = concat!("A newtype wrapper around a big-endian ", stringify!($primitive), " protocol number.")]
            ///
            /// Known values have named constants and display as their kebab-case
            /// name; any other value is kept verbatim and displays as hex.
            $(#[$outer])*
            #[derive(
                Clone,
                Copy,
                PartialEq,
                Eq,
                Hash,
                Debug,
                FromBytes,
                IntoBytes,
                Immutable,
                KnownLayout,
                Unaligned,
            )]
            #[repr(transparent)]
            pub struct $type_name(pub $ztype);

            impl $type_name {
                $(
                    $(#[$inner])*
                    pub const $const_name: $type_name = $type_name(<$ztype>::new($val));
                )+

                /// Returns the raw protocol number.
                #[inline]
                pub fn get(&self) -> $primitive {
                    self.0.get()
                }

                /// Returns true if the value has a named constant.
                pub fn is_known(&self) -> bool {
                    [< $type_name Name >]::try_from(self.get()).is_ok()
                }

                /// Returns the kebab-case name of a known value.
                pub fn name(&self) -> Option<&'static str> {
                    [< $type_name Name >]::try_from(self.get()).ok().map(Into::into)
                }
            }

            impl Default for $type_name {
                #[inline]
                fn default() -> Self {
                    Self::$default
                }
            }

            #[derive(Debug, PartialEq, Clone, Copy, strum::EnumString, strum::IntoStaticStr)]
            #[strum(serialize_all = "kebab-case")]
            #[allow(non_camel_case_types)]
            enum [< $type_name Name >] {
                $( $const_name, )+
            }

            impl From<[< $type_name Name >]> for $primitive {
                fn from(v: [< $type_name Name >]) -> Self {
                    match v {
                        $( [< $type_name Name >]::$const_name => $val, )+
                    }
                }
            }

            impl TryFrom<$primitive> for [< $type_name Name >] {
                type Error = ();

                fn try_from(v: $primitive) -> Result<Self, Self::Error> {
                    match v {
                        $( $val => Ok([< $type_name Name >]::$const_name), )+
                        _ => Err(()),
                    }
                }
            }

            impl From<$primitive> for $type_name {
                #[inline]
                fn from(v: $primitive) -> Self {
                    Self(<$ztype>::new(v))
                }
            }

            impl From<$type_name> for $primitive {
                #[inline]
                fn from(v: $type_name) -> Self {
                    v.0.get()
                }
            }

            impl std::str::FromStr for $type_name {
                type Err = String;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    if let Ok(name) = s.parse::<[< $type_name Name >]>() {
                        return Ok(Self::from($primitive::from(name)));
                    }
                    if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                        return $primitive::from_str_radix(digits, 16)
                            .map(Self::from)
                            .map_err(|_| format!("invalid hex: {s}"));
                    }
                    Err(format!("unknown {}: {s}", stringify!($type_name)))
                }
            }

            impl std::fmt::Display for $type_name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    match self.name() {
                        Some(name) => f.write_str(name),
                        None => write!(f, "0x{:04x}", self.get()),
                    }
                }
            }

            #[cfg(feature = "protocol_names")]
            impl serde::Serialize for $type_name {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    serializer.collect_str(self)
                }
            }

            #[cfg(feature = "protocol_names")]
            impl<'de> serde::Deserialize<'de> for $type_name {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
                    s.parse().map_err(serde::de::Error::custom)
                }
            }

            #[cfg(not(feature = "protocol_names"))]
            impl serde::Serialize for $type_name {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    serde::Serialize::serialize(&self.get(), serializer)
                }
            }

            #[cfg(not(feature = "protocol_names"))]
            impl<'de> serde::Deserialize<'de> for $type_name {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    <$primitive as serde::Deserialize>::deserialize(deserializer).map(Self::from)
                }
            }
        }
    };
}
