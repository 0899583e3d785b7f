//! JSON mapping for protobuf enums.
//!
//! Enum fields are stored as `i32` in prost messages. In JSON they are
//! written as the enum value's proto name, and read from either the name
//! or the number.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

pub trait ProtoEnum: Sized + Into<i32> + TryFrom<i32> {
    fn as_str_name(&self) -> &'static str;
    fn from_str_name(value: &str) -> Option<Self>;
}

pub fn serialize<E: ProtoEnum, S: Serializer>(
    value: i32,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match E::try_from(value) {
        Ok(known) => serializer.serialize_str(known.as_str_name()),
        Err(_) => serializer.serialize_i32(value),
    }
}

pub fn deserialize<'de, E: ProtoEnum, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<i32, D::Error> {
    deserializer.deserialize_any(EnumVisitor::<E>(PhantomData))
}

struct EnumVisitor<E>(PhantomData<E>);

impl<E: ProtoEnum> Visitor<'_> for EnumVisitor<E> {
    type Value = i32;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an enum value name or number")
    }

    fn visit_str<DeErr: de::Error>(self, v: &str) -> Result<i32, DeErr> {
        E::from_str_name(v)
            .map(Into::into)
            .ok_or_else(|| DeErr::unknown_variant(v, &[]))
    }

    fn visit_i64<DeErr: de::Error>(self, v: i64) -> Result<i32, DeErr> {
        i32::try_from(v).map_err(|_| DeErr::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_u64<DeErr: de::Error>(self, v: u64) -> Result<i32, DeErr> {
        i32::try_from(v).map_err(|_| DeErr::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_unit<DeErr: de::Error>(self) -> Result<i32, DeErr> {
        Ok(0)
    }
}

/// Declares a protobuf enum with its proto names and a serde module of the
/// given snake-case name for use as `#[serde(with = "...")]` on `i32` fields.
///
/// Textually scoped: modules declared after `enum_serde` can use it.
macro_rules! proto_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $module:ident {
            $( $variant:ident = $value:literal => $proto:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum $name {
            $( $variant = $value, )+
        }

        impl $name {
            /// Name of the value as written in the `.proto` definition.
            #[must_use]
            pub fn as_str_name(&self) -> &'static str {
                match self {
                    $( Self::$variant => $proto, )+
                }
            }

            #[must_use]
            pub fn from_str_name(value: &str) -> Option<Self> {
                match value {
                    $( $proto => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl $crate::proto::enum_serde::ProtoEnum for $name {
            fn as_str_name(&self) -> &'static str {
                $name::as_str_name(self)
            }

            fn from_str_name(value: &str) -> Option<Self> {
                $name::from_str_name(value)
            }
        }

        #[doc(hidden)]
        pub mod $module {
            /// # Errors
            ///
            /// Returns the serializer's error.
            #[allow(clippy::trivially_copy_pass_by_ref)]
            pub fn serialize<S: ::serde::Serializer>(
                value: &i32,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                $crate::proto::enum_serde::serialize::<super::$name, S>(*value, serializer)
            }

            /// # Errors
            ///
            /// Fails on names and numbers outside the enum's range.
            pub fn deserialize<'de, D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<i32, D::Error> {
                $crate::proto::enum_serde::deserialize::<super::$name, D>(deserializer)
            }
        }
    };
}
