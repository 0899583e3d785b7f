//! JSON mapping for well-known protobuf types used by inventory messages.

use std::fmt;

use prost_types::value::Kind;
use prost_types::{ListValue, Struct, Value};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// `google.protobuf.Struct` as a JSON object.
pub mod struct_json {
    use super::{Deserialize, Deserializer, Serialize, Serializer, Struct, struct_to_json, json_to_struct};

    /// # Errors
    ///
    /// Returns the serializer's error.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Struct>, serializer: S) -> Result<S::Ok, S::Error> {
        value.as_ref().map(struct_to_json).serialize(serializer)
    }

    /// # Errors
    ///
    /// Fails when the JSON value is neither an object nor null.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Struct>, D::Error> {
        let value = Option::<serde_json::Map<String, serde_json::Value>>::deserialize(deserializer)?;
        Ok(value.map(json_to_struct))
    }
}

/// `int64` fields: written as JSON strings, read from strings or numbers.
pub mod int64_json {
    use super::{Deserializer, Int64Visitor, Serializer};

    /// # Errors
    ///
    /// Returns the serializer's error.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    /// # Errors
    ///
    /// Fails when the value is not an integer or a string holding one.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        deserializer.deserialize_any(Int64Visitor)
    }
}

struct Int64Visitor;

impl Visitor<'_> for Int64Visitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a 64-bit integer or a string holding one")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        v.parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }
}

#[must_use]
pub fn struct_to_json(value: &Struct) -> serde_json::Map<String, serde_json::Value> {
    value
        .fields
        .iter()
        .map(|(k, v)| (k.clone(), value_to_json(v)))
        .collect()
}

#[must_use]
pub fn json_to_struct(map: serde_json::Map<String, serde_json::Value>) -> Struct {
    Struct {
        fields: map.into_iter().map(|(k, v)| (k, json_to_value(v))).collect(),
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match &value.kind {
        None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(*b),
        Some(Kind::NumberValue(n)) => serde_json::Number::from_f64(*n)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s.clone()),
        Some(Kind::ListValue(list)) => {
            serde_json::Value::Array(list.values.iter().map(value_to_json).collect())
        }
        Some(Kind::StructValue(s)) => serde_json::Value::Object(struct_to_json(s)),
    }
}

fn json_to_value(value: serde_json::Value) -> Value {
    let kind = match value {
        serde_json::Value::Null => Kind::NullValue(0),
        serde_json::Value::Bool(b) => Kind::BoolValue(b),
        serde_json::Value::Number(n) => Kind::NumberValue(n.as_f64().unwrap_or_default()),
        serde_json::Value::String(s) => Kind::StringValue(s),
        serde_json::Value::Array(items) => Kind::ListValue(ListValue {
            values: items.into_iter().map(json_to_value).collect(),
        }),
        serde_json::Value::Object(map) => Kind::StructValue(json_to_struct(map)),
    };
    Value { kind: Some(kind) }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize, Deserialize, Default)]
    struct Holder {
        #[serde(with = "struct_json", default)]
        data: Option<Struct>,
        #[serde(with = "int64_json", default)]
        id: i64,
    }

    #[test]
    fn struct_maps_to_nested_object() {
        let input = json!({
            "data": {
                "name": "cluster-1",
                "nodes": [{"cpu": 4.0}, null],
                "ready": true
            },
            "id": "42"
        });
        let holder: Holder = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(holder.id, 42);
        let data = holder.data.as_ref().unwrap();
        assert!(matches!(
            data.fields["name"].kind,
            Some(Kind::StringValue(ref s)) if s == "cluster-1"
        ));
        assert_eq!(serde_json::to_value(&holder).unwrap(), input);
    }

    #[test]
    fn int64_accepts_numbers() {
        let holder: Holder = serde_json::from_value(json!({"id": 7})).unwrap();
        assert_eq!(holder.id, 7);
        assert!(holder.data.is_none());
        assert!(serde_json::from_value::<Holder>(json!({"id": "seven"})).is_err());
    }

    #[test]
    fn missing_struct_serializes_as_null() {
        let json = serde_json::to_value(Holder::default()).unwrap();
        assert_eq!(json, json!({"data": null, "id": "0"}));
    }
}
