//! Serde helpers for `std::time::Duration` written as humantime strings
//! (`"10s"`, `"1m 30s"`, `"250ms"`).
//!
//! ```
//! use serde::Deserialize;
//! use std::time::Duration;
//!
//! #[derive(Deserialize)]
//! struct Timeouts {
//!     #[serde(with = "kessel_utils::humantime_serde")]
//!     connect: Duration,
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserializer, Serializer, de};

struct DurationVisitor;

impl de::Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a duration such as \"10s\" or \"1m 30s\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
        humantime::parse_duration(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

/// Deserialize a `Duration` from a humantime string.
///
/// # Errors
///
/// Fails when the input is not a string or cannot be parsed as a duration.
pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
    d.deserialize_str(DurationVisitor)
}

/// Serialize a `Duration` as a humantime string.
///
/// # Errors
///
/// Propagates serializer errors.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&humantime::format_duration(*d))
}

pub mod option {
    //! Same as the parent module, for `Option<Duration>`.

    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(transparent)]
    struct Wrapped(#[serde(with = "super")] Duration);

    /// # Errors
    ///
    /// Fails when a present value cannot be parsed as a duration.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<Wrapped>::deserialize(d)?.map(|Wrapped(v)| v))
    }

    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(v) => s.collect_str(&humantime::format_duration(*v)),
            None => s.serialize_none(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Serialize, Deserialize)]
    struct Plain {
        #[serde(with = "super")]
        timeout: Duration,
    }

    #[derive(Serialize, Deserialize)]
    struct Optional {
        #[serde(with = "super::option", default)]
        timeout: Option<Duration>,
    }

    #[test]
    fn parses_and_formats() {
        let v: Plain = serde_json::from_str(r#"{"timeout": "1m 30s"}"#).unwrap();
        assert_eq!(v.timeout, Duration::from_secs(90));
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"timeout":"1m 30s"}"#);
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Plain>(r#"{"timeout": "soon"}"#).is_err());
    }

    #[test]
    fn option_handles_missing_and_null() {
        let v: Optional = serde_json::from_str("{}").unwrap();
        assert_eq!(v.timeout, None);
        let v: Optional = serde_json::from_str(r#"{"timeout": null}"#).unwrap();
        assert_eq!(v.timeout, None);
        let v: Optional = serde_json::from_str(r#"{"timeout": "250ms"}"#).unwrap();
        assert_eq!(v.timeout, Some(Duration::from_millis(250)));
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"timeout":"250ms"}"#);
    }
}
