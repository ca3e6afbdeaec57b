//! Dynamic value bag
//!
//! Entries accumulated over a unit of work have no static shape. Each
//! value is a [`WideValue`], a closed set of JSON-like variants, so that
//! encoding to the log sink and to the side-channel is well defined and
//! round-trips.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, WideLoadError};

/// Insertion-ordered map of accumulated entries
pub type Entries = IndexMap<String, WideValue>;

/// A single accumulated value
///
/// Serializes as plain JSON. JSON has no NaN or infinity, so a non-finite
/// `Float` encodes as `null` and comes back as [`WideValue::Null`] after a
/// round-trip through the log sink or the side-channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum WideValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<WideValue>),
    Map(Entries),
}

impl WideValue {
    /// Name of the variant, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            WideValue::Null => "null",
            WideValue::Bool(_) => "bool",
            WideValue::Int(_) => "int",
            WideValue::Float(_) => "float",
            WideValue::String(_) => "string",
            WideValue::List(_) => "list",
            WideValue::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, WideValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            WideValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            WideValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[WideValue]> {
        match self {
            WideValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Entries> {
        match self {
            WideValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Coerce to an integer for increment/decrement.
    ///
    /// Null is 0, booleans are 0/1, finite floats truncate toward zero and
    /// strings must parse as a number after trimming. Lists, maps, NaN,
    /// infinities and out-of-range floats are rejected with
    /// [`WideLoadError::NotCoercible`]; `key` is only used for the error.
    ///
    /// # Errors
    ///
    /// Returns [`WideLoadError::NotCoercible`] when no integer
    /// interpretation exists.
    pub fn coerce_int(&self, key: &str) -> Result<i64> {
        let not_coercible = || WideLoadError::NotCoercible {
            key: key.to_string(),
            found: self.type_name(),
        };

        match self {
            WideValue::Null => Ok(0),
            WideValue::Bool(b) => Ok(i64::from(*b)),
            WideValue::Int(i) => Ok(*i),
            WideValue::Float(f) => float_to_int(*f).ok_or_else(not_coercible),
            WideValue::String(s) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    return Ok(i);
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(float_to_int)
                    .ok_or_else(not_coercible)
            }
            WideValue::List(_) | WideValue::Map(_) => Err(not_coercible()),
        }
    }
}

fn float_to_int(f: f64) -> Option<i64> {
    // i64::MAX is not exactly representable; 2^63 is the first value out of range.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let truncated = f.trunc();
    if truncated.is_finite() && truncated >= -LIMIT && truncated < LIMIT {
        Some(truncated as i64)
    } else {
        None
    }
}

impl From<bool> for WideValue {
    fn from(b: bool) -> Self {
        WideValue::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for WideValue {
                fn from(i: $t) -> Self {
                    WideValue::Int(i64::from(i))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_wide_uint {
    ($($t:ty),*) => {
        $(
            /// Values above `i64::MAX` fall back to `Float`, as JSON numbers do.
            impl From<$t> for WideValue {
                fn from(u: $t) -> Self {
                    i64::try_from(u).map_or(WideValue::Float(u as f64), WideValue::Int)
                }
            }
        )*
    };
}

impl_from_wide_uint!(u64, usize);

impl From<f32> for WideValue {
    fn from(f: f32) -> Self {
        WideValue::Float(f64::from(f))
    }
}

impl From<f64> for WideValue {
    fn from(f: f64) -> Self {
        WideValue::Float(f)
    }
}

impl From<&str> for WideValue {
    fn from(s: &str) -> Self {
        WideValue::String(s.to_string())
    }
}

impl From<String> for WideValue {
    fn from(s: String) -> Self {
        WideValue::String(s)
    }
}

impl<T: Into<WideValue>> From<Vec<T>> for WideValue {
    fn from(items: Vec<T>) -> Self {
        WideValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<WideValue>> From<Option<T>> for WideValue {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(WideValue::Null, Into::into)
    }
}

impl From<Entries> for WideValue {
    fn from(map: Entries) -> Self {
        WideValue::Map(map)
    }
}

impl From<serde_json::Value> for WideValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => WideValue::Null,
            serde_json::Value::Bool(b) => WideValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => WideValue::Int(i),
                None => WideValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => WideValue::String(s),
            serde_json::Value::Array(items) => {
                WideValue::List(items.into_iter().map(WideValue::from).collect())
            }
            serde_json::Value::Object(map) => WideValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, WideValue::from(v)))
                    .collect(),
            ),
        }
    }
}
