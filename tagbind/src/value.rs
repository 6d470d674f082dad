//! Loosely-typed values produced by lookups and tag resolution.

use std::fmt;

use serde_json::{Map, Value as JsonValue};

/// A dynamically-typed value.
///
/// JSON numbers are always represented as `f64`; the document model does not
/// distinguish integers from floats. Arrays and objects keep their raw JSON
/// form so callers can inspect them without further conversion.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value, including missing lookups.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// Any JSON number.
    Number(f64),
    /// A string.
    String(String),
    /// A raw, untyped sequence.
    Array(Vec<JsonValue>),
    /// A nested mapping.
    Object(Map<String, JsonValue>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Convert back into a [`serde_json::Value`].
    ///
    /// Numbers without a fractional part are emitted as JSON integers when
    /// they fit into `i64`; non-finite numbers become `null`.
    #[must_use]
    pub fn into_json(self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(b),
            Self::Number(n) => number_to_json(n),
            Self::String(s) => JsonValue::String(s),
            Self::Array(items) => JsonValue::Array(items),
            Self::Object(map) => JsonValue::Object(map),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::float_cmp,
    reason = "the integral check guarantees the cast round-trips"
)]
fn number_to_json(n: f64) -> JsonValue {
    let integral = n.trunc();
    if integral == n && n.abs() < 9.0e15 {
        return JsonValue::from(integral as i64);
    }
    serde_json::Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::Array(items),
            JsonValue::Object(map) => Self::Object(map),
        }
    }
}

impl From<&JsonValue> for Value {
    fn from(value: &JsonValue) -> Self {
        value.clone().into()
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Renders the value the way tag substitution embeds it into strings.
///
/// `Null` renders as `<nil>`, which is what unresolved `CONF`/`CTXT` tags
/// expand to.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("<nil>"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write_number(f, *n),
            Self::String(s) => f.write_str(s),
            Self::Array(items) => {
                let json = serde_json::to_string(items).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
            Self::Object(map) => {
                let json = serde_json::to_string(map).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

/// Decimal notation for exponents in `-4..21`, otherwise the shortest
/// mantissa with a signed exponent of at least two digits (`1e+21`,
/// `1.5e-07`).
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let scientific = format!("{n:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return write!(f, "{n}");
    };
    let exp: i32 = exponent.parse().map_err(|_| fmt::Error)?;
    if (-4..21).contains(&exp) {
        return write!(f, "{n}");
    }
    let sign = if exp < 0 { '-' } else { '+' };
    write!(f, "{mantissa}e{sign}{:02}", exp.unsigned_abs())
}
