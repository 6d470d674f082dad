//! Coercion of resolved fixture values into typed struct fields.
//!
//! Scalars are converted from the string form of the resolved value using
//! the same grammar regardless of where the value came from, so `"1"` typed
//! in a table and `1` looked up from configuration bind identically.
//! Integers are parsed into 64 bits first and then narrowed with a range
//! check.

use std::any::type_name;
use std::borrow::Cow;
use std::fmt;

use serde_json::Value as JsonValue;

use crate::{BindError, BindResult, Value};

/// Types that can be produced from a resolved fixture value.
pub trait FromFixture: Sized {
    /// Convert `value` into `Self`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Parse`] naming the destination type and the raw
    /// text when the value cannot be coerced.
    fn from_fixture(value: &Value) -> BindResult<Self>;
}

/// Text the scalar converters parse.
fn scalar_text(value: &Value) -> Cow<'_, str> {
    value
        .as_str()
        .map_or_else(|| Cow::Owned(value.to_string()), Cow::Borrowed)
}

impl FromFixture for bool {
    fn from_fixture(value: &Value) -> BindResult<Self> {
        let raw = scalar_text(value);
        match &*raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            other => Err(BindError::parse("bool", other, "invalid syntax")),
        }
    }
}

macro_rules! impl_signed {
    ($($ty:ty),* $(,)?) => {$(
        impl FromFixture for $ty {
            fn from_fixture(value: &Value) -> BindResult<Self> {
                let raw = scalar_text(value);
                let wide: i64 = raw
                    .parse()
                    .map_err(|err| BindError::parse(stringify!($ty), &*raw, err))?;
                Self::try_from(wide)
                    .map_err(|err| BindError::parse(stringify!($ty), &*raw, err))
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty),* $(,)?) => {$(
        impl FromFixture for $ty {
            fn from_fixture(value: &Value) -> BindResult<Self> {
                let raw = scalar_text(value);
                if raw.starts_with('+') {
                    return Err(BindError::parse(
                        stringify!($ty),
                        &*raw,
                        "sign prefix not permitted",
                    ));
                }
                let wide: u64 = raw
                    .parse()
                    .map_err(|err| BindError::parse(stringify!($ty), &*raw, err))?;
                Self::try_from(wide)
                    .map_err(|err| BindError::parse(stringify!($ty), &*raw, err))
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

fn parse_f64(target: &str, raw: &str) -> BindResult<f64> {
    raw.parse()
        .map_err(|err| BindError::parse(target, raw, err))
}

impl FromFixture for f64 {
    fn from_fixture(value: &Value) -> BindResult<Self> {
        parse_f64("f64", &scalar_text(value))
    }
}

impl FromFixture for f32 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "narrowing is checked for overflow below"
    )]
    fn from_fixture(value: &Value) -> BindResult<Self> {
        let raw = scalar_text(value);
        let wide = parse_f64("f32", &raw)?;
        let narrow = wide as Self;
        if wide.is_finite() && narrow.is_infinite() {
            return Err(BindError::parse("f32", &*raw, "value out of range"));
        }
        Ok(narrow)
    }
}

impl FromFixture for String {
    fn from_fixture(value: &Value) -> BindResult<Self> {
        Ok(scalar_text(value).into_owned())
    }
}

impl<T: FromFixture> FromFixture for Option<T> {
    fn from_fixture(value: &Value) -> BindResult<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::from_fixture(value).map(Some)
    }
}

impl FromFixture for Value {
    fn from_fixture(value: &Value) -> BindResult<Self> {
        Ok(value.clone())
    }
}

impl FromFixture for JsonValue {
    fn from_fixture(value: &Value) -> BindResult<Self> {
        Ok(value.clone().into_json())
    }
}

/// Element family of a JSON array, inferred from its first element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Family {
    Bool,
    Number,
    String,
}

impl Family {
    const fn of(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Bool(_) => Some(Self::Bool),
            JsonValue::Number(_) => Some(Self::Number),
            JsonValue::String(_) => Some(Self::String),
            JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

/// Borrow or parse the array a slice field is bound from.
fn source_array<'v>(target: &str, value: &'v Value) -> BindResult<Cow<'v, [JsonValue]>> {
    match value {
        Value::Array(items) => Ok(Cow::Borrowed(items.as_slice())),
        Value::String(text) => serde_json::from_str::<Vec<JsonValue>>(text)
            .map(Cow::Owned)
            .map_err(|err| BindError::parse(target, text.as_str(), err)),
        other => Err(BindError::parse(
            target,
            other.to_string(),
            format!("expected an array, found {}", other.kind()),
        )),
    }
}

/// Slices take their element family from the first source element.
///
/// Every later element must belong to the same family; a mismatch is
/// reported with its index instead of being coerced.
impl<T: FromFixture> FromFixture for Vec<T> {
    fn from_fixture(value: &Value) -> BindResult<Self> {
        let target = type_name::<Self>();
        let items = source_array(target, value)?;
        let Some(first) = items.first() else {
            return Ok(Self::new());
        };
        let family = Family::of(first).ok_or_else(|| {
            BindError::parse(target, first.to_string(), "unsupported array element type")
        })?;
        items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                if Family::of(item) != Some(family) {
                    return Err(BindError::parse(
                        target,
                        item.to_string(),
                        format!("element {idx} is not a {}", family.name()),
                    ));
                }
                T::from_fixture(&Value::from(item))
            })
            .collect()
    }
}

/// A complex number with `f64` parts.
///
/// Parsed from forms such as `3`, `2i`, `1+2i`, `1.5-0.5i` or `(1+2i)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex {
    /// Create a complex number from its parts.
    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{:+}i)", self.re, self.im)
    }
}

fn parse_imaginary(raw: &str) -> Option<f64> {
    match raw {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        digits => digits.parse().ok(),
    }
}

/// Index of the sign separating the real and imaginary parts, skipping a
/// leading sign and exponent signs.
fn imaginary_split(body: &str) -> Option<usize> {
    let mut previous = None;
    let mut split = None;
    for (idx, c) in body.char_indices() {
        if idx > 0 && matches!(c, '+' | '-') && !matches!(previous, Some('e' | 'E')) {
            split = Some(idx);
        }
        previous = Some(c);
    }
    split
}

fn parse_complex(raw: &str) -> Option<Complex> {
    let text = raw
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(raw);
    let Some(body) = text.strip_suffix('i') else {
        return text.parse().ok().map(|re| Complex::new(re, 0.0));
    };
    match imaginary_split(body) {
        Some(idx) => {
            let (re, im) = body.split_at(idx);
            Some(Complex::new(re.parse().ok()?, parse_imaginary(im)?))
        }
        None => Some(Complex::new(0.0, parse_imaginary(body)?)),
    }
}

impl FromFixture for Complex {
    fn from_fixture(value: &Value) -> BindResult<Self> {
        let raw = scalar_text(value);
        parse_complex(&raw).ok_or_else(|| BindError::parse("Complex", &*raw, "invalid syntax"))
    }
}

#[cfg(test)]
mod tests {
    use super::{Complex, FromFixture};
    use crate::{BindError, Value};
    use rstest::rstest;
    use serde_json::json;

    fn text(raw: &str) -> Value {
        Value::from(raw)
    }

    #[rstest]
    #[case("1", true)]
    #[case("t", true)]
    #[case("T", true)]
    #[case("TRUE", true)]
    #[case("true", true)]
    #[case("True", true)]
    #[case("0", false)]
    #[case("f", false)]
    #[case("F", false)]
    #[case("FALSE", false)]
    #[case("false", false)]
    #[case("False", false)]
    fn bool_accepts_the_documented_spellings(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(bool::from_fixture(&text(raw)).ok(), Some(expected));
    }

    #[rstest]
    #[case("yes")]
    #[case("tRUE")]
    #[case("")]
    fn bool_rejects_other_spellings(#[case] raw: &str) {
        let err = bool::from_fixture(&text(raw)).expect_err("invalid bool");
        assert!(matches!(err, BindError::Parse { ref target, .. } if target == "bool"));
    }

    #[rstest]
    fn native_values_bind_through_their_string_form() {
        assert_eq!(bool::from_fixture(&Value::Bool(true)).ok(), Some(true));
        assert_eq!(i32::from_fixture(&Value::Number(42.0)).ok(), Some(42));
        assert_eq!(String::from_fixture(&Value::Number(1.5)).ok().as_deref(), Some("1.5"));
        assert!(i32::from_fixture(&Value::Number(1.5)).is_err());
    }

    #[rstest]
    fn signed_integers_are_narrowed_with_range_checks() {
        assert_eq!(i8::from_fixture(&text("-128")).ok(), Some(-128));
        assert_eq!(i64::from_fixture(&text("+17")).ok(), Some(17));
        assert!(i8::from_fixture(&text("128")).is_err());
        assert!(i16::from_fixture(&text("0x10")).is_err());
        assert!(i64::from_fixture(&text("9223372036854775808")).is_err());
    }

    #[rstest]
    fn unsigned_integers_reject_signs_and_overflow() {
        assert_eq!(u16::from_fixture(&text("65535")).ok(), Some(65535));
        assert!(u8::from_fixture(&text("300")).is_err());
        assert!(u32::from_fixture(&text("-1")).is_err());
        assert!(u64::from_fixture(&text("+1")).is_err());
    }

    #[rstest]
    fn parse_errors_name_the_destination_and_raw_text() {
        let err = u8::from_fixture(&text("300")).expect_err("overflow");
        let BindError::Parse { target, raw, .. } = err else {
            panic!("expected a parse error");
        };
        assert_eq!(target, "u8");
        assert_eq!(raw, "300");
    }

    #[rstest]
    fn floats_parse_with_64_bit_precision() {
        assert_eq!(f64::from_fixture(&text("2.5e3")).ok(), Some(2500.0));
        assert_eq!(f32::from_fixture(&text("0.25")).ok(), Some(0.25));
        assert!(f64::from_fixture(&text("inf")).is_ok_and(f64::is_infinite));
        assert!(f32::from_fixture(&text("1e300")).is_err());
        assert!(f64::from_fixture(&text("one")).is_err());
    }

    #[rstest]
    fn strings_pass_through_verbatim() {
        assert_eq!(
            String::from_fixture(&text(" \"quoted\" ")).ok().as_deref(),
            Some(" \"quoted\" ")
        );
        assert_eq!(String::from_fixture(&Value::Null).ok().as_deref(), Some("<nil>"));
    }

    #[rstest]
    #[case("3", Complex::new(3.0, 0.0))]
    #[case("2i", Complex::new(0.0, 2.0))]
    #[case("1+2i", Complex::new(1.0, 2.0))]
    #[case("(1.5-0.5i)", Complex::new(1.5, -0.5))]
    #[case("-1-i", Complex::new(-1.0, -1.0))]
    #[case("1e-3+2e2i", Complex::new(0.001, 200.0))]
    fn complex_numbers_parse(#[case] raw: &str, #[case] expected: Complex) {
        assert_eq!(Complex::from_fixture(&text(raw)).ok(), Some(expected));
    }

    #[rstest]
    #[case("1+")]
    #[case("i+1")]
    #[case("(1+2i")]
    fn malformed_complex_numbers_fail(#[case] raw: &str) {
        assert!(Complex::from_fixture(&text(raw)).is_err());
    }

    #[rstest]
    fn complex_display_keeps_the_sign() {
        assert_eq!(Complex::new(1.0, -2.0).to_string(), "(1-2i)");
        assert_eq!(Complex::new(0.0, 3.5).to_string(), "(0+3.5i)");
    }

    #[rstest]
    fn options_are_filled_on_first_write() {
        assert_eq!(Option::<u8>::from_fixture(&text("7")).ok(), Some(Some(7)));
        assert_eq!(Option::<u8>::from_fixture(&Value::Null).ok(), Some(None));
        assert!(Option::<u8>::from_fixture(&text("x")).is_err());
    }

    #[rstest]
    fn slices_bind_from_arrays_and_json_text() {
        let numbers = Value::from(json!([1, 2, 3]));
        assert_eq!(Vec::<i64>::from_fixture(&numbers).ok(), Some(vec![1, 2, 3]));
        assert_eq!(
            Vec::<String>::from_fixture(&text(r#"["a", "b"]"#)).ok(),
            Some(vec!["a".to_owned(), "b".to_owned()])
        );
        assert_eq!(
            Vec::<bool>::from_fixture(&Value::from(json!([true, false]))).ok(),
            Some(vec![true, false])
        );
        assert_eq!(Vec::<u8>::from_fixture(&text("[]")).ok(), Some(Vec::new()));
    }

    #[rstest]
    #[case(json!([1, "two", 3]))]
    #[case(json!(["a", true]))]
    #[case(json!([true, 0]))]
    fn heterogeneous_slices_are_rejected(#[case] array: serde_json::Value) {
        let err = Vec::<String>::from_fixture(&Value::from(array)).expect_err("mixed array");
        assert!(
            matches!(err, BindError::Parse { ref message, .. } if message.starts_with("element ")),
            "unexpected error: {err}"
        );
    }

    #[rstest]
    #[case(Value::Bool(true))]
    #[case(text("not json"))]
    #[case(Value::from(json!([null])))]
    #[case(Value::from(json!([[1]])))]
    fn slices_need_a_supported_array(#[case] value: Value) {
        assert!(Vec::<i64>::from_fixture(&value).is_err());
    }

    #[rstest]
    fn untyped_fields_keep_the_resolved_value() {
        let value = Value::from(json!({"k": [1]}));
        assert_eq!(
            serde_json::Value::from_fixture(&value).ok(),
            Some(json!({"k": [1]}))
        );
        assert_eq!(Value::from_fixture(&Value::Number(2.0)).ok(), Some(Value::Number(2.0)));
    }
}
