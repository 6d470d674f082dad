//! Dot-path navigation over parsed JSON documents.

use serde_json::Value as JsonValue;

use crate::Value;

/// Read-only view over a JSON document addressed by dot-separated paths.
///
/// Object members are selected by key and array elements by numeric
/// segment, so `servers.0.host` reads the `host` of the first server.
/// Lookups never fail: anything that cannot be reached yields
/// [`Value::Null`].
///
/// ```rust
/// use tagbind::{PathMap, Value};
///
/// let map = PathMap::from_json_str(r#"{"a": {"b": 1}, "c": [1, 2, 3]}"#)?;
/// assert_eq!(map.get("a.b"), Value::Number(1.0));
/// assert_eq!(map.get("a.x"), Value::Null);
/// assert_eq!(map.get("c.2"), Value::Number(3.0));
/// # Ok::<_, serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathMap {
    document: JsonValue,
}

impl PathMap {
    /// Wrap an already parsed document.
    #[must_use]
    pub const fn new(document: JsonValue) -> Self {
        Self { document }
    }

    /// Parse `json` and wrap the resulting document.
    ///
    /// # Errors
    ///
    /// Returns the parser error when `json` is not valid JSON.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self::new)
    }

    /// Borrow the backing document.
    #[must_use]
    pub const fn document(&self) -> &JsonValue {
        &self.document
    }

    /// Look up `path`, returning [`Value::Null`] when it cannot be reached.
    ///
    /// The empty path addresses the whole document.
    #[must_use]
    pub fn get(&self, path: &str) -> Value {
        self.lookup(path).map_or(Value::Null, Value::from)
    }

    fn lookup(&self, path: &str) -> Option<&JsonValue> {
        if path.is_empty() {
            return Some(&self.document);
        }
        path.split('.')
            .try_fold(&self.document, |node, segment| match node {
                JsonValue::Object(map) => map.get(segment),
                JsonValue::Array(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index)),
                _ => None,
            })
    }
}

impl From<JsonValue> for PathMap {
    fn from(document: JsonValue) -> Self {
        Self::new(document)
    }
}
