//! Tag expansion and data-table binding for behaviour-driven test suites.
//!
//! Step definitions receive literal strings and Gherkin data tables. This
//! crate turns them into live values:
//!
//! - [`Resolver`] expands bracketed tags such as `[CONF:api.url]`,
//!   `[CTXT:token]` or `[SHA256:secret]` against an [`Environment`] document
//!   and a per-scenario [`ScenarioStore`].
//! - [`PathMap`] navigates a parsed JSON document by dot-path.
//! - The [`table`] module converts data tables into maps, columns and
//!   structs deriving [`Bindable`].
//!
//! ```rust
//! use tagbind::{Bindable, PathMap, Resolver, ScenarioStore, Table, table};
//!
//! #[derive(Debug, Default, Bindable)]
//! struct Header {
//!     name: String,
//!     value: i64,
//! }
//!
//! let environment = PathMap::from_json_str(r#"{"api": {"port": 8080}}"#)?;
//! let scenario = ScenarioStore::new();
//! let resolver = Resolver::new(&environment, &scenario);
//!
//! let fixture = Table::from_rows(&[&["Name", "Value"], &["port", "[CONF:api.port]"]]);
//! let headers: Vec<Header> = table::to_struct_slice(&resolver, &fixture)?;
//! assert_eq!(headers[0].value, 8080);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

pub use tagbind_macros::Bindable;

pub mod convert;
pub mod environment;
mod error;
mod path_map;
mod resolver;
mod scenario;
pub mod table;
mod value;

pub use convert::{Complex, FromFixture};
pub use environment::{Environment, EnvironmentSettings};
pub use error::{BindError, BindResult};
pub use path_map::PathMap;
pub use resolver::Resolver;
pub use scenario::ScenarioStore;
pub use table::Table;
pub use value::Value;

#[doc(hidden)]
pub mod __private {
    //! Support items referenced by `#[derive(Bindable)]` expansions.

    pub use crate::table::bind_field;
}

/// Structs that can be populated field-by-field from fixture cells.
///
/// Implementations are normally generated by `#[derive(Bindable)]`, which
/// builds a registry of lowercase field names and typed setters. Field
/// lookups performed by the [`table`] binders are whole-name and
/// case-insensitive; the first registered name that matches wins.
///
/// ```rust
/// use tagbind::{Bindable, Value};
///
/// #[derive(Default, Bindable)]
/// struct Account {
///     #[bind(rename = "user")]
///     username: String,
///     active: bool,
/// }
///
/// let mut account = Account::default();
/// account.bind("USER", &Value::from("alice"))?;
/// account.bind("active", &Value::Bool(true))?;
/// assert_eq!(account.username, "alice");
/// assert!(account.active);
/// # Ok::<_, tagbind::BindError>(())
/// ```
pub trait Bindable {
    /// Names accepted by [`Bindable::bind`], in declaration order.
    fn field_names() -> &'static [&'static str];

    /// Assign `value` to the field called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::FieldLookup`] when no field matches `name`,
    /// [`BindError::FieldNotSettable`] when the field refuses assignment, and
    /// [`BindError::Field`] when the value cannot be converted to the field's
    /// type.
    fn bind(&mut self, name: &str, value: &Value) -> BindResult<()>;

    /// Human-readable name of the target type used in error messages.
    #[must_use]
    fn target_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}
