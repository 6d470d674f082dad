//! Shared fixtures for the behavioural scenarios.

use std::collections::BTreeMap;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tagbind::{Bindable, PathMap, ScenarioStore, Value};
use time::OffsetDateTime;
use time::macros::datetime;

/// HTTP header row bound from a fixture table.
#[derive(Debug, Default, Clone, PartialEq, Eq, Bindable)]
pub struct Header {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
    /// Position in the outgoing request.
    pub order: u8,
}

/// Request settings bound from a header-less `(field, value)` table.
#[derive(Debug, Default, Clone, PartialEq, Bindable)]
pub struct RequestSettings {
    /// Target URL.
    pub url: String,
    /// Number of attempts before giving up.
    pub retries: u32,
    /// Whether redirects are followed.
    #[bind(rename = "follow-redirects")]
    pub follow_redirects: bool,
    /// Optional request timeout in seconds.
    pub timeout: Option<f64>,
}

/// Scenario state shared between steps.
#[derive(Default, ScenarioState)]
pub struct BindingWorld {
    /// Environment document consulted by `CONF` tags.
    pub environment: Slot<PathMap>,
    /// Values consulted by `CTXT` tags.
    pub scenario: Slot<ScenarioStore>,
    /// Last resolved value.
    pub resolved: Slot<Value>,
    /// Last `to_map` result.
    pub map: Slot<BTreeMap<String, Value>>,
    /// Last `to_multi_map` result.
    pub multi_map: Slot<BTreeMap<String, Vec<String>>>,
    /// Last `to_struct_slice` result.
    pub headers: Slot<Vec<Header>>,
    /// Settings updated by `update_struct`.
    pub settings: Slot<RequestSettings>,
    /// Display form of the last binding error.
    pub error: Slot<String>,
}

/// Fresh world for each scenario.
#[fixture]
pub fn world() -> BindingWorld {
    BindingWorld::default()
}

/// Clock used by `NOW` tags in scenarios.
pub fn frozen_clock() -> OffsetDateTime {
    datetime!(2024-03-01 12:00:00 UTC)
}
