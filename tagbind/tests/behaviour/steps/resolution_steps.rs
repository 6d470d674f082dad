//! Steps that stage environments and scenario values and resolve tags.

use anyhow::{Result, anyhow, ensure};
use rstest_bdd_macros::{given, then, when};
use tagbind::{Environment, Value};

use super::helpers::with_resolver;
use crate::fixtures::BindingWorld;

/// Parses the docstring as YAML and installs it as the environment.
#[given("the environment:")]
fn environment(world: &BindingWorld, docstring: String) -> Result<()> {
    let environment = Environment::from_yaml_str("scenario", &docstring)?;
    world.environment.set(environment.path_map().clone());
    Ok(())
}

/// Stores a string value for `CTXT` lookups.
#[given("the scenario value \"{key}\" is \"{value}\"")]
fn scenario_value(world: &BindingWorld, key: String, value: String) {
    let mut store = world.scenario.take().unwrap_or_default();
    store.put(key, value);
    world.scenario.set(store);
}

#[when("I resolve \"{input}\"")]
fn resolve(world: &BindingWorld, input: String) -> Result<()> {
    let value = with_resolver(world, |resolver| Ok(resolver.resolve(&input)))?;
    world.resolved.set(value);
    Ok(())
}

fn resolved(world: &BindingWorld) -> Result<Value> {
    world
        .resolved
        .get()
        .ok_or_else(|| anyhow!("nothing has been resolved"))
}

#[then("the result is the text \"{expected}\"")]
fn result_is_text(world: &BindingWorld, expected: String) -> Result<()> {
    let actual = resolved(world)?;
    ensure!(
        actual == Value::String(expected.clone()),
        "expected text {expected:?}, got {actual:?}"
    );
    Ok(())
}

#[then("the result is the number {expected}")]
fn result_is_number(world: &BindingWorld, expected: String) -> Result<()> {
    let want: f64 = expected.parse()?;
    let actual = resolved(world)?;
    ensure!(
        actual == Value::Number(want),
        "expected number {want}, got {actual:?}"
    );
    Ok(())
}

#[then("the result is the boolean {expected}")]
fn result_is_boolean(world: &BindingWorld, expected: String) -> Result<()> {
    let want: bool = expected.parse()?;
    let actual = resolved(world)?;
    ensure!(
        actual == Value::Bool(want),
        "expected boolean {want}, got {actual:?}"
    );
    Ok(())
}

#[then("the result is null")]
fn result_is_null(world: &BindingWorld) -> Result<()> {
    let actual = resolved(world)?;
    ensure!(actual.is_null(), "expected null, got {actual:?}");
    Ok(())
}

#[then("the result is the empty string")]
fn result_is_empty(world: &BindingWorld) -> Result<()> {
    let actual = resolved(world)?;
    ensure!(
        actual == Value::String(String::new()),
        "expected an empty string, got {actual:?}"
    );
    Ok(())
}
