//! Steps that bind Gherkin data tables into maps and structs.

use anyhow::{Result, anyhow, ensure};
use rstest_bdd_macros::{given, then, when};
use tagbind::{BindResult, Table, Value, table};

use super::helpers::with_resolver;
use crate::fixtures::{BindingWorld, Header, RequestSettings};

#[when("the table is bound as a map:")]
fn bind_map(world: &BindingWorld, datatable: Vec<Vec<String>>) -> Result<()> {
    let fixture = Table::from(datatable);
    let map = with_resolver(world, |resolver| Ok(table::to_map(resolver, &fixture)?))?;
    world.map.set(map);
    Ok(())
}

#[then("the map entry \"{key}\" is the text \"{expected}\"")]
fn map_entry_text(world: &BindingWorld, key: String, expected: String) -> Result<()> {
    let actual = world
        .map
        .with_ref(|map| map.get(&key).cloned())
        .flatten()
        .ok_or_else(|| anyhow!("map has no entry {key:?}"))?;
    ensure!(
        actual == Value::String(expected.clone()),
        "entry {key:?}: expected {expected:?}, got {actual:?}"
    );
    Ok(())
}

#[then("the map entry \"{key}\" is the number {expected}")]
fn map_entry_number(world: &BindingWorld, key: String, expected: String) -> Result<()> {
    let want: f64 = expected.parse()?;
    let actual = world
        .map
        .with_ref(|map| map.get(&key).cloned())
        .flatten()
        .ok_or_else(|| anyhow!("map has no entry {key:?}"))?;
    ensure!(
        actual == Value::Number(want),
        "entry {key:?}: expected {want}, got {actual:?}"
    );
    Ok(())
}

#[when("the table is bound as a multi-map:")]
fn bind_multi_map(world: &BindingWorld, datatable: Vec<Vec<String>>) -> Result<()> {
    let fixture = Table::from(datatable);
    let map = with_resolver(world, |resolver| {
        Ok(table::to_multi_map(resolver, &fixture)?)
    })?;
    world.multi_map.set(map);
    Ok(())
}

#[then("the multi-map entry \"{key}\" holds \"{values}\"")]
fn multi_map_entry(world: &BindingWorld, key: String, values: String) -> Result<()> {
    let want: Vec<&str> = values.split(',').collect();
    let actual = world
        .multi_map
        .with_ref(|map| map.get(&key).cloned())
        .flatten()
        .ok_or_else(|| anyhow!("multi-map has no entry {key:?}"))?;
    ensure!(actual == want, "entry {key:?}: expected {want:?}, got {actual:?}");
    Ok(())
}

#[when("the table is bound as headers:")]
fn bind_headers(world: &BindingWorld, datatable: Vec<Vec<String>>) -> Result<()> {
    let fixture = Table::from(datatable);
    let outcome: BindResult<Vec<Header>> =
        with_resolver(world, |resolver| Ok(table::to_struct_slice(resolver, &fixture)))?;
    match outcome {
        Ok(headers) => world.headers.set(headers),
        Err(err) => world.error.set(err.to_string()),
    }
    Ok(())
}

#[then("{count} headers are bound")]
fn headers_bound(world: &BindingWorld, count: String) -> Result<()> {
    let want: usize = count.parse()?;
    let actual = world
        .headers
        .with_ref(Vec::len)
        .ok_or_else(|| anyhow!("no headers were bound"))?;
    ensure!(actual == want, "expected {want} headers, got {actual}");
    Ok(())
}

#[then("header {position} is \"{name}: {value}\"")]
fn header_at(world: &BindingWorld, position: String, name: String, value: String) -> Result<()> {
    let index: usize = position.parse()?;
    let header = world
        .headers
        .with_ref(|headers| index.checked_sub(1).and_then(|idx| headers.get(idx)).cloned())
        .flatten()
        .ok_or_else(|| anyhow!("no header at position {index}"))?;
    ensure!(
        header.name == name && header.value == value,
        "header {index}: expected {name}: {value}, got {header:?}"
    );
    Ok(())
}

#[given("request settings with url \"{url}\"")]
fn request_settings(world: &BindingWorld, url: String) {
    world.settings.set(RequestSettings {
        url,
        ..RequestSettings::default()
    });
}

#[when("the settings are updated with:")]
fn update_settings(world: &BindingWorld, datatable: Vec<Vec<String>>) -> Result<()> {
    let fixture = Table::from(datatable);
    let mut settings = world
        .settings
        .take()
        .ok_or_else(|| anyhow!("request settings not initialised"))?;
    let outcome = with_resolver(world, |resolver| {
        Ok(table::update_struct(resolver, &fixture, &mut settings))
    })?;
    if let Err(err) = outcome {
        world.error.set(err.to_string());
    }
    world.settings.set(settings);
    Ok(())
}

#[then("the settings have url \"{url}\" and {retries} retries")]
fn settings_match(world: &BindingWorld, url: String, retries: String) -> Result<()> {
    let want: u32 = retries.parse()?;
    let settings = world
        .settings
        .get()
        .ok_or_else(|| anyhow!("request settings not initialised"))?;
    ensure!(settings.url == url, "url: expected {url}, got {}", settings.url);
    ensure!(settings.retries == want, "retries: expected {want}, got {}", settings.retries);
    Ok(())
}

#[then("redirects are followed")]
fn redirects_followed(world: &BindingWorld) -> Result<()> {
    let follow = world
        .settings
        .with_ref(|settings| settings.follow_redirects)
        .ok_or_else(|| anyhow!("request settings not initialised"))?;
    ensure!(follow, "follow-redirects was not applied");
    Ok(())
}

#[then("binding fails mentioning \"{fragment}\"")]
fn binding_fails(world: &BindingWorld, fragment: String) -> Result<()> {
    let message = world
        .error
        .get()
        .ok_or_else(|| anyhow!("binding unexpectedly succeeded"))?;
    ensure!(
        message.contains(&fragment),
        "error {message:?} does not mention {fragment:?}"
    );
    Ok(())
}
