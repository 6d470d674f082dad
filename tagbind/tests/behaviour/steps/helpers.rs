//! Helpers shared by the step modules.

use anyhow::Result;
use tagbind::{Resolver, ScenarioStore};

use crate::fixtures::{BindingWorld, frozen_clock};

/// Run `f` with a resolver over the world's environment and scenario values.
pub fn with_resolver<T>(
    world: &BindingWorld,
    f: impl FnOnce(&Resolver<'_>) -> Result<T>,
) -> Result<T> {
    let environment = world.environment.get().unwrap_or_default();
    let scenario: ScenarioStore = world.scenario.get().unwrap_or_default();
    let resolver = Resolver::new(&environment, &scenario).with_clock(frozen_clock);
    f(&resolver)
}

