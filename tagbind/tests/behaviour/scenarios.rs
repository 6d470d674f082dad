//! Binds the feature files to the step registry.

use crate::fixtures::{BindingWorld, world};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/tag_resolution.feature",
    fixtures = [world: BindingWorld]
);
scenarios!(
    "tests/features/table_binding.feature",
    fixtures = [world: BindingWorld]
);
