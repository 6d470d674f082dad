//! Behavioural tests for tag resolution and table binding using
//! `rstest-bdd`.
//!
//! [`fixtures`] holds the shared scenario world, [`steps`] registers the
//! step definitions and [`scenarios`] binds the feature files under
//! `tests/features` to them.

mod fixtures;
mod scenarios;
mod steps;
