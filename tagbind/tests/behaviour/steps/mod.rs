//! Step definitions registered with `rstest-bdd`.

mod helpers;
pub mod resolution_steps;
pub mod table_steps;
