//! Test helpers shared across the tagbind workspace.
//!
//! [`figment`] wraps `figment::Jail` so environment files and variables can
//! be staged in isolation.

pub mod figment;
