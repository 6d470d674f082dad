//! Selection of the environment file to load.

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

use crate::{BindError, BindResult};

/// Where environment files live and which one to load.
///
/// Defaults to `environments/local.yml`. `TAGBIND_DIR` and `TAGBIND_NAME`
/// override the defaults when loaded through
/// [`EnvironmentSettings::from_env`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSettings {
    /// Directory holding the environment files.
    pub dir: PathBuf,
    /// Environment name; selects `<name>.yml` and `<name>-private.yml`.
    pub name: String,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("environments"),
            name: "local".to_owned(),
        }
    }
}

impl EnvironmentSettings {
    /// Prefix for environment variables that override the defaults.
    pub const ENV_PREFIX: &'static str = "TAGBIND_";

    /// Layer the defaults under `TAGBIND_`-prefixed environment variables.
    #[must_use]
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed(Self::ENV_PREFIX))
    }

    /// Load the settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Gathering`] when an override cannot be
    /// deserialised.
    pub fn from_env() -> BindResult<Self> {
        Self::figment().extract().map_err(BindError::gathering)
    }

    /// Path of the mandatory base file.
    #[must_use]
    pub fn base_path(&self) -> PathBuf {
        self.dir.join(format!("{}.yml", self.name))
    }

    /// Path of the optional private overlay.
    #[must_use]
    pub fn overlay_path(&self) -> PathBuf {
        self.dir.join(format!("{}-private.yml", self.name))
    }
}
