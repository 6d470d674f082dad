//! Environment documents consulted by `CONF` tags.
//!
//! An environment is a YAML file named after the target deployment (for
//! example `environments/staging.yml`). Secrets that must not be committed
//! live in an optional sibling overlay, `staging-private.yml`, whose values
//! take precedence. Both files are layered with `figment` and exposed as a
//! single [`PathMap`].

mod settings;
mod yaml;

use std::io;
use std::path::Path;

use figment::Figment;
use serde_json::Value as JsonValue;

use crate::{BindError, BindResult, PathMap, Value};

pub use settings::EnvironmentSettings;
pub use yaml::SaphyrYaml;

/// Merged environment document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    name: String,
    document: PathMap,
}

impl Environment {
    /// Load the environment selected by `settings`.
    ///
    /// The base file is mandatory; the `-private` overlay is optional.
    /// Mappings are merged recursively, with overlay values winning on
    /// conflicts; sequences and scalars are replaced wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::EnvironmentFile`] when the base file is missing
    /// and [`BindError::Gathering`] when either file cannot be read or
    /// parsed.
    pub fn load(settings: &EnvironmentSettings) -> BindResult<Self> {
        let base = settings.base_path();
        if !base.is_file() {
            return Err(BindError::environment_file(
                &base,
                io::Error::new(io::ErrorKind::NotFound, "environment file not found"),
            ));
        }
        let overlay = settings.overlay_path();
        let figment = Figment::from(SaphyrYaml::file(&base))
            .merge(SaphyrYaml::optional_file(&overlay));
        let environment = Self::extract(&settings.name, &figment)?;
        tracing::info!(
            environment = %settings.name,
            base = %base.display(),
            overlay = overlay_label(&overlay),
            "loaded environment"
        );
        Ok(environment)
    }

    /// Build an environment from in-memory YAML.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Gathering`] when `yaml` is malformed or is not a
    /// mapping.
    pub fn from_yaml_str(name: &str, yaml: &str) -> BindResult<Self> {
        let figment = Figment::from(SaphyrYaml::string(format!("{name}.yml"), yaml));
        Self::extract(name, &figment)
    }

    /// Wrap an already parsed document.
    #[must_use]
    pub fn from_document(name: impl Into<String>, document: JsonValue) -> Self {
        Self {
            name: name.into(),
            document: PathMap::new(document),
        }
    }

    fn extract(name: &str, figment: &Figment) -> BindResult<Self> {
        let document: JsonValue = figment.extract()?;
        Ok(Self::from_document(name, document))
    }

    /// Name of the loaded environment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The merged document.
    #[must_use]
    pub const fn path_map(&self) -> &PathMap {
        &self.document
    }

    /// Look up a dot-path in the merged document.
    #[must_use]
    pub fn get(&self, path: &str) -> Value {
        self.document.get(path)
    }
}

fn overlay_label(overlay: &Path) -> &'static str {
    if overlay.is_file() { "merged" } else { "absent" }
}
