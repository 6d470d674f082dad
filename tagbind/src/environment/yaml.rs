//! YAML provider support backed by `serde-saphyr`.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use figment::{
    Metadata, Profile, Provider,
    error::Kind,
    value::{Dict, Value as FigmentValue},
};
use serde_saphyr::Options;

#[derive(Debug, Clone)]
enum YamlInput {
    File { required: bool },
    Inline(String),
}

/// Figment provider that reads environment YAML using `serde-saphyr`.
///
/// Booleans follow YAML 1.2, so `yes` and `on` stay strings.
#[derive(Debug, Clone)]
pub struct SaphyrYaml {
    path: PathBuf,
    input: YamlInput,
}

impl SaphyrYaml {
    /// Read configuration from `path` when queried; a missing file is an
    /// error.
    #[must_use]
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            input: YamlInput::File { required: true },
        }
    }

    /// Read configuration from `path` when it exists, contributing nothing
    /// otherwise.
    #[must_use]
    pub fn optional_file<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            input: YamlInput::File { required: false },
        }
    }

    /// Construct a provider from in-memory YAML. `path` only labels errors.
    #[must_use]
    pub fn string<P, S>(path: P, contents: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            input: YamlInput::Inline(contents.into()),
        }
    }

    /// Read the provider input, returning `None` for an absent optional file.
    fn read_contents(&self) -> io::Result<Option<String>> {
        match &self.input {
            YamlInput::File { required } => match std::fs::read_to_string(&self.path) {
                Ok(contents) => Ok(Some(contents)),
                Err(err) if !*required && err.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err),
            },
            YamlInput::Inline(contents) => Ok(Some(contents.clone())),
        }
    }

    /// Parse YAML contents into a Figment `Value` using strict boolean semantics.
    fn parse_value(contents: &str) -> Result<FigmentValue, serde_saphyr::Error> {
        serde_saphyr::from_str_with_options(
            contents,
            Options {
                strict_booleans: true,
                ..Options::default()
            },
        )
    }
}

impl Provider for SaphyrYaml {
    fn metadata(&self) -> Metadata {
        Metadata::from("Saphyr YAML", self.path.as_path())
    }

    fn data(&self) -> Result<BTreeMap<Profile, Dict>, figment::Error> {
        let contents = self.read_contents().map_err(|err| {
            figment::Error::from(format!("failed to read {}: {err}", self.path.display()))
        })?;
        let Some(contents) = contents.filter(|text| !text.trim().is_empty()) else {
            tracing::debug!(path = %self.path.display(), "empty YAML input contributes nothing");
            return Ok(Profile::Default.collect(Dict::new()));
        };
        let value = Self::parse_value(&contents).map_err(|err| {
            figment::Error::from(Kind::Message(format!(
                "failed to parse {}: {err}",
                self.path.display()
            )))
        })?;
        let actual = value.to_actual();
        let dict = value
            .into_dict()
            .ok_or_else(|| figment::Error::from(Kind::InvalidType(actual, "map".into())))?;
        Ok(Profile::Default.collect(dict))
    }
}
