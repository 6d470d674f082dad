//! Error types produced while binding fixtures and loading environments.

use std::path::PathBuf;

use figment::Error as FigmentError;
use thiserror::Error;

/// Result alias used across the crate.
pub type BindResult<T> = Result<T, BindError>;

/// Errors raised by the table binders, field converters and environment
/// loader.
///
/// Tag resolution never fails; unresolved tags degrade to `<nil>` instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
    /// A fixture row has the wrong number of cells.
    #[error("row {row} has {found} cells; expected {expected}")]
    TableShape {
        /// Zero-based index of the offending row.
        row: usize,
        /// Cell count the binder requires.
        expected: usize,
        /// Cell count actually present.
        found: usize,
    },

    /// No field on the target matches the requested name.
    #[error("field '{field}' not found in {target}")]
    FieldLookup {
        /// Name as written in the fixture.
        field: String,
        /// Name of the target type.
        target: String,
    },

    /// The matched field refuses assignment.
    #[error("field '{field}' of {target} cannot be set")]
    FieldNotSettable {
        /// Name as written in the fixture.
        field: String,
        /// Name of the target type.
        target: String,
    },

    /// A raw value could not be coerced into the destination type.
    #[error("cannot convert '{raw}' into {target}: {message}")]
    Parse {
        /// Destination type name.
        target: String,
        /// String form of the rejected value.
        raw: String,
        /// Explanation from the converter.
        message: String,
    },

    /// Conversion failed while assigning a named field.
    #[error("failed to set field '{field}' of {target}: {source}")]
    Field {
        /// Field being assigned.
        field: String,
        /// Name of the target type.
        target: String,
        /// Underlying conversion failure.
        #[source]
        source: Box<BindError>,
    },

    /// An environment file could not be read or parsed.
    #[error("environment file error in '{path}': {source}")]
    EnvironmentFile {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying error reported by the loader.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error while gathering configuration from figment providers.
    #[error("failed to gather environment configuration: {0}")]
    Gathering(#[from] Box<FigmentError>),
}

impl BindError {
    /// Construct a [`BindError::Parse`].
    #[must_use]
    pub fn parse(target: &str, raw: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            target: target.to_owned(),
            raw: raw.into(),
            message: message.to_string(),
        }
    }

    /// Wrap a conversion failure with the field and target it was bound to.
    #[must_use]
    pub fn in_field(self, field: &str, target: &str) -> Self {
        Self::Field {
            field: field.to_owned(),
            target: target.to_owned(),
            source: Box::new(self),
        }
    }

    /// Construct a gathering error from a [`figment::Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tagbind::BindError;
    /// let e = BindError::gathering(figment::Error::from("boom"));
    /// assert!(matches!(e, BindError::Gathering(_)));
    /// ```
    #[must_use]
    pub fn gathering(source: FigmentError) -> Self {
        Self::Gathering(Box::new(source))
    }

    /// Construct a [`BindError::EnvironmentFile`] for `path`.
    #[must_use]
    pub fn environment_file(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::EnvironmentFile {
            path: path.into(),
            source: source.into(),
        }
    }
}

impl From<FigmentError> for BindError {
    fn from(source: FigmentError) -> Self {
        Self::gathering(source)
    }
}
