//! Error types for annotation tags.

use std::path::PathBuf;

use horizon_annotate_core::{ObjectError, ObjectId};

/// Result type alias for annotation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or interacting with a labeling document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A label tried to toggle but no labels container owns it.
    #[error("Label {label:?} has no enclosing labels container")]
    NoLabelContainer { label: ObjectId },

    /// The id does not refer to a label tag.
    #[error("Object {0:?} is not a label")]
    NotALabel(ObjectId),

    /// The id does not refer to a labels container.
    #[error("Object {0:?} is not a labels container")]
    NotALabelContainer(ObjectId),

    /// The label is not governed by the given container.
    #[error("Label {label:?} does not belong to container {container:?}")]
    ForeignLabel { label: ObjectId, container: ObjectId },

    /// A tag was placed inside a label; labels are leaves.
    #[error("Label {parent:?} cannot contain other tags")]
    NestedInLabel { parent: ObjectId },

    /// Object tree error.
    #[error("Object error: {0}")]
    Object(#[from] ObjectError),

    /// Labeling config could not be parsed.
    #[error("Config error: {message}")]
    Config { message: String },

    /// Invalid attribute value in the labeling config.
    #[error("Invalid value for attribute '{attribute}' on <{tag}>: {message}")]
    InvalidAttribute {
        tag: String,
        attribute: String,
        message: String,
    },

    /// Settings file could not be parsed.
    #[error("Invalid settings: {0}")]
    Settings(#[from] toml::de::Error),

    /// File I/O error.
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid attribute error.
    pub fn invalid_attribute(
        tag: impl Into<String>,
        attribute: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            tag: tag.into(),
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
