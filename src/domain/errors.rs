//! Domain validation errors.

use std::fmt;

/// Errors that can occur during domain value object validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or only whitespace.
    BlankField(&'static str),

    /// The root location uses a scheme this host cannot resolve.
    UnsupportedLocation(String),

    /// The root location does not exist.
    RootNotFound(String),

    /// The root location exists but is not a directory.
    NotADirectory(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{} cannot be blank", field),
            Self::UnsupportedLocation(uri) => write!(f, "Unsupported root location: {}", uri),
            Self::RootNotFound(path) => write!(f, "Root location does not exist: {}", path),
            Self::NotADirectory(path) => write!(f, "Root location is not a directory: {}", path),
        }
    }
}

impl std::error::Error for ValidationError {}
