//! Root location resolution and document URI construction.

use super::errors::ValidationError;
use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file://";

/// A root location resolved to a local directory path.
///
/// Accepts either a `file://` URI (percent-decoded) or a plain filesystem
/// path; either way the path must be absolute. Any other scheme, e.g. a
/// platform tree handle such as `content://...`, cannot be resolved on this
/// host and is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootLocation {
    uri: String,
    path: PathBuf,
}

impl RootLocation {
    /// Parse a root location reference.
    pub fn parse(uri: &str) -> Result<Self, ValidationError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(ValidationError::BlankField("root_uri"));
        }

        let path = if let Some(rest) = uri.strip_prefix(FILE_SCHEME) {
            // file://localhost/path and file:///path are equivalent
            let rest = rest.strip_prefix("localhost").unwrap_or(rest);
            let decoded = urlencoding::decode(rest)
                .map_err(|_| ValidationError::UnsupportedLocation(uri.to_string()))?;
            PathBuf::from(decoded.into_owned())
        } else if uri.contains("://") {
            return Err(ValidationError::UnsupportedLocation(uri.to_string()));
        } else {
            PathBuf::from(uri)
        };

        // document URIs are built from the path, so it has to be absolute
        if !path.is_absolute() {
            return Err(ValidationError::UnsupportedLocation(uri.to_string()));
        }

        Ok(Self {
            uri: uri.to_string(),
            path,
        })
    }

    /// The location reference exactly as supplied (trimmed).
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The resolved directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build the unique document URI for an entry under this root.
    ///
    /// Each path segment is percent-encoded; segments are joined with `/`.
    pub fn document_uri(&self, relative_path: &str) -> String {
        let root = self.path.to_string_lossy();
        let mut uri = String::from(FILE_SCHEME);
        for segment in root.split('/').chain(relative_path.split('/')) {
            if segment.is_empty() {
                continue;
            }
            uri.push('/');
            uri.push_str(&urlencoding::encode(segment));
        }
        uri
    }
}
