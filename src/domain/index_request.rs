//! Validated indexing trigger input.

use super::errors::ValidationError;
use super::{RootId, RootLocation};

/// The three inputs a scheduler supplies to start an indexing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRequest {
    pub root_id: RootId,
    pub location: RootLocation,
    pub display_name: String,
}

impl IndexRequest {
    /// Validate raw trigger input.
    ///
    /// Fields are checked in order (id, location, display name) and the
    /// first blank or unresolvable one is reported.
    pub fn new(
        root_id: Option<&str>,
        root_uri: Option<&str>,
        display_name: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let root_id = RootId::new(root_id.unwrap_or_default())?;
        let location = RootLocation::parse(root_uri.unwrap_or_default())?;
        let display_name = display_name.unwrap_or_default().trim();
        if display_name.is_empty() {
            return Err(ValidationError::BlankField("root_display_name"));
        }

        Ok(Self {
            root_id,
            location,
            display_name: display_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        let req = IndexRequest::new(Some("docs"), Some("/tmp/docs"), Some("Docs")).unwrap();
        assert_eq!(req.root_id.as_str(), "docs");
        assert_eq!(req.display_name, "Docs");
    }

    #[test]
    fn test_missing_fields_rejected_in_order() {
        assert_eq!(
            IndexRequest::new(None, None, None).unwrap_err(),
            ValidationError::BlankField("root_id")
        );
        assert_eq!(
            IndexRequest::new(Some("docs"), Some(" "), Some("Docs")).unwrap_err(),
            ValidationError::BlankField("root_uri")
        );
        assert_eq!(
            IndexRequest::new(Some("docs"), Some("/tmp"), Some("")).unwrap_err(),
            ValidationError::BlankField("root_display_name")
        );
    }
}
