//! Candidate records owned by the app and contact providers.

use serde::{Deserialize, Serialize};

/// An installed application parsed from a desktop entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    /// Desktop file id, e.g. `firefox.desktop`
    pub id: String,
    pub name: String,
    pub comment: Option<String>,
    /// Exec line with field codes stripped
    pub exec: String,
    pub icon: Option<String>,
    pub terminal: bool,
}

/// A contact from the user's contact book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ContactEntry {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl ContactEntry {
    /// Phone if present, else email.
    pub fn primary_detail(&self) -> Option<&str> {
        self.phone.as_deref().or(self.email.as_deref())
    }
}
