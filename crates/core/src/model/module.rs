use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Prefix of the key-value entry that flags a module as read.
pub const COMPLETION_KEY_PREFIX: &str = "COMPLETED_";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModuleIdError {
    #[error("module id cannot be empty")]
    Empty,
}

/// Identifier of a course page whose reading unlocks its quiz.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleId(String);

impl ModuleId {
    /// # Errors
    ///
    /// Returns `ModuleIdError::Empty` for blank identifiers.
    pub fn new(id: impl Into<String>) -> Result<Self, ModuleIdError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ModuleIdError::Empty);
        }
        Ok(Self(id))
    }

    /// Derive the module from a page path: last segment, without `.html` or `.md`.
    ///
    /// # Errors
    ///
    /// Returns `ModuleIdError::Empty` if nothing is left after stripping.
    pub fn from_page_path(path: &str) -> Result<Self, ModuleIdError> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let last = path.rsplit(['/', '\\']).next().unwrap_or_default();
        let stem = last.replacen(".html", "", 1).replacen(".md", "", 1);
        Self::new(stem)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used by key-value progress stores.
    #[must_use]
    pub fn completion_key(&self) -> String {
        format!("{COMPLETION_KEY_PREFIX}{}", self.0)
    }
}

impl TryFrom<String> for ModuleId {
    type Error = ModuleIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModuleId> for String {
    fn from(value: ModuleId) -> Self {
        value.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleId({})", self.0)
    }
}
