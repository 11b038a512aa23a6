//! Human-typeable session codes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A session code, case-insensitive on input and stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionCode(String);

impl SessionCode {
    /// Normalize user input into a code.
    ///
    /// Returns `None` when the input is blank, which callers treat as a
    /// request for a freshly generated code.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_uppercase()))
    }

    /// Wrap a machine-generated code, skipping the blank check.
    pub fn from_generated(raw: String) -> Self {
        Self(raw.to_uppercase())
    }

    /// Borrow the normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
