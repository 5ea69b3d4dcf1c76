//! Post id and title validation
//!
//! Post ids are caller-chosen natural keys in slug format.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for post ids
const MAX_POST_ID_LEN: usize = 64;

/// Maximum length for post titles
const MAX_TITLE_LEN: usize = 256;

/// Slug pattern: starts with alphanumeric, allows hyphens/underscores
static SLUG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9_-]{0,63}$").expect("invalid slug regex")
});

/// Validated post id (slug format)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostId(String);

impl PostId {
    /// Create a new post id, validating slug format.
    ///
    /// # Rules
    /// - Max 64 characters
    /// - Lowercase alphanumeric, hyphens, underscores
    /// - Must start with alphanumeric
    ///
    /// # Example
    /// ```
    /// use roster_server::models::PostId;
    ///
    /// assert!(PostId::new("test-post-1").is_ok());
    /// assert!(PostId::new("Test Post").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "post id" });
        }

        if s.len() > MAX_POST_ID_LEN {
            return Err(ValidationError::TooLong {
                field: "post id",
                max: MAX_POST_ID_LEN,
            });
        }

        if !SLUG_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "post id",
                reason: "must be lowercase alphanumeric with hyphens/underscores, starting with alphanumeric",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PostId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated post title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTitle(String);

impl PostTitle {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }

        if s.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
