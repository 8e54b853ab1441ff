//! Error types for criteria_align
//!
//! This module defines the error types used throughout the library.
//! Two failure scopes exist: per-document errors (a user story that cannot
//! be parsed) are isolated and skippable within a batch, while request-shape
//! errors are fatal to the whole request.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AlignError>;

/// Main error type for criteria_align
#[derive(Error, Debug, Clone)]
pub enum AlignError {
    /// The document does not contain a valid user story
    /// (missing role/goal markers or section sentinels)
    #[error("No user story: {message}")]
    NoUserStory { message: String },

    /// The batch request payload is missing required fields
    /// or is not valid JSON
    #[error("Malformed request: {message}")]
    MalformedRequest { message: String },

    /// A lookup into the external lexical taxonomy failed
    /// Note: callers degrade to literal-only treatment for the affected
    /// word instead of aborting the document
    #[error("Lexical lookup failed: {message}")]
    LexicalLookup { message: String },

    /// Configuration validation failed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The topic extraction collaborator failed for one text
    #[error("Extraction failed: {message}")]
    Extraction { message: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl AlignError {
    /// Create a no-user-story error
    pub fn no_user_story(message: impl Into<String>) -> Self {
        Self::NoUserStory {
            message: message.into(),
        }
    }

    /// Create a malformed request error
    pub fn malformed_request(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    /// Create a lexical lookup error
    pub fn lexical_lookup(message: impl Into<String>) -> Self {
        Self::LexicalLookup {
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an extraction error
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Check if this error may be isolated to a single document within a
    /// batch (parse or extraction failure) rather than failing the request
    pub fn is_document_scoped(&self) -> bool {
        matches!(
            self,
            Self::NoUserStory { .. } | Self::Extraction { .. } | Self::LexicalLookup { .. }
        )
    }
}

impl From<serde_json::Error> for AlignError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
