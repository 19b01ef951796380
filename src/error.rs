//! Error handling module for vpnsplit
//!
//! Provides centralized error handling with proper error types using thiserror.
//! All errors in the crate should use these types for consistency.

use thiserror::Error;

/// Main error type for vpnsplit
#[derive(Error, Debug)]
pub enum VpnSplitError {
    /// IO errors (reading or writing configuration files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (loading, version gate, migration)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors (config values)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A host-list item was asked to classify its location but carries none.
    /// This signals a defect in the code that built the item, not a runtime
    /// condition worth retrying.
    #[error("host list item has no location")]
    MissingLocation,

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for vpnsplit operations
pub type Result<T> = std::result::Result<T, VpnSplitError>;

// Convenient error constructors
impl VpnSplitError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
