//! # Error Handling
//!
//! This module provides the error type shared by the normalization pipeline,
//! the inference client, and the session layer, together with classification
//! traits used at the retry boundary.
//!
//! ## Error Classification
//!
//! - `Retryable`: whether repeating the same action can succeed. Transport
//!   failures against the inference service are retryable; a response that
//!   parsed as garbage is not, because retrying the identical request cannot
//!   fix a prompt/contract mismatch.
//! - `classify`: coarse predicates the driver uses to pick a user message.
//!
//! ## Propagation Policy
//!
//! Normalization errors abort the current batch before any network call is
//! made. Collaborator errors are caught at the session boundary and surface
//! as a failed, retryable state; they never tear down the driver.

use std::{error::Error as StdError, fmt};

/// Base error type for the analysis pipeline.
#[derive(Debug)]
pub enum SnapError {
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
    },
    /// The input bytes could not be decoded into a bitmap
    Decode { reason: String },
    /// Resampling or JPEG re-encoding failed
    Encode { reason: String },
    /// Reading an input file failed
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
    },
    /// The inference service call failed in transport or returned an error status
    Collaborator {
        operation: String,
        detail: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
    /// The inference service answered, but the answer did not parse into a report
    MalformedReport { detail: String },
    /// An analysis was requested with no images selected
    NoImages,
    /// The analysis was cancelled by a session reset before it completed
    Cancelled,
}

impl SnapError {
    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a decode error
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    /// Create an encode error
    pub fn encode(reason: impl Into<String>) -> Self {
        Self::Encode {
            reason: reason.into(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, path: Option<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path,
            source,
        }
    }

    /// Create a collaborator transport/status error
    pub fn collaborator(
        operation: impl Into<String>,
        detail: impl Into<String>,
        source: Option<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::Collaborator {
            operation: operation.into(),
            detail: detail.into(),
            source,
        }
    }

    /// Create a malformed-report error
    pub fn malformed_report(detail: impl Into<String>) -> Self {
        Self::MalformedReport {
            detail: detail.into(),
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Decode { .. } => "decode",
            Self::Encode { .. } => "encode",
            Self::Io { .. } => "io",
            Self::Collaborator { .. } => "collaborator",
            Self::MalformedReport { .. } => "malformed_report",
            Self::NoImages => "no_images",
            Self::Cancelled => "cancelled",
        }
    }

    /// The message shown to the user by the driver, per error class.
    /// Collaborator failures carry their raw detail to aid debugging.
    pub fn user_message(&self) -> String {
        match self {
            Self::Decode { .. } => {
                "That file is not a readable image. Please choose a valid photo.".to_string()
            }
            Self::Encode { .. } => {
                "Something went wrong while preparing the photo. Please try again.".to_string()
            }
            Self::Collaborator { detail, .. } => {
                format!("The analysis service could not be reached ({detail}). Please retry.")
            }
            Self::MalformedReport { detail } => {
                format!("The analysis service answered in an unexpected format ({detail}).")
            }
            Self::NoImages => "Add at least one photo before analyzing.".to_string(),
            Self::Cancelled => "Analysis was cancelled.".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for SnapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapError::Config {
                field,
                value,
                reason,
            } => {
                write!(
                    f,
                    "Configuration error in '{}': {} (value: {})",
                    field, reason, value
                )
            }
            SnapError::Decode { reason } => write!(f, "Image decode failed: {}", reason),
            SnapError::Encode { reason } => write!(f, "Image encode failed: {}", reason),
            SnapError::Io {
                operation,
                path,
                source,
            } => {
                if let Some(path) = path {
                    write!(f, "I/O error during {} on '{}': {}", operation, path, source)
                } else {
                    write!(f, "I/O error during {}: {}", operation, source)
                }
            }
            SnapError::Collaborator {
                operation, detail, ..
            } => {
                write!(f, "Inference call failed during {}: {}", operation, detail)
            }
            SnapError::MalformedReport { detail } => {
                write!(f, "Inference response did not parse as a report: {}", detail)
            }
            SnapError::NoImages => write!(f, "No images selected for analysis"),
            SnapError::Cancelled => write!(f, "Analysis cancelled"),
        }
    }
}

impl StdError for SnapError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Collaborator {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SnapError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", None, error)
    }
}

/// Result type alias using our custom error type
pub type SnapResult<T> = Result<T, SnapError>;

/// Trait for errors that can be retried
pub trait Retryable {
    /// Check if repeating the same action can succeed
    fn is_retryable(&self) -> bool;

    /// Get the recommended retry delay in milliseconds
    fn retry_delay_ms(&self) -> Option<u64> {
        None
    }
}

impl Retryable for SnapError {
    fn is_retryable(&self) -> bool {
        // Malformed reports are a contract mismatch; the identical request
        // would fail the same way, so they are explicitly not retryable.
        matches!(self, Self::Collaborator { .. } | Self::Io { .. })
    }

    fn retry_delay_ms(&self) -> Option<u64> {
        match self {
            Self::Collaborator { .. } => Some(2000),
            Self::Io { .. } => Some(100),
            _ => None,
        }
    }
}

/// Error classification utilities
pub mod classify {
    use super::*;

    /// Check if an error is transient (may resolve itself)
    pub fn is_transient(error: &SnapError) -> bool {
        matches!(error, SnapError::Collaborator { .. } | SnapError::Io { .. })
    }

    /// Check if the user can fix the error by changing their input
    pub fn is_user_fixable(error: &SnapError) -> bool {
        matches!(
            error,
            SnapError::Decode { .. } | SnapError::NoImages | SnapError::Config { .. }
        )
    }
}
