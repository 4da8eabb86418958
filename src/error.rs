//! Custom error types for prompt-fit.
//!
//! This module contains all error types used throughout the crate.
//! Each error type implements Display, Debug, Clone, PartialEq, Eq, and std::error::Error.
//!
//! No external error crates (anyhow, thiserror, eyre) are used.

use std::fmt;

/// Errors that can occur when configuring models or building handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelError {
    /// The specific error that occurred
    pub kind: ModelErrorKind,
}

/// Specific model error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelErrorKind {
    /// The requested model is not in the registry
    UnknownModel {
        /// The identifier that was requested
        model: String,
    },
    /// No API key was provided and none was found in the environment
    MissingApiKey,
    /// The HTTP client could not be constructed
    HttpClientFailed {
        /// Reason for the failure
        reason: String,
    },
    /// The tokenizer encoding could not be loaded
    TokenizerInit {
        /// Reason for the failure
        reason: String,
    },
}

impl ModelError {
    /// Creates a new ModelError with the given kind.
    #[must_use]
    pub fn new(kind: ModelErrorKind) -> Self {
        Self { kind }
    }

    /// Creates an unknown model error.
    #[must_use]
    pub fn unknown_model(model: impl Into<String>) -> Self {
        Self::new(ModelErrorKind::UnknownModel {
            model: model.into(),
        })
    }

    /// Creates a missing API key error.
    #[must_use]
    pub fn missing_api_key() -> Self {
        Self::new(ModelErrorKind::MissingApiKey)
    }

    /// Creates an HTTP client failed error.
    #[must_use]
    pub fn http_client_failed(reason: impl Into<String>) -> Self {
        Self::new(ModelErrorKind::HttpClientFailed {
            reason: reason.into(),
        })
    }

    /// Creates a tokenizer init error.
    #[must_use]
    pub fn tokenizer_init(reason: impl Into<String>) -> Self {
        Self::new(ModelErrorKind::TokenizerInit {
            reason: reason.into(),
        })
    }

    /// Returns true if this error indicates the model was not found.
    #[must_use]
    pub fn is_unknown_model(&self) -> bool {
        matches!(self.kind, ModelErrorKind::UnknownModel { .. })
    }

    /// Returns true if this error indicates a missing API key.
    #[must_use]
    pub fn is_missing_api_key(&self) -> bool {
        matches!(self.kind, ModelErrorKind::MissingApiKey)
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ModelErrorKind::UnknownModel { model } => {
                write!(
                    f,
                    "model '{}' is not in the registry; see available_models() for supported identifiers",
                    model
                )
            }
            ModelErrorKind::MissingApiKey => {
                write!(
                    f,
                    "no API key provided; pass one explicitly or set the OPENAI_KEY environment variable"
                )
            }
            ModelErrorKind::HttpClientFailed { reason } => {
                write!(f, "failed to create HTTP client: {}", reason)
            }
            ModelErrorKind::TokenizerInit { reason } => {
                write!(f, "failed to load tokenizer encoding: {}", reason)
            }
        }
    }
}

impl std::error::Error for ModelError {}
