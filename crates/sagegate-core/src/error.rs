//! Error taxonomy for the gateway.
//!
//! Every failure a request can hit is folded into [`GatewayError`]. Adapters
//! map it onto their transport (the proxy renders it as an OpenAI error
//! envelope); the core only knows the classification, a stable machine code
//! and a suggested HTTP status.

use thiserror::Error;

use crate::ports::BackendError;

/// Classified failure for a single gateway request.
///
/// All variants are terminal for the request that produced them. Nothing in
/// the core retries.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Client-caused, never reaches the backend.
    #[error("{message}")]
    Validation {
        /// Stable reason code (e.g. `invalid_max_tokens`).
        code: &'static str,
        /// Human-readable description.
        message: String,
    },

    /// The backend could not be reached or reported a service failure.
    #[error("Backend invocation failed: {0}")]
    BackendInvocation(String),

    /// The backend answered, but not in any accepted shape.
    #[error("Malformed backend response: {0}")]
    BackendResponseFormat(String),

    /// No backend answer before the configured deadline.
    #[error("Backend did not respond before the deadline")]
    BackendTimeout,

    /// No route matches the request.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Anything unclassified.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Build a validation error with a stable reason code.
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    /// Classification tag surfaced as `error.type` to clients.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::BackendInvocation(_) => "backend_invocation_error",
            Self::BackendResponseFormat(_) => "backend_response_format_error",
            Self::BackendTimeout => "backend_timeout",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Finer-grained reason surfaced as `error.code`.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation { code, .. } => code,
            Self::BackendInvocation(_) => "upstream_error",
            Self::BackendResponseFormat(_) => "malformed_backend_response",
            Self::BackendTimeout => "upstream_timeout",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Returns a suggested HTTP status code for this error.
    #[must_use]
    pub const fn suggested_status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::NotFound(_) => 404,
            Self::BackendInvocation(_) | Self::BackendResponseFormat(_) => 502,
            Self::BackendTimeout => 504,
            Self::Internal(_) => 500,
        }
    }

    /// True when the request never left the gateway.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NotFound(_))
    }
}

impl From<BackendError> for GatewayError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Timeout => Self::BackendTimeout,
            BackendError::Transport(_) | BackendError::Status { .. } => {
                Self::BackendInvocation(err.to_string())
            }
        }
    }
}
