//! Crate-level error taxonomy.
//!
//! Every public operation returns [`Error`]. Callers are expected to catch it
//! where the action was triggered and show [`Error::notice`] to the user;
//! nothing is retried and nothing escalates to a global handler.
use thiserror::Error;

use crate::api::ApiError;
use crate::navigation::Route;
use crate::session::SessionError;

// ============================================================================
// Validation
// ============================================================================

/// Input rejected before any request was built.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required form field was empty (after trimming).
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Unknown icon: {0}")]
    UnknownIcon(String),

    #[error("Unknown color: {0}")]
    UnknownColor(String),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("You must accept the terms and conditions")]
    TermsNotAccepted,
}

// ============================================================================
// Error
// ============================================================================

#[derive(Debug, Error)]
pub enum Error {
    /// Detected locally; the backend was never contacted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No user id in the session. The current screen cannot continue.
    #[error("No signed-in user. Please log in again.")]
    Identity,

    /// Network failure, non-2xx status or malformed response.
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl Error {
    /// Text to show the user for this failure.
    ///
    /// Server-side rejections carry the backend's own `error` text when it
    /// sent one; everything else falls back to the error's display form.
    pub fn notice(&self) -> String {
        match self {
            Error::Api(ApiError::Status {
                message: Some(message),
                ..
            }) => message.clone(),
            Error::Api(ApiError::Network(_)) | Error::Api(ApiError::Timeout(_)) => {
                "Connection error. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Where the shell should go after showing the notice, if anywhere.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Error::Identity => Some(Route::Login),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Trim `value` and fail with [`ValidationError::MissingField`] when nothing is left.
pub(crate) fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field).into());
    }
    Ok(trimmed)
}
