//! Error Types

use thiserror::Error;

use crate::draft::ValidationError;
use crate::flow::TransitionError;

/// Result type alias for signup operations
pub type Result<T> = std::result::Result<T, SignupError>;

/// Shown for every transport failure; the user may resubmit.
pub const NETWORK_MESSAGE: &str = "Network error. Please try again.";

/// Shown when the returned payment could not be verified.
pub const VERIFICATION_MESSAGE: &str = "Payment verification failed. Please contact support.";

/// Signup flow errors
#[derive(Error, Debug)]
pub enum SignupError {
    /// Client-side validation failed; no request was sent
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Backend answered with `success: false`
    #[error("Rejected by backend: {0}")]
    Rejected(String),

    /// Request never produced a usable response
    #[error("Network error: {0}")]
    Network(String),

    /// Payment session could not be verified (terminal for this page load)
    #[error("Payment verification failed: {0}")]
    PaymentVerification(String),

    /// Event not valid in the current flow state
    #[error(transparent)]
    Transition(TransitionError),

    /// Durable store read/write failed
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Navigation could not be performed
    #[error("Navigation error: {0}")]
    Navigation(String),
}

/// Durable store failures
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying storage is unavailable (e.g. disabled in the browser)
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Write rejected (quota, permissions)
    #[error("write failed for {key}: {reason}")]
    Write { key: String, reason: String },

    /// Stored value could not be decoded
    #[error("corrupt value under {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

impl From<TransitionError> for SignupError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::Validation(e) => Self::Validation(e),
            other => Self::Transition(other),
        }
    }
}

impl SignupError {
    /// Check if the user may resubmit the triggering action
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Rejected(_) | Self::Network(_) | Self::Storage(_)
        )
    }

    /// Convert to the message shown above the form
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Rejected(msg) => msg.clone(),
            Self::Network(_) => NETWORK_MESSAGE.into(),
            Self::PaymentVerification(_) => VERIFICATION_MESSAGE.into(),
            Self::Storage(_) => {
                "Your browser blocked session storage. Enable it and try again.".into()
            }
            Self::Transition(_) | Self::Navigation(_) => {
                "An unexpected error occurred. Please refresh the page.".into()
            }
        }
    }
}
