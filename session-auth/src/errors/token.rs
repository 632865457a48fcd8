use thiserror::Error;

use crate::domain::StoreError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("token could not be decoded")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("session not found, please log in again")]
    SessionNotFound,

    #[error("session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("operation canceled")]
    Canceled,

    #[error("operation timed out")]
    Timeout,

    #[error("Something went wrong, please try again later.")]
    Internal(String),
}

impl TokenError {
    /// Only a store outage is worth retrying; every other kind is final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TokenError::StoreUnavailable(_))
    }
}

impl From<StoreError> for TokenError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(msg) => TokenError::StoreUnavailable(msg),
            StoreError::Corrupted(msg) => TokenError::Internal(msg),
            StoreError::KeyExists => TokenError::Internal("session key collision".to_string()),
        }
    }
}
