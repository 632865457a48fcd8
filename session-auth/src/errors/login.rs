use thiserror::Error;

use super::TokenError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoginError {
    // Same message whether the name or the password was wrong.
    #[error("invalid name or password")]
    InvalidCredentials,

    #[error("Something went wrong, please try again later.")]
    PrincipalStoreUnavailable(String),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl LoginError {
    pub fn is_retryable(&self) -> bool {
        match self {
            LoginError::InvalidCredentials => false,
            LoginError::PrincipalStoreUnavailable(_) => true,
            LoginError::Token(e) => e.is_retryable(),
        }
    }
}
