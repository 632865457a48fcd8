use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    #[error("stored session could not be decoded: {0}")]
    Corrupted(String),

    #[error("session key already exists")]
    KeyExists,
}
