use async_trait::async_trait;
use thiserror::Error;

use crate::domain::PrincipalRecord;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrincipalStoreError {
    #[error("principal lookup failed: {0}")]
    Unavailable(String),
}

/// One principal collection (users or musicians), looked up by login name.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<PrincipalRecord>, PrincipalStoreError>;
}
