use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::{PrincipalRecord, PrincipalStore, PrincipalStoreError};

/// In-memory principal collection keyed by login name.
#[derive(Default)]
pub struct HashmapPrincipalStore {
    principals: RwLock<HashMap<String, PrincipalRecord>>,
}

impl HashmapPrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `name` is already taken.
    pub async fn add_principal(&self, name: impl Into<String>, record: PrincipalRecord) -> bool {
        let mut principals = self.principals.write().await;
        let name = name.into();
        if principals.contains_key(&name) {
            return false;
        }
        principals.insert(name, record);
        true
    }
}

#[async_trait]
impl PrincipalStore for HashmapPrincipalStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<PrincipalRecord>, PrincipalStoreError> {
        Ok(self.principals.read().await.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[tokio::test]
    async fn test_add_principal() {
        let store = HashmapPrincipalStore::new();
        let record = PrincipalRecord::new("u-1", "hash", Role::User);
        assert!(store.add_principal("lads", record.clone()).await);
        let other = PrincipalRecord::new("u-2", "other-hash", Role::User);
        assert!(!store.add_principal("lads", other).await);
        assert_eq!(Ok(Some(record)), store.find_by_name("lads").await);
    }

    #[tokio::test]
    async fn test_find_by_name() {
        let store = HashmapPrincipalStore::new();
        let record = PrincipalRecord::new("m-1", "hash", Role::Musician);
        store.add_principal("band", record.clone()).await;

        assert_eq!(Ok(Some(record)), store.find_by_name("band").await);
        assert_eq!(Ok(None), store.find_by_name("nobody").await);
    }
}
