use async_trait::async_trait;
use chrono::Duration;

use super::StoreError;
use crate::domain::Payload;

/// TTL-capable key-value storage for refresh sessions.
///
/// Every method is atomic for a single key. Implementations know nothing about
/// rotation or revocation; those rules live in `TokenService`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `payload` under `key` for `ttl`. Fails with `KeyExists` if the key is live.
    async fn set(&self, key: &str, payload: &Payload, ttl: Duration) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<Payload>, StoreError>;

    /// Read and delete in one step. Of several callers racing on the same key,
    /// at most one observes the payload.
    async fn take(&self, key: &str) -> Result<Option<Payload>, StoreError>;

    /// Remove `key`, returning whether it existed. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;
}

/// Store key for a refresh token. Only the keyed digest is persisted, never the token.
pub fn session_key(hash_key: &[u8; 32], refresh_token: &str) -> String {
    let digest = blake3::keyed_hash(hash_key, refresh_token.as_bytes());
    format!("session:{}", digest.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_key_depends_on_hash_key() {
        let a = session_key(&[1u8; 32], "token");
        let b = session_key(&[2u8; 32], "token");
        assert_ne!(a, b);
        assert_eq!(a, session_key(&[1u8; 32], "token"));
        assert!(a.starts_with("session:"));
        assert!(!a.contains("token"));
    }
}
