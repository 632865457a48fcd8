#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Duration;

use session_auth::domain::{PasswordComparator, Payload, SessionStore, StoreError};
use session_auth::services::{
    Argon2PasswordComparator, CredentialSigner, HashmapSessionStore, TokenService,
};
use session_auth::utils::{Config, ManualClock};

pub const ISSUER: &str = "media-platform";
pub const AUDIENCE: &str = "media-clients";

/// Config with the lifetimes used throughout the suite: access 5s, refresh 1h.
pub fn test_config(secret: u8) -> Config {
    Config::new(
        ISSUER,
        AUDIENCE,
        5,
        3600,
        [secret; 32],
        vec![("k1".to_string(), vec![secret; 32])],
        "k1",
    )
    .expect("failed to build test config")
}

pub fn token_service_with_store(
    store: Arc<dyn SessionStore>,
    clock: Arc<ManualClock>,
) -> TokenService {
    TokenService::from_config(&test_config(7), store, clock).expect("token service")
}

/// Token service over an in-memory store, both driven by the same manual clock.
pub fn in_memory_token_service(
    clock: Arc<ManualClock>,
) -> (TokenService, Arc<HashmapSessionStore>) {
    let store = Arc::new(HashmapSessionStore::with_clock(clock.clone()));
    (token_service_with_store(store.clone(), clock), store)
}

pub fn signer_for(config: &Config, clock: Arc<ManualClock>) -> CredentialSigner {
    CredentialSigner::from_config(config, clock).expect("signer")
}

/// A store whose backend is unreachable.
pub struct UnavailableStore;

#[async_trait]
impl SessionStore for UnavailableStore {
    async fn set(&self, _key: &str, _payload: &Payload, _ttl: Duration) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
    async fn get(&self, _key: &str) -> Result<Option<Payload>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
    async fn take(&self, _key: &str) -> Result<Option<Payload>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
    async fn delete(&self, _key: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Wraps a store and stalls every call before delegating.
pub struct SlowStore {
    pub inner: HashmapSessionStore,
    pub delay: StdDuration,
}

#[async_trait]
impl SessionStore for SlowStore {
    async fn set(&self, key: &str, payload: &Payload, ttl: Duration) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.set(key, payload, ttl).await
    }
    async fn get(&self, key: &str) -> Result<Option<Payload>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }
    async fn take(&self, key: &str) -> Result<Option<Payload>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.take(key).await
    }
    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(key).await
    }
}

/// Argon2 comparator that records every hash it was asked to check.
#[derive(Default)]
pub struct CountingComparator {
    inner: Argon2PasswordComparator,
    calls: AtomicUsize,
    hashes: std::sync::Mutex<Vec<String>>,
}

impl CountingComparator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn hashes(&self) -> Vec<String> {
        self.hashes.lock().expect("hashes lock").clone()
    }
}

#[async_trait]
impl PasswordComparator for CountingComparator {
    async fn compare(&self, hash: &str, plaintext: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.hashes.lock().expect("hashes lock").push(hash.to_string());
        self.inner.compare(hash, plaintext).await
    }
}
