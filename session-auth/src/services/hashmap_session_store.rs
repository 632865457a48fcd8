use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{Payload, SessionStore, StoreError};
use crate::utils::{Clock, SystemClock};

struct Entry {
    payload: Payload,
    expires_at: DateTime<Utc>,
}

/// In-process session store. Expiry is checked lazily against the clock, so an
/// expired entry behaves exactly like a missing one.
pub struct HashmapSessionStore {
    // store key -> session
    sessions: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl Default for HashmapSessionStore {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl HashmapSessionStore {
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Live (unexpired) sessions.
    pub async fn len(&self) -> usize {
        let now = self.clock.now();
        let sessions = self.sessions.lock().await;
        sessions.values().filter(|e| e.expires_at > now).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for HashmapSessionStore {
    async fn set(&self, key: &str, payload: &Payload, ttl: Duration) -> Result<(), StoreError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;
        if sessions.get(key).is_some_and(|e| e.expires_at > now) {
            return Err(StoreError::KeyExists);
        }
        // Drop whatever has expired while we hold the lock anyway.
        sessions.retain(|_, e| e.expires_at > now);
        sessions.insert(
            key.to_string(),
            Entry {
                payload: payload.clone(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Payload>, StoreError> {
        let now = self.clock.now();
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .get(key)
            .filter(|e| e.expires_at > now)
            .map(|e| e.payload.clone()))
    }

    async fn take(&self, key: &str) -> Result<Option<Payload>, StoreError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;
        Ok(sessions
            .remove(key)
            .filter(|e| e.expires_at > now)
            .map(|e| e.payload))
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;
        Ok(sessions.remove(key).is_some_and(|e| e.expires_at > now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::utils::ManualClock;

    fn payload() -> Payload {
        Payload::new("u1", Role::User).unwrap()
    }

    #[tokio::test]
    async fn set_get_take() {
        let store = HashmapSessionStore::default();
        store.set("k", &payload(), Duration::seconds(60)).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(payload()));
        assert_eq!(store.take("k").await.unwrap(), Some(payload()));
        assert_eq!(store.take("k").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn set_refuses_live_key() {
        let store = HashmapSessionStore::default();
        store.set("k", &payload(), Duration::seconds(60)).await.unwrap();
        let again = store.set("k", &payload(), Duration::seconds(60)).await;
        assert_eq!(again, Err(StoreError::KeyExists));
    }

    #[tokio::test]
    async fn expired_entries_look_missing() {
        let clock = Arc::new(ManualClock::default());
        let store = HashmapSessionStore::with_clock(clock.clone());
        store.set("k", &payload(), Duration::seconds(10)).await.unwrap();

        clock.advance(Duration::seconds(10));
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(!store.delete("k").await.unwrap());

        // an expired key can be reused
        store.set("k", &payload(), Duration::seconds(10)).await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = HashmapSessionStore::default();
        store.set("k", &payload(), Duration::seconds(60)).await.unwrap();
        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
        assert!(!store.delete("never-set").await.unwrap());
    }
}
