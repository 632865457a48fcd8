use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;

use crate::{
    domain::{Payload, SessionStore, StoreError},
    services::data_stores::{RedisService, RedisServiceErr},
};

/// Sessions as plain Redis strings holding the JSON payload, expired by Redis itself.
pub struct RedisSessionStore {
    redis_service: Arc<RedisService>,
}

impl RedisSessionStore {
    pub fn new(redis_service: Arc<RedisService>) -> Self {
        Self { redis_service }
    }
}

fn unavailable(e: RedisServiceErr) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn decode(raw: Option<String>) -> Result<Option<Payload>, StoreError> {
    raw.map(|value| {
        serde_json::from_str::<Payload>(&value).map_err(|e| StoreError::Corrupted(e.to_string()))
    })
    .transpose()
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn set(&self, key: &str, payload: &Payload, ttl: Duration) -> Result<(), StoreError> {
        let value =
            serde_json::to_string(payload).map_err(|e| StoreError::Corrupted(e.to_string()))?;
        let ttl_seconds = ttl.num_seconds().max(1) as usize;

        let stored = self
            .redis_service
            .set_if_absent(key, &value, ttl_seconds)
            .await
            .map_err(unavailable)?;

        if stored {
            Ok(())
        } else {
            Err(StoreError::KeyExists)
        }
    }

    async fn get(&self, key: &str) -> Result<Option<Payload>, StoreError> {
        decode(self.redis_service.get(key).await.map_err(unavailable)?)
    }

    async fn take(&self, key: &str) -> Result<Option<Payload>, StoreError> {
        decode(self.redis_service.get_del(key).await.map_err(unavailable)?)
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.redis_service.delete_key(key).await.map_err(unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[test]
    fn decode_maps_missing_and_garbage() {
        assert_eq!(decode(None), Ok(None));

        let stored = serde_json::to_string(&Payload::new("m1", Role::Musician).unwrap()).unwrap();
        assert_eq!(
            decode(Some(stored)),
            Ok(Some(Payload::new("m1", Role::Musician).unwrap()))
        );

        assert!(matches!(
            decode(Some("not json".to_string())),
            Err(StoreError::Corrupted(_))
        ));
    }
}
