use redis::{aio::MultiplexedConnection, Client};
use redis::{AsyncCommands, ExistenceCheck, SetExpiry, SetOptions};
use std::error::Error;
use std::fmt;
use tokio::sync::OnceCell;

// Small helper to shorten CRUD error mapping
fn crud<E: ToString>(e: E) -> RedisServiceErr {
    RedisServiceErr::CRUDErr(e.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum RedisServiceErr {
    ConnectionErr(String),
    CRUDErr(String),
}

impl fmt::Display for RedisServiceErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedisServiceErr::ConnectionErr(str) => {
                write!(f, "error while connection to instance: {str}")
            }
            RedisServiceErr::CRUDErr(str) => write!(f, "error while performing CRUD action: {str}"),
        }
    }
}

impl Error for RedisServiceErr {}

/// Thin string-valued Redis client. The multiplexed connection is opened on
/// first use and shared by every caller afterwards.
pub struct RedisService {
    client: Client,
    conn: OnceCell<MultiplexedConnection>,
}

impl RedisService {
    pub fn new(host_url: &str) -> Result<Self, RedisServiceErr> {
        let formatted_url = format!("redis://{}/", host_url);
        let client =
            Client::open(formatted_url).map_err(|e| RedisServiceErr::ConnectionErr(e.to_string()))?;
        Ok(Self {
            client,
            conn: OnceCell::new(),
        })
    }

    async fn get_connection(&self) -> Result<MultiplexedConnection, RedisServiceErr> {
        self.conn
            .get_or_try_init(|| async {
                self.client
                    .get_multiplexed_async_connection()
                    .await
                    .map_err(|e| RedisServiceErr::ConnectionErr(e.to_string()))
            })
            .await
            .cloned()
    }

    /// `SET key value NX EX ttl`. Returns false when the key already exists.
    pub async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: usize,
    ) -> Result<bool, RedisServiceErr> {
        // Clamp TTL to at least 1 second to avoid immediate expiration
        let ttl = if ttl == 0 { 1 } else { ttl };
        let mut conn = self.get_connection().await?;
        let opts = SetOptions::default()
            .conditional_set(ExistenceCheck::NX)
            .with_expiration(SetExpiry::EX(ttl as _));
        let reply: Option<String> = conn.set_options(key, value, opts).await.map_err(crud)?;
        Ok(reply.is_some())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, RedisServiceErr> {
        let mut conn = self.get_connection().await?;
        conn.get(key).await.map_err(crud)
    }

    /// `GETDEL key`: only one of several concurrent callers gets the value.
    pub async fn get_del(&self, key: &str) -> Result<Option<String>, RedisServiceErr> {
        let mut conn = self.get_connection().await?;
        conn.get_del(key).await.map_err(crud)
    }

    pub async fn delete_key(&self, key: &str) -> Result<bool, RedisServiceErr> {
        let mut conn = self.get_connection().await?;
        let deleted: i32 = conn.del(key).await.map_err(crud)?;
        Ok(deleted > 0)
    }
}
