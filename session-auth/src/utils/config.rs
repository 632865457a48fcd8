use std::collections::HashSet;
use std::env;

use base64::engine::general_purpose::{STANDARD as B64_STD, URL_SAFE_NO_PAD as B64_URL};
use base64::Engine;
use dotenvy::dotenv;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_REDIS_HOST: &str = "127.0.0.1:6379";
const MIN_HS256_SECRET_LEN: usize = 32;

/// Immutable service configuration. Loaded once and shared behind an `Arc`.
#[derive(Clone)]
pub struct Config {
    issuer: String,
    audience: String,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
    session_hash_key_32: [u8; 32],
    jwt_keys: Vec<(String, Vec<u8>)>, // (kid, secret)
    active_kid: String,
    redis_host: String,
    store_timeout_ms: Option<u64>,
}

impl std::fmt::Debug for Config {
    // Key material stays out of logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_ttl_seconds", &self.access_ttl_seconds)
            .field("refresh_ttl_seconds", &self.refresh_ttl_seconds)
            .field("active_kid", &self.active_kid)
            .field("redis_host", &self.redis_host)
            .field("store_timeout_ms", &self.store_timeout_ms)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn jwt_issuer(&self) -> &str {
        &self.issuer
    }
    pub fn jwt_audience(&self) -> &str {
        &self.audience
    }
    pub fn token_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }
    pub fn refresh_token_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_seconds
    }
    pub fn session_hash_key(&self) -> &[u8; 32] {
        &self.session_hash_key_32
    }
    pub fn jwt_active_kid(&self) -> &str {
        &self.active_kid
    }
    pub fn jwt_keys(&self) -> &[(String, Vec<u8>)] {
        &self.jwt_keys
    }
    pub fn redis_host(&self) -> &str {
        &self.redis_host
    }
    pub fn store_timeout_ms(&self) -> Option<u64> {
        self.store_timeout_ms
    }

    /// Build a validated config from explicit values.
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        access_ttl_seconds: i64,
        refresh_ttl_seconds: i64,
        session_hash_key_32: [u8; 32],
        jwt_keys: Vec<(String, Vec<u8>)>,
        active_kid: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let active_kid = active_kid.into();

        if access_ttl_seconds <= 0 {
            return Err(ConfigError::Invalid("ACCESS_TTL_SECONDS"));
        }
        if refresh_ttl_seconds <= access_ttl_seconds {
            return Err(ConfigError::Invalid(
                "REFRESH_TTL_SECONDS must exceed ACCESS_TTL_SECONDS",
            ));
        }

        if jwt_keys.is_empty() {
            return Err(ConfigError::Invalid("empty JWT keys"));
        }
        let mut seen = HashSet::new();
        for (kid, secret) in &jwt_keys {
            if !seen.insert(kid.as_str()) {
                return Err(ConfigError::Invalid("duplicate kid in keys JSON"));
            }
            if secret.len() < MIN_HS256_SECRET_LEN {
                return Err(ConfigError::WrongLen(
                    "HS256 secret must be at least 32 bytes",
                ));
            }
        }
        if !seen.contains(active_kid.as_str()) {
            return Err(ConfigError::Invalid(
                "JWT_ACTIVE_KID not found in JWT_HS256_KEYS_JSON",
            ));
        }

        Ok(Self {
            issuer: issuer.into(),
            audience: audience.into(),
            access_ttl_seconds,
            refresh_ttl_seconds,
            session_hash_key_32,
            jwt_keys,
            active_kid,
            redis_host: DEFAULT_REDIS_HOST.to_string(),
            store_timeout_ms: None,
        })
    }

    pub fn with_redis_host(mut self, host: impl Into<String>) -> Self {
        self.redis_host = host.into();
        self
    }

    pub fn with_store_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.store_timeout_ms = timeout_ms;
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env in dev; no-op in prod if not present.
        let _ = dotenv();

        let issuer = req_var("JWT_ISSUER")?;
        let audience = req_var("JWT_AUDIENCE")?;

        let access_ttl_seconds = parse_i64("ACCESS_TTL_SECONDS")?;
        let refresh_ttl_seconds = parse_i64("REFRESH_TTL_SECONDS")?;

        let session_hash_key_b64 = req_var("SESSION_HASH_KEY_B64")?;
        let session_hash_key_vec = decode_b64_any(&session_hash_key_b64)
            .map_err(|_| ConfigError::Decode("SESSION_HASH_KEY_B64"))?;
        let session_hash_key_32: [u8; 32] = session_hash_key_vec.try_into().map_err(|_| {
            ConfigError::WrongLen("SESSION_HASH_KEY_B64 must decode to 32 bytes")
        })?;

        let active_kid = req_var("JWT_ACTIVE_KID")?;
        let jwt_keys = parse_hs256_keys_json("JWT_HS256_KEYS_JSON")?;

        let redis_host = opt_var("REDIS_HOST").unwrap_or_else(|| DEFAULT_REDIS_HOST.into());
        let store_timeout_ms = match opt_var("STORE_TIMEOUT_MS") {
            Some(v) => Some(
                v.parse::<u64>()
                    .map_err(|_| ConfigError::Invalid("STORE_TIMEOUT_MS"))?,
            ),
            None => None,
        };

        Ok(Self::new(
            issuer,
            audience,
            access_ttl_seconds,
            refresh_ttl_seconds,
            session_hash_key_32,
            jwt_keys,
            active_kid,
        )?
        .with_redis_host(redis_host)
        .with_store_timeout_ms(store_timeout_ms))
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("missing env var {0}")]
    Missing(&'static str),
    #[error("invalid env var {0}")]
    Invalid(&'static str),
    #[error("decode error in {0}")]
    Decode(&'static str),
    #[error("{0}")]
    WrongLen(&'static str),
}

fn req_var(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn opt_var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn parse_i64(key: &'static str) -> Result<i64, ConfigError> {
    let v = req_var(key)?;
    v.parse::<i64>().map_err(|_| ConfigError::Invalid(key))
}

fn decode_b64_any(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    // Try URL-safe (no padding) first, then standard.
    B64_URL.decode(s).or_else(|_| B64_STD.decode(s))
}

#[derive(Deserialize)]
struct HsKey {
    kid: String,
    secret_b64: String,
}

fn parse_hs256_keys_json(key_name: &'static str) -> Result<Vec<(String, Vec<u8>)>, ConfigError> {
    let raw = req_var(key_name)?;
    let parsed: Vec<HsKey> =
        serde_json::from_str(&raw).map_err(|_| ConfigError::Invalid(key_name))?;

    parsed
        .into_iter()
        .map(|k| {
            let secret =
                decode_b64_any(&k.secret_b64).map_err(|_| ConfigError::Decode(key_name))?;
            Ok((k.kid, secret))
        })
        .collect()
}
