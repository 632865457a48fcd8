//! Token issuance, verification, rotation and revocation.
//!
//! Lifecycle of one login:
//! 1. `issue` -> `(access, refresh)`; the session `hash(refresh) -> payload`
//!    is written with the refresh TTL
//! 2. every request -> `verify_access` (signature + expiry only, no store)
//! 3. `refresh` consumes the presented refresh token and mints a new pair
//! 4. `revoke` deletes the session; idempotent
//!
//! Refresh tokens are single-use. The store's atomic take means two callers
//! racing on the same token see one success and one `SessionNotFound`.
//!
//! Access tokens cannot be revoked; their lifetime bounds the exposure of a
//! leaked one.
use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as B64, Engine};
use chrono::{Duration, SubsecRound};
use rand::RngCore;
use tracing::{debug, error, warn};

use crate::domain::{session_key, Caller, Payload, SessionStore, StoreError, TokenPair};
use crate::errors::TokenError;
use crate::services::CredentialSigner;
use crate::utils::{Clock, Config, ConfigError, OpContext};

#[derive(Clone)]
pub struct TokenService {
    signer: CredentialSigner,
    store: Arc<dyn SessionStore>,
    session_hash_key: [u8; 32],
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(
        signer: CredentialSigner,
        store: Arc<dyn SessionStore>,
        session_hash_key: [u8; 32],
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            signer,
            store,
            session_hash_key,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(
        config: &Config,
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let signer = CredentialSigner::from_config(config, clock)?;
        Ok(Self::new(
            signer,
            store,
            *config.session_hash_key(),
            Duration::seconds(config.token_ttl_seconds()),
            Duration::seconds(config.refresh_token_ttl_seconds()),
        ))
    }

    fn new_refresh_token_plain() -> String {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        B64.encode(bytes)
    }

    fn store_key(&self, refresh_token: &str) -> String {
        session_key(&self.session_hash_key, refresh_token)
    }

    // Sign an access token and persist a fresh session for `payload`.
    async fn mint(&self, payload: Payload) -> Result<TokenPair, TokenError> {
        // Token timestamps carry whole seconds; the reported expiries must
        // match what is signed.
        let now = self.signer.clock().now().trunc_subsecs(0);
        let access_expires_at = now + self.access_ttl;
        let refresh_expires_at = now + self.refresh_ttl;

        let access_token = self.signer.issue(&payload, access_expires_at)?;
        let refresh_token = Self::new_refresh_token_plain();

        self.store
            .set(&self.store_key(&refresh_token), &payload, self.refresh_ttl)
            .await
            .map_err(|e| store_failure("set", e))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Start a session for an already authenticated principal.
    pub async fn issue(&self, ctx: &OpContext, payload: Payload) -> Result<TokenPair, TokenError> {
        let subject = payload.subject_id().to_string();
        let pair = ctx.run(self.mint(payload)).await?;
        debug!(subject = %subject, "session issued");
        Ok(pair)
    }

    /// Stateless check of an access token. Never touches the session store.
    pub fn verify_access(&self, token: &str) -> Result<Payload, TokenError> {
        self.signer.verify(token).inspect_err(|e| {
            if *e == TokenError::InvalidSignature {
                warn!("access token failed signature check");
            }
        })
    }

    /// Consume `refresh_token` and return a new pair. A consumed, revoked or
    /// evicted token yields `SessionNotFound`.
    pub async fn refresh(
        &self,
        ctx: &OpContext,
        refresh_token: &str,
    ) -> Result<TokenPair, TokenError> {
        ctx.run(async {
            let payload = self
                .store
                .take(&self.store_key(refresh_token))
                .await
                .map_err(|e| store_failure("take", e))?
                .ok_or_else(|| {
                    debug!("refresh token not found, consumed or expired");
                    TokenError::SessionNotFound
                })?;

            self.mint(payload).await
        })
        .await
    }

    /// Delete the session behind `refresh_token`. Succeeds whether or not it existed.
    pub async fn revoke(&self, ctx: &OpContext, refresh_token: &str) -> Result<(), TokenError> {
        ctx.run(async {
            let existed = self
                .store
                .delete(&self.store_key(refresh_token))
                .await
                .map_err(|e| store_failure("delete", e))?;
            debug!(existed, "session revoked");
            Ok::<_, TokenError>(())
        })
        .await
    }

    /// Resolve the caller behind an optional access token. Any verification
    /// failure counts as unauthenticated.
    pub fn identify(&self, access_token: Option<&str>) -> Caller {
        match access_token.map(|t| self.verify_access(t)) {
            Some(Ok(payload)) => Caller::Authenticated(payload),
            Some(Err(e)) => {
                debug!(error = %e, "access token rejected");
                Caller::Unauthenticated
            }
            None => Caller::Unauthenticated,
        }
    }
}

fn store_failure(op: &'static str, e: StoreError) -> TokenError {
    error!(op, error = %e, "session store call failed");
    TokenError::from(e)
}
