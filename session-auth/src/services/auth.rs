use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{Payload, PasswordComparator, PrincipalRecord, PrincipalStore, TokenPair};
use crate::errors::{LoginError, TokenError};
use crate::services::{TokenService, DUMMY_PASSWORD_HASH};
use crate::utils::OpContext;

/// Checks name/password against users first, then musicians, and opens a
/// session for whoever matches.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn PrincipalStore>,
    musicians: Arc<dyn PrincipalStore>,
    passwords: Arc<dyn PasswordComparator>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn PrincipalStore>,
        musicians: Arc<dyn PrincipalStore>,
        passwords: Arc<dyn PasswordComparator>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            musicians,
            passwords,
            tokens,
        }
    }

    pub fn token_service(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    async fn find_principal(&self, name: &str) -> Result<Option<PrincipalRecord>, LoginError> {
        for store in [&self.users, &self.musicians] {
            let found = store
                .find_by_name(name)
                .await
                .map_err(|e| LoginError::PrincipalStoreUnavailable(e.to_string()))?;
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }

    /// Verify `name`/`password` and open a session. Lookups, the password
    /// check and the session write all run under `ctx`.
    pub async fn log_in(
        &self,
        ctx: &OpContext,
        name: &str,
        password: &str,
    ) -> Result<TokenPair, LoginError> {
        ctx.run(self.authenticate(ctx, name, password)).await
    }

    async fn authenticate(
        &self,
        ctx: &OpContext,
        name: &str,
        password: &str,
    ) -> Result<TokenPair, LoginError> {
        let Some(record) = self.find_principal(name).await? else {
            // Pay for a full hash check anyway so the reply takes as long as
            // a wrong password would.
            self.passwords.compare(DUMMY_PASSWORD_HASH, password).await;
            debug!(name, "login failed: unknown name");
            return Err(LoginError::InvalidCredentials);
        };

        if !self.passwords.compare(&record.password_hash, password).await {
            debug!(name, "login failed: password mismatch");
            return Err(LoginError::InvalidCredentials);
        }

        // A record with an empty id cannot be turned into a session.
        let payload = Payload::new(record.subject_id, record.role)
            .map_err(|_| LoginError::InvalidCredentials)?;
        let role = payload.role();

        let pair = self.tokens.issue(ctx, payload).await?;
        info!(name, %role, "logged in");
        Ok(pair)
    }

    pub async fn refresh(&self, ctx: &OpContext, refresh_token: &str) -> Result<TokenPair, TokenError> {
        self.tokens.refresh(ctx, refresh_token).await
    }

    /// Always appears to succeed for the caller unless the store is down or the
    /// context is canceled.
    pub async fn log_out(&self, ctx: &OpContext, refresh_token: &str) -> Result<(), TokenError> {
        self.tokens.revoke(ctx, refresh_token).await
    }
}
