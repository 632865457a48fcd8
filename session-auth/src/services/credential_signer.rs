use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, decode_header, encode, Algorithm, Header, Validation};
use uuid::Uuid;

use crate::domain::{AccessClaims, JwtKeyStore, Payload};
use crate::errors::TokenError;
use crate::utils::{Clock, Config, ConfigError};

/// Signs and checks access tokens (HS256 JWT). No I/O and no state beyond the
/// key set, so one instance can be shared by every request.
///
/// Verification outcomes:
/// - `Malformed`: not a three-segment token, or claims that cannot be decoded
///   even though the MAC checks out
/// - `InvalidSignature`: MAC mismatch, unknown `kid`, wrong algorithm, issuer
///   or audience (anything that says "not minted here")
/// - `Expired`: `now > exp` on the injected clock
#[derive(Clone)]
pub struct CredentialSigner {
    keys: JwtKeyStore,
    issuer: String,
    audience: String,
    clock: Arc<dyn Clock>,
}

impl CredentialSigner {
    pub fn new(
        keys: JwtKeyStore,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            audience: audience.into(),
            clock,
        }
    }

    pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        let keys = JwtKeyStore::new(config.jwt_keys(), config.jwt_active_kid())?;
        Ok(Self::new(
            keys,
            config.jwt_issuer(),
            config.jwt_audience(),
            clock,
        ))
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Sign `payload` with the active key, valid until `expires_at` inclusive.
    /// Sub-second precision is dropped, so the token never outlives `expires_at`.
    pub fn issue(&self, payload: &Payload, expires_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = AccessClaims {
            sub: payload.subject_id().to_string(),
            role: payload.role(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: expires_at.timestamp(),
            iat: self.clock.now().timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let (enc_key, kid) = self.keys.encoding_key_and_kid();
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(kid.to_string());

        encode(&header, &claims, enc_key).map_err(|e| TokenError::Internal(e.to_string()))
    }

    /// Check signature, issuer, audience and expiry of `token`.
    ///
    /// Only a token that is not three non-empty segments counts as
    /// `Malformed`. Three segments of junk such as `"x.y.z"` come back as
    /// `InvalidSignature`, so that error also fires on plain garbage and
    /// should not be logged as a confirmed forgery on its own.
    pub fn verify(&self, token: &str) -> Result<Payload, TokenError> {
        if !is_three_segments(token) {
            return Err(TokenError::Malformed);
        }

        // The header is covered by the MAC, so failing to read it from a
        // structurally complete token means it was altered.
        let header = decode_header(token).map_err(|_| TokenError::InvalidSignature)?;
        let key = self
            .keys
            .decoding_key_for_kid(header.kid.as_deref())
            .ok_or(TokenError::InvalidSignature)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        // Expiry is checked below against our own clock.
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = decode::<AccessClaims>(token, key, &validation).map_err(classify)?;

        let expires_at =
            DateTime::from_timestamp(data.claims.exp, 0).ok_or(TokenError::Malformed)?;
        if self.clock.now() > expires_at {
            return Err(TokenError::Expired);
        }

        Payload::new(data.claims.sub, data.claims.role).map_err(|_| TokenError::Malformed)
    }
}

fn is_three_segments(token: &str) -> bool {
    let mut count = 0;
    for segment in token.split('.') {
        if segment.is_empty() {
            return false;
        }
        count += 1;
    }
    count == 3
}

fn classify(e: JwtError) -> TokenError {
    match e.kind() {
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
