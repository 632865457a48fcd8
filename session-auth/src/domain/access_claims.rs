use serde::{Deserialize, Serialize};

use super::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String, // Subject (principal ID)
    pub role: Role,
    pub iss: String, // Issuer
    pub aud: String, // Audience
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at time
    pub jti: String, // JWT ID
}
