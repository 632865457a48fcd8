//! Session and token management for the media platform: access tokens that
//! verify without I/O, single-use refresh tokens backed by a TTL key-value
//! store, and name/password login for users and musicians.

pub mod domain;
pub mod errors;
pub mod services;
pub mod utils;

pub use domain::{Caller, Payload, Role, TokenPair};
pub use errors::{LoginError, TokenError};
pub use services::{AuthService, CredentialSigner, TokenService};
pub use utils::{Config, OpContext};
