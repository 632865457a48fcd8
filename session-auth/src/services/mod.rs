pub mod argon2_password;
pub mod auth;
pub mod credential_signer;
pub mod data_stores;
pub mod hashmap_principal_store;
pub mod hashmap_session_store;
pub mod token_service;

pub use argon2_password::*;
pub use auth::*;
pub use credential_signer::*;
pub use data_stores::*;
pub use hashmap_principal_store::*;
pub use hashmap_session_store::*;
pub use token_service::*;
