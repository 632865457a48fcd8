pub mod jwt_key_store;
pub mod principal_store;
pub mod session_store;
pub mod session_store_err;

pub use jwt_key_store::JwtKeyStore;
pub use principal_store::*;
pub use session_store::*;
pub use session_store_err::*;
