pub mod access_claims;
pub mod data_stores;
pub mod password;
pub mod payload;
pub mod principal;
pub mod token_pair;

pub use access_claims::*;
pub use data_stores::*;
pub use password::*;
pub use payload::*;
pub use principal::*;
pub use token_pair::*;
