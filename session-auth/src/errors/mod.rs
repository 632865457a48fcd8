mod login;
mod token;

pub use login::*;
pub use token::*;
