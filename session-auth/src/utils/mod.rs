pub mod clock;
pub mod config;
pub mod context;
pub mod telemetry;

pub use clock::*;
pub use config::*;
pub use context::*;
pub use telemetry::*;
