//! Application layer - Use cases and orchestration
//!
//! Defines the port through which the bridge engine is reached and the
//! send / read / status use cases built on top of it.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
