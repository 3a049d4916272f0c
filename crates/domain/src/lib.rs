//! Domain layer for wa-bridge
//!
//! Contains the request/response vocabulary exchanged with the bridge engine:
//! commands, results, and the value objects that address an account and a chat.
//! This layer has no knowledge of how the engine is reached.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
