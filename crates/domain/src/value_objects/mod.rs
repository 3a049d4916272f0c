//! Value Objects - Immutable, identity-less domain primitives

mod account_id;
mod chat_target;
mod connection_uri;

pub use account_id::AccountId;
pub use chat_target::ChatTarget;
pub use connection_uri::ConnectionUri;
