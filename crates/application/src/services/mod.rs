//! Application services - Use case implementations

mod bridge_service;

pub use bridge_service::{BridgeOutcome, BridgeService, SessionOptions};
