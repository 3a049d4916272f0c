//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod bridge_port;

pub use bridge_port::BridgePort;
#[cfg(test)]
pub use bridge_port::MockBridgePort;
