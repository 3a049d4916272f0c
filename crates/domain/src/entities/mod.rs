//! Domain entities - The payloads that cross the engine boundary

mod bridge_command;
mod bridge_result;

pub use bridge_command::BridgeCommand;
pub use bridge_result::{BridgeResult, ResultStatus};
