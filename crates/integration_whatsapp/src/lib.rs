//! WhatsApp bridge gateway
//!
//! This crate is the caller side of the boundary to an external WhatsApp
//! bridge engine shipped as a shared library. The engine exports two C
//! symbols: a run function taking three NUL-terminated strings (connection
//! URI, account phone, JSON command) and returning a heap-allocated JSON
//! string, and a free function that releases that string.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐   WaRun(db, phone, json)   ┌─────────────────┐
//! │  BridgeGateway  │ ─────────────────────────► │  bridge engine  │
//! │  (This crate)   │ ◄───────────────────────── │  (libwa.so)     │
//! └─────────────────┘   char* JSON / WaFree      └─────────────────┘
//! ```
//!
//! Ownership of the returned string is held by an [`EngineBuffer`], which
//! hands it back to the engine exactly once when dropped.
//!
//! # Example
//!
//! ```no_run
//! use domain::{AccountId, BridgeCommand, ChatTarget, ConnectionUri};
//! use integration_whatsapp::{BridgeGateway, NativeEngine};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // SAFETY: `dist/libwa.so` is a trusted engine build exporting WaRun/WaFree.
//! let engine = unsafe { NativeEngine::load("dist/libwa.so") }?;
//! let gateway = BridgeGateway::new(engine);
//!
//! let command = BridgeCommand::send(ChatTarget::new("491234567890")?, "Hello!");
//! let result = gateway.invoke(
//!     &ConnectionUri::default(),
//!     &AccountId::new("+491111111111")?,
//!     Some(&command),
//! )?;
//! println!("sent: {:?}", result.message_id);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod async_gateway;
mod codec;
mod engine;
mod error;
mod gateway;
mod native;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use async_gateway::AsyncBridgeGateway;
pub use codec::{decode_result, encode_command};
pub use engine::{EngineAbi, EngineBuffer};
pub use error::GatewayError;
pub use gateway::{BridgeGateway, GatewayOptions};
pub use native::{EngineSymbols, NativeEngine};
