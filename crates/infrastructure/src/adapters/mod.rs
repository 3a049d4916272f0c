//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod whatsapp_bridge_adapter;

pub use whatsapp_bridge_adapter::WhatsAppBridgeAdapter;
