//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete implementations of the driven ports.
//!
//! - Adapters implement domain ports
//! - The domain never names an adapter type

pub mod event_log;
pub mod memory_store;

pub use event_log::*;
pub use memory_store::*;
