//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for the voting program.
//! These are the interfaces between the domain and the outside world.
//!
//! - **Driving Ports (Inbound)**: `VotingApi`
//! - **Driven Ports (Outbound)**: `RecordStore`, `EventPublisher`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
