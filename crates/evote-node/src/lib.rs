//! # E-Voting Node Library
//!
//! Exposes the node's modules for testing. The main entry point is the
//! `main.rs` binary.
//!
//! - `config` - Program and telemetry settings from the environment
//! - `keyring` - Label to key mapping for scripted signers
//! - `script` - JSON transaction scripts
//! - `runtime` - Hosts the program and replays scripts

#![warn(missing_docs)]

pub mod config;
pub mod keyring;
pub mod runtime;
pub mod script;

pub use config::{ConfigError, NodeConfig};
pub use runtime::{NodeRuntime, ProposalView, RunError, RunReport, StepReport};
pub use script::{Action, ProposalRef, Script, ScriptError, Step};
