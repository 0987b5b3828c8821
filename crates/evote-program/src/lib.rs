//! # E-Voting Program
//!
//! A state-transition program for proposals and yes/no votes over a keyed
//! record store.
//!
//! ## Purpose
//!
//! Authors create proposals with a bounded description. Any identity may vote
//! once per proposal. Every record lives at an address derived from its
//! identifying seeds, so uniqueness is enforced by address occupancy.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Description ≤ 50 bytes | `domain/invariants.rs` - `validate_description()` |
//! | Votes only while ongoing | `domain/invariants.rs` - `validate_voting_open()` |
//! | One proposal per (author, pid) | `adapters/memory_store.rs` - insert-if-absent |
//! | One vote per (voter, proposal) | `adapters/memory_store.rs` - insert-if-absent |
//! | Tally equals vote records | `service.rs` - single atomic write batch |
//! | Counters never wrap | `domain/entities.rs` - `Proposal::record_vote()` |
//!
//! ## Record Addresses
//!
//! | Record | Seeds |
//! |--------|-------|
//! | `Proposal` | `"proposal"`, author, `[pid]` |
//! | `Vote` | `"vote"`, proposal address, voter |
//!
//! Each address is `sha256(seeds ‖ bump ‖ program_id ‖ "ProgramDerivedAddress")`
//! for the highest bump that lands off the Ed25519 curve.
//!
//! ## Instructions
//!
//! | Instruction | Success | Failures |
//! |-------------|---------|----------|
//! | `create` | new ongoing proposal, counters 0 | `DescriptionTooLong`, `AccountAlreadyInitialized` |
//! | `vote_yes` | `yes_votes += 1`, new vote | `AccountNotInitialized`, `VotingSessionIsClosed`, `DuplicatedVoteNotAllowed` |
//! | `vote_no` | `no_votes += 1`, new vote | `AccountNotInitialized`, `VotingSessionIsClosed`, `DuplicatedVoteNotAllowed` |
//!
//! ## Usage Example
//!
//! ```ignore
//! use ed25519_dalek::SigningKey;
//! use evote_program::prelude::*;
//!
//! let service = create_test_service();
//! let author = SigningKey::from_bytes(&[1u8; 32]);
//! let voter = SigningKey::from_bytes(&[2u8; 32]);
//! let receipt = service.create(&author, 0, "Proposal #1".into()).await?;
//! service.vote_yes(&voter, receipt.proposal_address()).await?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{Proposal, Vote, VoteChoice};

    // Value objects
    pub use crate::domain::value_objects::{Address, ProposalId};

    // Domain services
    pub use crate::domain::services::{
        create_program_address, default_program_id, find_program_address,
        find_proposal_address, find_vote_address,
    };

    // Record codec
    pub use crate::domain::codec::AccountRecord;

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::{
        Instruction, Transaction, TransactionReceipt, TransitionOutcome, VotingApi,
    };
    pub use crate::ports::outbound::{EventPublisher, RecordStore, StoredRecord, WriteBatch};

    // Events
    pub use crate::events::{topics, ProgramEvent};

    // Errors
    pub use crate::errors::{AddressError, StoreError, VotingError};

    // Adapters
    pub use crate::adapters::{InMemoryEventLog, InMemoryRecordStore, TracingEventPublisher};

    // Service
    pub use crate::service::{create_test_service, ServiceConfig, ServiceStats, VotingService};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Program name, hashed into the default program id.
pub const PROGRAM_NAME: &str = "e_voting";

// =============================================================================
// TESTS
// =============================================================================
