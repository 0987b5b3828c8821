//! # Error Types
//!
//! All error types for the voting program.
//!
//! Every [`VotingError`] aborts the whole transition. Nothing is written, and
//! the caller receives a stable error name via [`VotingError::code`].

use crate::domain::value_objects::Address;
use thiserror::Error;

// =============================================================================
// ERROR CODE NUMBERS
// =============================================================================

/// Numeric error codes, grouped by origin.
pub mod codes {
    /// Record creation at an occupied address.
    pub const ACCOUNT_ALREADY_INITIALIZED: u32 = 0;
    /// Signer constraint violated.
    pub const CONSTRAINT_SIGNER: u32 = 2002;
    /// Seeds constraint violated.
    pub const CONSTRAINT_SEEDS: u32 = 2006;
    /// Record holds a different record type.
    pub const ACCOUNT_DISCRIMINATOR_MISMATCH: u32 = 3002;
    /// Record bytes could not be decoded.
    pub const ACCOUNT_DID_NOT_DESERIALIZE: u32 = 3003;
    /// Record could not be encoded.
    pub const ACCOUNT_DID_NOT_SERIALIZE: u32 = 3004;
    /// Referenced record does not exist.
    pub const ACCOUNT_NOT_INITIALIZED: u32 = 3012;
    /// Storage backend failure.
    pub const STORAGE_FAILURE: u32 = 4000;
    /// Address derivation failure.
    pub const INVALID_SEEDS: u32 = 4001;
    /// Description longer than the maximum.
    pub const DESCRIPTION_TOO_LONG: u32 = 6000;
    /// Proposal no longer accepts votes.
    pub const VOTING_SESSION_IS_CLOSED: u32 = 6001;
    /// Voter already voted on this proposal.
    pub const DUPLICATED_VOTE_NOT_ALLOWED: u32 = 6002;
    /// Yes counter would overflow.
    pub const MAX_YES_VOTES_REACHED: u32 = 6003;
    /// No counter would overflow.
    pub const MAX_NO_VOTES_REACHED: u32 = 6004;
}

// =============================================================================
// VOTING ERRORS
// =============================================================================

/// Errors returned by the voting program's transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VotingError {
    /// Description exceeds the byte limit.
    #[error("cannot initialize, description too long: {len} > {max} bytes")]
    DescriptionTooLong {
        /// Description length in bytes.
        len: usize,
        /// Maximum allowed length in bytes.
        max: usize,
    },

    /// Proposal is not ongoing.
    #[error("voting session is closed for proposal {0}")]
    VotingClosed(Address),

    /// A vote record already exists for this (voter, proposal).
    #[error("voter {voter} already voted on proposal {proposal}")]
    AlreadyVoted {
        /// Voter identity.
        voter: Address,
        /// Proposal address.
        proposal: Address,
    },

    /// Yes counter would overflow.
    #[error("maximum number of yes votes reached")]
    MaxYesVotesReached,

    /// No counter would overflow.
    #[error("maximum number of no votes reached")]
    MaxNoVotesReached,

    /// A proposal already exists at the derived address.
    #[error("account already initialized: {0}")]
    AddressCollision(Address),

    /// No proposal exists at the referenced address.
    #[error("proposal not found: {0}")]
    ProposalNotFound(Address),

    /// The record at this address is not of the expected type.
    #[error("account discriminator mismatch at {0}")]
    AccountDiscriminatorMismatch(Address),

    /// The record bytes could not be decoded.
    #[error("failed to deserialize account {address}: {reason}")]
    AccountDidNotDeserialize {
        /// Record address.
        address: Address,
        /// Decoder message.
        reason: String,
    },

    /// A record could not be encoded.
    #[error("failed to serialize account: {0}")]
    AccountDidNotSerialize(String),

    /// The referenced address does not match the record's own seeds.
    #[error("seeds constraint violated: expected {expected}, got {actual}")]
    ConstraintSeeds {
        /// Address re-derived from the record's seeds and bump.
        expected: Address,
        /// Address the record was loaded from.
        actual: Address,
    },

    /// Signature does not verify against the signer key.
    #[error("signature verification failed for signer {0}")]
    SignatureVerificationFailed(Address),

    /// Signer key is not a valid Ed25519 point.
    #[error("invalid signer key {0}")]
    InvalidSigner(Address),

    /// Address derivation failed.
    #[error("address derivation failed: {0}")]
    Address(#[from] AddressError),

    /// Record store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl VotingError {
    /// Stable error name, as reported to clients.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::DescriptionTooLong { .. } => "DescriptionTooLong",
            Self::VotingClosed(_) => "VotingSessionIsClosed",
            Self::AlreadyVoted { .. } => "DuplicatedVoteNotAllowed",
            Self::MaxYesVotesReached => "MaxYesVotesReached",
            Self::MaxNoVotesReached => "MaxNoVotesReached",
            Self::AddressCollision(_) => "AccountAlreadyInitialized",
            Self::ProposalNotFound(_) => "AccountNotInitialized",
            Self::AccountDiscriminatorMismatch(_) => "AccountDiscriminatorMismatch",
            Self::AccountDidNotDeserialize { .. } => "AccountDidNotDeserialize",
            Self::AccountDidNotSerialize(_) => "AccountDidNotSerialize",
            Self::ConstraintSeeds { .. } => "ConstraintSeeds",
            Self::SignatureVerificationFailed(_) | Self::InvalidSigner(_) => "ConstraintSigner",
            Self::Address(_) => "InvalidSeeds",
            Self::Store(_) => "StorageFailure",
        }
    }

    /// Numeric error code.
    #[must_use]
    pub fn number(&self) -> u32 {
        match self {
            Self::DescriptionTooLong { .. } => codes::DESCRIPTION_TOO_LONG,
            Self::VotingClosed(_) => codes::VOTING_SESSION_IS_CLOSED,
            Self::AlreadyVoted { .. } => codes::DUPLICATED_VOTE_NOT_ALLOWED,
            Self::MaxYesVotesReached => codes::MAX_YES_VOTES_REACHED,
            Self::MaxNoVotesReached => codes::MAX_NO_VOTES_REACHED,
            Self::AddressCollision(_) => codes::ACCOUNT_ALREADY_INITIALIZED,
            Self::ProposalNotFound(_) => codes::ACCOUNT_NOT_INITIALIZED,
            Self::AccountDiscriminatorMismatch(_) => codes::ACCOUNT_DISCRIMINATOR_MISMATCH,
            Self::AccountDidNotDeserialize { .. } => codes::ACCOUNT_DID_NOT_DESERIALIZE,
            Self::AccountDidNotSerialize(_) => codes::ACCOUNT_DID_NOT_SERIALIZE,
            Self::ConstraintSeeds { .. } => codes::CONSTRAINT_SEEDS,
            Self::SignatureVerificationFailed(_) | Self::InvalidSigner(_) => {
                codes::CONSTRAINT_SIGNER
            }
            Self::Address(_) => codes::INVALID_SEEDS,
            Self::Store(_) => codes::STORAGE_FAILURE,
        }
    }

    /// Returns true if the failure came from the storage backend rather than
    /// from the request itself. Callers may choose to resubmit these.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Store(
                StoreError::LockPoisoned
                    | StoreError::Backend(_)
                    | StoreError::VersionConflict { .. }
            )
        )
    }
}

// =============================================================================
// STORE ERRORS
// =============================================================================

/// Errors from the record store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Create targeted an occupied address.
    #[error("record already exists at {0}")]
    AlreadyExists(Address),

    /// Update targeted an empty address.
    #[error("record not found at {0}")]
    NotFound(Address),

    /// Update was built against a stale version.
    #[error("version conflict at {address}: expected {expected}, found {actual}")]
    VersionConflict {
        /// Record address.
        address: Address,
        /// Version the update was built against.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },

    /// A batch touched the same address twice.
    #[error("batch writes {0} more than once")]
    DuplicateWrite(Address),

    /// Internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// Other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

// =============================================================================
// ADDRESS ERRORS
// =============================================================================

/// Errors from address parsing and program-address derivation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// More seeds than allowed.
    #[error("too many seeds: {count} > {max}")]
    TooManySeeds {
        /// Seeds supplied.
        count: usize,
        /// Maximum seed count.
        max: usize,
    },

    /// A seed longer than allowed.
    #[error("seed {index} too long: {len} > {max} bytes")]
    SeedTooLong {
        /// Position of the seed.
        index: usize,
        /// Seed length in bytes.
        len: usize,
        /// Maximum seed length in bytes.
        max: usize,
    },

    /// The derived bytes are a valid curve point.
    #[error("derived address lies on the ed25519 curve")]
    OnCurve,

    /// No bump in 0..=255 produced an off-curve address.
    #[error("unable to find a viable bump seed")]
    NoViableBump,

    /// Hex string did not decode.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded bytes have the wrong length.
    #[error("invalid address length: {0} bytes")]
    InvalidLength(usize),
}

// =============================================================================
// TESTS
// =============================================================================
