//! # Driving Ports (API - Inbound)
//!
//! The public API of the voting program. Client harnesses use these to
//! submit transitions and read back records.
//!
//! [`VotingApi::submit`] is the only transition entry point. It takes a
//! signed [`Transaction`] and derives the authorizing identity from the
//! verified signature. [`VotingApi::create`] and [`VotingApi::vote`] sign with
//! the caller's key and go through `submit`, so an identity can only be acted
//! for by the holder of its key.

use crate::domain::entities::{Proposal, Vote, VoteChoice};
use crate::domain::invariants::InvariantCheckResult;
use crate::domain::value_objects::{Address, ProposalId};
use crate::errors::VotingError;
use crate::events::ProgramEvent;
use async_trait::async_trait;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// INSTRUCTIONS
// =============================================================================

/// One state transition request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Create a proposal owned by the signer.
    Create {
        /// Per-author id.
        pid: ProposalId,
        /// Description, at most 50 bytes.
        description: String,
    },
    /// Vote yes on a proposal.
    VoteYes {
        /// Proposal address.
        proposal: Address,
    },
    /// Vote no on a proposal.
    VoteNo {
        /// Proposal address.
        proposal: Address,
    },
}

impl Instruction {
    /// Instruction name, as used in logs and metrics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::VoteYes { .. } => "vote_yes",
            Self::VoteNo { .. } => "vote_no",
        }
    }
}

/// Bytes a signer signs for `instruction`: `bincode((program_id, instruction))`.
///
/// Binding the program id stops a signature being replayed against a
/// different deployment.
pub fn signing_message(
    program_id: &Address,
    instruction: &Instruction,
) -> Result<Vec<u8>, VotingError> {
    bincode::serialize(&(program_id, instruction))
        .map_err(|e| VotingError::AccountDidNotSerialize(e.to_string()))
}

// =============================================================================
// SIGNED TRANSACTION
// =============================================================================

/// An instruction signed by its authorizing identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Ed25519 public key of the signer.
    pub signer: Address,
    /// The requested transition.
    pub instruction: Instruction,
    /// Signature over [`signing_message`].
    pub signature: [u8; 64],
}

impl Transaction {
    /// Signs `instruction` for `program_id` with `key`.
    pub fn sign(
        key: &SigningKey,
        program_id: &Address,
        instruction: Instruction,
    ) -> Result<Self, VotingError> {
        let message = signing_message(program_id, &instruction)?;
        let signature = key.sign(&message).to_bytes();
        Ok(Self {
            signer: Address::new(key.verifying_key().to_bytes()),
            instruction,
            signature,
        })
    }

    /// Checks the signature against `signer` for `program_id`.
    pub fn verify(&self, program_id: &Address) -> Result<(), VotingError> {
        let key = VerifyingKey::from_bytes(self.signer.as_bytes())
            .map_err(|_| VotingError::InvalidSigner(self.signer))?;
        let message = signing_message(program_id, &self.instruction)?;
        let signature = Signature::from_bytes(&self.signature);
        key.verify(&message, &signature)
            .map_err(|_| VotingError::SignatureVerificationFailed(self.signer))
    }
}

// =============================================================================
// RECEIPTS
// =============================================================================

/// What a committed transition produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// A proposal was created.
    Created {
        /// Proposal address.
        address: Address,
        /// Proposal as stored.
        proposal: Proposal,
    },
    /// A vote was cast.
    Voted {
        /// Proposal address.
        proposal_address: Address,
        /// Proposal after the tally update.
        proposal: Proposal,
        /// Vote record address.
        vote_address: Address,
        /// Vote as stored.
        vote: Vote,
    },
}

/// Result of a committed transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionReceipt {
    /// Correlation id, also attached to logs and events.
    pub correlation_id: Uuid,
    /// What was written.
    pub outcome: TransitionOutcome,
    /// Events published for this transition.
    pub events: Vec<ProgramEvent>,
}

impl TransactionReceipt {
    /// Proposal address the transition touched.
    #[must_use]
    pub fn proposal_address(&self) -> Address {
        match &self.outcome {
            TransitionOutcome::Created { address, .. } => *address,
            TransitionOutcome::Voted {
                proposal_address, ..
            } => *proposal_address,
        }
    }

    /// Proposal state after the transition.
    #[must_use]
    pub fn proposal(&self) -> &Proposal {
        match &self.outcome {
            TransitionOutcome::Created { proposal, .. }
            | TransitionOutcome::Voted { proposal, .. } => proposal,
        }
    }

    /// Vote record, if the transition cast one.
    #[must_use]
    pub fn vote(&self) -> Option<(Address, &Vote)> {
        match &self.outcome {
            TransitionOutcome::Created { .. } => None,
            TransitionOutcome::Voted {
                vote_address, vote, ..
            } => Some((*vote_address, vote)),
        }
    }
}

// =============================================================================
// VOTING API (Primary Driving Port)
// =============================================================================

/// Primary API of the voting program.
///
/// Every transition is atomic: it either commits all its writes and returns a
/// receipt, or returns an error and leaves storage untouched.
#[async_trait]
pub trait VotingApi: Send + Sync {
    /// Program id transactions must be signed for.
    fn program_id(&self) -> Address;

    /// Verifies and executes a signed transaction.
    ///
    /// The signer becomes the proposal owner or the voter.
    ///
    /// # Errors
    ///
    /// - `InvalidSigner` / `SignatureVerificationFailed` if the signature does
    ///   not verify against `tx.signer` for this program
    /// - any error of the requested instruction
    async fn submit(&self, tx: &Transaction) -> Result<TransactionReceipt, VotingError>;

    /// Signs a `Create` with `author` and submits it.
    ///
    /// # Errors
    ///
    /// - `DescriptionTooLong` if `description` exceeds 50 bytes
    /// - `AddressCollision` if `author` already created proposal `pid`
    async fn create(
        &self,
        author: &SigningKey,
        pid: ProposalId,
        description: String,
    ) -> Result<TransactionReceipt, VotingError> {
        let tx = Transaction::sign(
            author,
            &self.program_id(),
            Instruction::Create { pid, description },
        )?;
        self.submit(&tx).await
    }

    /// Signs a vote with `voter` and submits it.
    ///
    /// # Errors
    ///
    /// - `ProposalNotFound` if no proposal lives at `proposal`
    /// - `VotingClosed` if the proposal is not ongoing
    /// - `AlreadyVoted` if `voter` already voted on it
    async fn vote(
        &self,
        voter: &SigningKey,
        proposal: Address,
        choice: VoteChoice,
    ) -> Result<TransactionReceipt, VotingError> {
        let instruction = match choice {
            VoteChoice::Yes => Instruction::VoteYes { proposal },
            VoteChoice::No => Instruction::VoteNo { proposal },
        };
        let tx = Transaction::sign(voter, &self.program_id(), instruction)?;
        self.submit(&tx).await
    }

    /// Shorthand for a yes vote.
    async fn vote_yes(
        &self,
        voter: &SigningKey,
        proposal: Address,
    ) -> Result<TransactionReceipt, VotingError> {
        self.vote(voter, proposal, VoteChoice::Yes).await
    }

    /// Shorthand for a no vote.
    async fn vote_no(
        &self,
        voter: &SigningKey,
        proposal: Address,
    ) -> Result<TransactionReceipt, VotingError> {
        self.vote(voter, proposal, VoteChoice::No).await
    }

    /// Address of `author`'s proposal `pid`.
    fn proposal_address(&self, author: &Address, pid: ProposalId) -> Result<Address, VotingError>;

    /// Address of `voter`'s vote on `proposal`.
    fn vote_address(&self, proposal: &Address, voter: &Address) -> Result<Address, VotingError>;

    /// Proposal at `address`, if any.
    async fn fetch_proposal(&self, address: Address) -> Result<Option<Proposal>, VotingError>;

    /// Vote at `address`, if any.
    async fn fetch_vote(&self, address: Address) -> Result<Option<Vote>, VotingError>;

    /// Every stored proposal, ordered by address.
    async fn all_proposals(&self) -> Result<Vec<(Address, Proposal)>, VotingError>;

    /// Every vote referencing `proposal`, ordered by vote address.
    async fn votes_for(&self, proposal: Address) -> Result<Vec<(Address, Vote)>, VotingError>;

    /// Checks the stored proposal against its vote records.
    ///
    /// Returns `ProposalNotFound` if no proposal lives at `proposal`.
    async fn audit(&self, proposal: Address) -> Result<InvariantCheckResult, VotingError>;
}

// =============================================================================
// TESTS
// =============================================================================
