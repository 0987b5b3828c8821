//! # Voting Service
//!
//! Executes proposal and vote transitions against an injected record store.
//!
//! ## Transition Pipeline
//!
//! 1. Verify the signature (signed transactions only)
//! 2. Validate inputs and derive record addresses
//! 3. Build one write batch and apply it atomically
//! 4. Publish events, update metrics and stats
//!
//! ## Concurrency
//!
//! Transitions run one at a time behind an async sequencer. Events are
//! published while the sequencer is held, so publication order matches
//! commit order. The store's own insert-if-absent and version checks back
//! this up for stores shared with other writers.

use crate::adapters::{InMemoryEventLog, InMemoryRecordStore};
use crate::domain::codec::{has_discriminator, AccountRecord};
use crate::domain::entities::{Proposal, Vote, VoteChoice};
use crate::domain::invariants::{
    check_all_invariants, validate_description, validate_voting_open, InvariantCheckResult,
};
use crate::domain::services::{
    create_proposal_address, default_program_id, find_proposal_address, find_vote_address,
};
use crate::domain::value_objects::{Address, ProposalId};
use crate::errors::{AddressError, StoreError, VotingError};
use crate::events::ProgramEvent;
use crate::ports::inbound::{
    Instruction, Transaction, TransactionReceipt, TransitionOutcome, VotingApi,
};
use crate::ports::outbound::{EventPublisher, RecordStore, WriteBatch};

use async_trait::async_trait;
use evote_telemetry::metrics;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Environment variable holding the program id as hex.
pub const PROGRAM_ID_ENV: &str = "EVOTE_PROGRAM_ID";

/// Voting service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Program id mixed into every derived address and signed message.
    pub program_id: Address,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            program_id: default_program_id(),
        }
    }
}

impl ServiceConfig {
    /// Load from the environment, falling back to defaults when unset.
    pub fn from_env() -> Result<Self, AddressError> {
        match std::env::var(PROGRAM_ID_ENV) {
            Ok(value) if !value.trim().is_empty() => Ok(Self {
                program_id: Address::from_hex(value.trim())?,
            }),
            _ => Ok(Self::default()),
        }
    }
}

/// Statistics for the voting service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Proposals created.
    pub proposals_created: u64,
    /// Votes cast.
    pub votes_cast: u64,
    /// Transitions that returned an error.
    pub rejected_transitions: u64,
    /// Events handed to the publisher successfully.
    pub events_published: u64,
    /// Events the publisher refused.
    pub publish_failures: u64,
}

/// The voting program.
pub struct VotingService<S: RecordStore, P: EventPublisher> {
    /// Service configuration.
    config: ServiceConfig,
    /// Record storage.
    store: Arc<S>,
    /// Event sink.
    publisher: Arc<P>,
    /// Serializes transitions.
    sequencer: Mutex<()>,
    /// Service statistics.
    stats: RwLock<ServiceStats>,
}

impl<S: RecordStore, P: EventPublisher> VotingService<S, P> {
    /// Create a new voting service.
    pub fn new(store: Arc<S>, publisher: Arc<P>, config: ServiceConfig) -> Self {
        Self {
            config,
            store,
            publisher,
            sequencer: Mutex::new(()),
            stats: RwLock::new(ServiceStats::default()),
        }
    }

    /// Program id this service derives addresses under.
    pub fn program_id(&self) -> Address {
        self.config.program_id
    }

    /// Underlying record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Underlying event publisher.
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    #[instrument(skip(self, description), fields(correlation_id = %correlation_id, author = %author))]
    async fn execute_create(
        &self,
        correlation_id: Uuid,
        author: Address,
        pid: ProposalId,
        description: String,
    ) -> Result<TransactionReceipt, VotingError> {
        validate_description(&description)?;

        let (address, bump) = find_proposal_address(&self.config.program_id, &author, pid)?;
        let proposal = Proposal::new(author, pid, description, bump);
        let batch = WriteBatch::new().create(address, proposal.encode()?);

        let _guard = self.sequencer.lock().await;
        self.store.apply(batch).map_err(|e| match e {
            StoreError::AlreadyExists(at) => VotingError::AddressCollision(at),
            other => other.into(),
        })?;

        info!(proposal = %address, pid, bump, "Proposal created");
        metrics::record_proposal_created();
        self.stats.write().await.proposals_created += 1;

        let events = vec![ProgramEvent::ProposalCreated {
            correlation_id,
            proposal: address,
            owner: author,
            pid,
            description: proposal.description.clone(),
        }];
        self.publish(&events).await;

        Ok(TransactionReceipt {
            correlation_id,
            outcome: TransitionOutcome::Created { address, proposal },
            events,
        })
    }

    #[instrument(skip(self), fields(correlation_id = %correlation_id, voter = %voter, proposal = %proposal_address))]
    async fn execute_vote(
        &self,
        correlation_id: Uuid,
        voter: Address,
        proposal_address: Address,
        choice: VoteChoice,
    ) -> Result<TransactionReceipt, VotingError> {
        let program_id = self.config.program_id;
        let _guard = self.sequencer.lock().await;

        let stored = self
            .store
            .load(&proposal_address)?
            .ok_or(VotingError::ProposalNotFound(proposal_address))?;
        let mut proposal = Proposal::decode(proposal_address, &stored.data)?;

        let expected =
            create_proposal_address(&program_id, &proposal.owner, proposal.pid, proposal.bump)?;
        if expected != proposal_address {
            return Err(VotingError::ConstraintSeeds {
                expected,
                actual: proposal_address,
            });
        }
        validate_voting_open(&proposal, proposal_address)?;

        let (vote_address, vote_bump) = find_vote_address(&program_id, &proposal_address, &voter)?;
        if self.store.contains(&vote_address)? {
            return Err(VotingError::AlreadyVoted {
                voter,
                proposal: proposal_address,
            });
        }

        proposal.record_vote(choice)?;
        let vote = Vote::new(voter, proposal_address, choice, vote_bump);

        let batch = WriteBatch::new()
            .create(vote_address, vote.encode()?)
            .update(proposal_address, proposal.encode()?, stored.version);
        self.store.apply(batch).map_err(|e| match e {
            StoreError::AlreadyExists(at) if at == vote_address => VotingError::AlreadyVoted {
                voter,
                proposal: proposal_address,
            },
            other => other.into(),
        })?;

        info!(
            vote = %vote_address,
            choice = choice.as_str(),
            yes_votes = proposal.yes_votes,
            no_votes = proposal.no_votes,
            "Vote cast"
        );
        metrics::record_vote_cast(choice.as_str());
        self.stats.write().await.votes_cast += 1;

        let events = vec![ProgramEvent::VoteCast {
            correlation_id,
            proposal: proposal_address,
            vote: vote_address,
            voter,
            choice,
            yes_votes: proposal.yes_votes,
            no_votes: proposal.no_votes,
        }];
        self.publish(&events).await;

        Ok(TransactionReceipt {
            correlation_id,
            outcome: TransitionOutcome::Voted {
                proposal_address,
                proposal,
                vote_address,
                vote,
            },
            events,
        })
    }

    /// Publishes after commit. Failures are counted and logged only.
    async fn publish(&self, events: &[ProgramEvent]) {
        for event in events {
            match self.publisher.publish(event.clone()) {
                Ok(()) => self.stats.write().await.events_published += 1,
                Err(reason) => {
                    warn!(topic = event.topic(), %reason, "Event publication failed");
                    self.stats.write().await.publish_failures += 1;
                }
            }
        }
    }

    /// Records the outcome of a transition attempt.
    async fn finish(
        &self,
        instruction: &'static str,
        correlation_id: Uuid,
        result: Result<TransactionReceipt, VotingError>,
    ) -> Result<TransactionReceipt, VotingError> {
        if let Err(e) = &result {
            warn!(
                %correlation_id,
                instruction,
                code = e.code(),
                number = e.number(),
                error = %e,
                "Transition rejected"
            );
            metrics::record_rejection(instruction, e.code());
            self.stats.write().await.rejected_transitions += 1;
        }
        result
    }

    // =========================================================================
    // READS
    // =========================================================================

    fn load_record<T: AccountRecord>(&self, address: Address) -> Result<Option<T>, VotingError> {
        match self.store.load(&address)? {
            Some(record) => Ok(Some(T::decode(address, &record.data)?)),
            None => Ok(None),
        }
    }

    /// Every record of type `T`, skipping records of other types.
    fn scan<T: AccountRecord>(&self) -> Result<Vec<(Address, T)>, VotingError> {
        let mut out = Vec::new();
        for address in self.store.addresses()? {
            let Some(record) = self.store.load(&address)? else {
                continue;
            };
            if has_discriminator::<T>(&record.data) {
                out.push((address, T::decode(address, &record.data)?));
            }
        }
        Ok(out)
    }

    fn scan_votes(&self, proposal: Address) -> Result<Vec<(Address, Vote)>, VotingError> {
        Ok(self
            .scan::<Vote>()?
            .into_iter()
            .filter(|(_, vote)| vote.proposal == proposal)
            .collect())
    }
}

/// Create a default service with in-memory adapters (for testing).
#[must_use]
pub fn create_test_service() -> VotingService<InMemoryRecordStore, InMemoryEventLog> {
    VotingService::new(
        Arc::new(InMemoryRecordStore::new()),
        Arc::new(InMemoryEventLog::new()),
        ServiceConfig::default(),
    )
}

// =============================================================================
// VotingApi Implementation
// =============================================================================

#[async_trait]
impl<S: RecordStore, P: EventPublisher> VotingApi for VotingService<S, P> {
    fn program_id(&self) -> Address {
        self.config.program_id
    }

    async fn submit(&self, tx: &Transaction) -> Result<TransactionReceipt, VotingError> {
        let correlation_id = Uuid::new_v4();
        debug!(%correlation_id, signer = %tx.signer, instruction = tx.instruction.name(), "Transaction received");

        let result = match tx.verify(&self.config.program_id) {
            Err(e) => Err(e),
            Ok(()) => match &tx.instruction {
                Instruction::Create { pid, description } => {
                    self.execute_create(correlation_id, tx.signer, *pid, description.clone())
                        .await
                }
                Instruction::VoteYes { proposal } => {
                    self.execute_vote(correlation_id, tx.signer, *proposal, VoteChoice::Yes)
                        .await
                }
                Instruction::VoteNo { proposal } => {
                    self.execute_vote(correlation_id, tx.signer, *proposal, VoteChoice::No)
                        .await
                }
            },
        };
        self.finish(tx.instruction.name(), correlation_id, result)
            .await
    }

    fn proposal_address(&self, author: &Address, pid: ProposalId) -> Result<Address, VotingError> {
        Ok(find_proposal_address(&self.config.program_id, author, pid)?.0)
    }

    fn vote_address(&self, proposal: &Address, voter: &Address) -> Result<Address, VotingError> {
        Ok(find_vote_address(&self.config.program_id, proposal, voter)?.0)
    }

    async fn fetch_proposal(&self, address: Address) -> Result<Option<Proposal>, VotingError> {
        self.load_record(address)
    }

    async fn fetch_vote(&self, address: Address) -> Result<Option<Vote>, VotingError> {
        self.load_record(address)
    }

    async fn all_proposals(&self) -> Result<Vec<(Address, Proposal)>, VotingError> {
        let _guard = self.sequencer.lock().await;
        self.scan()
    }

    async fn votes_for(&self, proposal: Address) -> Result<Vec<(Address, Vote)>, VotingError> {
        let _guard = self.sequencer.lock().await;
        self.scan_votes(proposal)
    }

    async fn audit(&self, proposal: Address) -> Result<InvariantCheckResult, VotingError> {
        let _guard = self.sequencer.lock().await;
        let stored: Proposal = self
            .load_record(proposal)?
            .ok_or(VotingError::ProposalNotFound(proposal))?;
        let votes: Vec<Vote> = self
            .scan_votes(proposal)?
            .into_iter()
            .map(|(_, vote)| vote)
            .collect();
        Ok(check_all_invariants(proposal, &stored, &votes))
    }
}

// =============================================================================
// TESTS
// =============================================================================
