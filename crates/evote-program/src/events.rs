//! # Program Events
//!
//! Emitted after a transition commits. Never emitted for rejected
//! transitions.
//!
//! | Event | Emitted by |
//! |-------|------------|
//! | `ProposalCreated` | `create` |
//! | `VoteCast` | `vote_yes`, `vote_no` |

use crate::domain::entities::VoteChoice;
use crate::domain::value_objects::{Address, ProposalId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event topic names.
pub mod topics {
    /// A proposal was created.
    pub const PROPOSAL_CREATED: &str = "evote.proposal.created";
    /// A vote was cast.
    pub const VOTE_CAST: &str = "evote.vote.cast";
}

/// An event emitted by a committed transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgramEvent {
    /// A new proposal record was written.
    ProposalCreated {
        /// Transaction that created it.
        correlation_id: Uuid,
        /// Proposal address.
        proposal: Address,
        /// Creator.
        owner: Address,
        /// Per-author id.
        pid: ProposalId,
        /// Description as stored.
        description: String,
    },
    /// A vote record was written and the proposal tally updated.
    VoteCast {
        /// Transaction that cast it.
        correlation_id: Uuid,
        /// Proposal address.
        proposal: Address,
        /// Vote record address.
        vote: Address,
        /// Voter.
        voter: Address,
        /// Choice recorded.
        choice: VoteChoice,
        /// Yes votes after this vote.
        yes_votes: u32,
        /// No votes after this vote.
        no_votes: u32,
    },
}

impl ProgramEvent {
    /// Topic this event is published under.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::ProposalCreated { .. } => topics::PROPOSAL_CREATED,
            Self::VoteCast { .. } => topics::VOTE_CAST,
        }
    }

    /// Correlation id of the emitting transaction.
    #[must_use]
    pub fn correlation_id(&self) -> Uuid {
        match self {
            Self::ProposalCreated { correlation_id, .. } | Self::VoteCast { correlation_id, .. } => {
                *correlation_id
            }
        }
    }

    /// Proposal the event concerns.
    #[must_use]
    pub fn proposal(&self) -> Address {
        match self {
            Self::ProposalCreated { proposal, .. } | Self::VoteCast { proposal, .. } => *proposal,
        }
    }
}
