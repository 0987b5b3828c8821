//! # Core Domain Entities
//!
//! The two record types the program persists: [`Proposal`] and [`Vote`].

use crate::domain::value_objects::{Address, ProposalId};
use crate::errors::VotingError;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// VOTE CHOICE
// =============================================================================

/// A voter's choice on a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteChoice {
    /// In favour.
    Yes,
    /// Against.
    No,
}

impl VoteChoice {
    /// Lowercase label, used for metrics and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// PROPOSAL
// =============================================================================

/// A votable item with a bounded description and yes/no tallies.
///
/// Lives at the address derived from `("proposal", owner, [pid])`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Per-author discriminator, part of the derived address.
    pub pid: ProposalId,
    /// Description text, at most [`Proposal::DESCRIPTION_MAXIMUM_LENGTH`] bytes.
    pub description: String,
    /// Number of yes votes.
    pub yes_votes: u32,
    /// Number of no votes.
    pub no_votes: u32,
    /// Whether votes are accepted.
    pub ongoing: bool,
    /// Creator of the proposal.
    pub owner: Address,
    /// Canonical bump of the proposal address.
    pub bump: u8,
}

impl Proposal {
    /// Maximum description length in bytes.
    pub const DESCRIPTION_MAXIMUM_LENGTH: usize = 50;

    /// Creates a fresh, ongoing proposal with zeroed counters.
    #[must_use]
    pub fn new(owner: Address, pid: ProposalId, description: String, bump: u8) -> Self {
        Self {
            pid,
            description,
            yes_votes: 0,
            no_votes: 0,
            ongoing: true,
            owner,
            bump,
        }
    }

    /// Returns `(yes_votes, no_votes)`.
    #[must_use]
    pub fn tally(&self) -> (u32, u32) {
        (self.yes_votes, self.no_votes)
    }

    /// Total votes cast on this proposal.
    #[must_use]
    pub fn total_votes(&self) -> u64 {
        u64::from(self.yes_votes) + u64::from(self.no_votes)
    }

    /// Adds one vote to the counter for `choice`.
    ///
    /// Leaves the proposal untouched on overflow.
    pub fn record_vote(&mut self, choice: VoteChoice) -> Result<(), VotingError> {
        match choice {
            VoteChoice::Yes => {
                self.yes_votes = self
                    .yes_votes
                    .checked_add(1)
                    .ok_or(VotingError::MaxYesVotesReached)?;
            }
            VoteChoice::No => {
                self.no_votes = self
                    .no_votes
                    .checked_add(1)
                    .ok_or(VotingError::MaxNoVotesReached)?;
            }
        }
        Ok(())
    }

    /// Stops accepting votes.
    ///
    /// No instruction currently reaches this; it exists so stores seeded with
    /// closed proposals behave consistently.
    pub fn close(&mut self) {
        self.ongoing = false;
    }
}

// =============================================================================
// VOTE
// =============================================================================

/// A single voter's immutable choice on one proposal.
///
/// Lives at the address derived from `("vote", proposal, voter)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Identity that cast the vote.
    pub voter: Address,
    /// Address of the proposal voted on.
    pub proposal: Address,
    /// The recorded choice.
    pub choice: VoteChoice,
    /// Canonical bump of the vote address.
    pub bump: u8,
}

impl Vote {
    /// Creates a vote record.
    #[must_use]
    pub fn new(voter: Address, proposal: Address, choice: VoteChoice, bump: u8) -> Self {
        Self {
            voter,
            proposal,
            choice,
            bump,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
