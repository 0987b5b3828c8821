//! # Domain Invariants
//!
//! Validation applied before any write, plus after-the-fact checks over
//! stored records.
//!
//! | Check | Applied |
//! |-------|---------|
//! | Description length ≤ 50 bytes | before `create` writes |
//! | Proposal is ongoing | before `vote_*` writes |
//! | One record per derived address | structurally, by the record store |
//! | `yes + no == votes referencing` | on audit |

use crate::domain::entities::{Proposal, Vote, VoteChoice};
use crate::domain::value_objects::Address;
use crate::errors::VotingError;

// =============================================================================
// PRE-WRITE VALIDATION
// =============================================================================

/// Rejects descriptions longer than [`Proposal::DESCRIPTION_MAXIMUM_LENGTH`] bytes.
///
/// Length is measured in UTF-8 bytes, not characters.
pub fn validate_description(description: &str) -> Result<(), VotingError> {
    let len = description.len();
    if len > Proposal::DESCRIPTION_MAXIMUM_LENGTH {
        return Err(VotingError::DescriptionTooLong {
            len,
            max: Proposal::DESCRIPTION_MAXIMUM_LENGTH,
        });
    }
    Ok(())
}

/// Rejects votes on a proposal that is no longer ongoing.
pub fn validate_voting_open(proposal: &Proposal, address: Address) -> Result<(), VotingError> {
    if !proposal.ongoing {
        return Err(VotingError::VotingClosed(address));
    }
    Ok(())
}

// =============================================================================
// AUDIT CHECKS
// =============================================================================

/// A violated invariant found while auditing stored records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Stored description exceeds the limit.
    DescriptionTooLong {
        /// Stored length in bytes.
        len: usize,
    },
    /// Counters disagree with the vote records.
    TallyMismatch {
        /// Stored `(yes, no)`.
        stored: (u32, u32),
        /// `(yes, no)` counted from vote records.
        counted: (u64, u64),
    },
    /// A vote passed in does not reference the audited proposal.
    ForeignVote {
        /// The vote's voter.
        voter: Address,
        /// The proposal the vote actually references.
        references: Address,
    },
}

/// Result of auditing one proposal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvariantCheckResult {
    /// All violations found, in check order.
    pub violations: Vec<InvariantViolation>,
}

impl InvariantCheckResult {
    /// Returns true if no invariant is violated.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Counters must equal the vote records referencing the proposal.
#[must_use]
pub fn check_tally_invariant(proposal: &Proposal, votes: &[Vote]) -> bool {
    count_votes(votes) == (u64::from(proposal.yes_votes), u64::from(proposal.no_votes))
}

/// Audits a stored proposal against the vote records that reference it.
#[must_use]
pub fn check_all_invariants(
    address: Address,
    proposal: &Proposal,
    votes: &[Vote],
) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if validate_description(&proposal.description).is_err() {
        violations.push(InvariantViolation::DescriptionTooLong {
            len: proposal.description.len(),
        });
    }

    for vote in votes.iter().filter(|v| v.proposal != address) {
        violations.push(InvariantViolation::ForeignVote {
            voter: vote.voter,
            references: vote.proposal,
        });
    }

    let own: Vec<Vote> = votes
        .iter()
        .filter(|v| v.proposal == address)
        .cloned()
        .collect();
    if !check_tally_invariant(proposal, &own) {
        violations.push(InvariantViolation::TallyMismatch {
            stored: proposal.tally(),
            counted: count_votes(&own),
        });
    }

    InvariantCheckResult { violations }
}

fn count_votes(votes: &[Vote]) -> (u64, u64) {
    votes.iter().fold((0, 0), |(yes, no), vote| match vote.choice {
        VoteChoice::Yes => (yes + 1, no),
        VoteChoice::No => (yes, no + 1),
    })
}

// =============================================================================
// TESTS
// =============================================================================
