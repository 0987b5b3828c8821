//! # Transaction Scripts
//!
//! JSON list of signed steps replayed against a fresh program:
//!
//! ```json
//! {
//!   "steps": [
//!     { "signer": "owner", "create": { "pid": 0, "description": "Proposal #1" } },
//!     { "signer": "a", "vote_yes": { "author": "owner", "pid": 0 } },
//!     { "signer": "b", "vote_no": { "proposal": "0x5d1f..." } }
//!   ]
//! }
//! ```
//!
//! A vote names its proposal either by `(author, pid)` or by hex address.

use crate::keyring::{identity, signing_key};
use evote_program::domain::services::find_proposal_address;
use evote_program::domain::value_objects::{Address, ProposalId};
use evote_program::errors::{AddressError, VotingError};
use evote_program::ports::inbound::{Instruction, Transaction};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors while loading or resolving a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The file is not valid script JSON.
    #[error("malformed script: {0}")]
    Parse(#[from] serde_json::Error),

    /// A step names a proposal that cannot be addressed.
    #[error("step {index}: bad proposal reference: {source}")]
    BadReference {
        /// Step position, from 0.
        index: usize,
        /// Underlying address error.
        source: AddressError,
    },

    /// A step could not be signed.
    #[error("step {index}: cannot sign: {source}")]
    Signing {
        /// Step position, from 0.
        index: usize,
        /// Underlying program error.
        source: VotingError,
    },
}

/// A replayable list of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Steps in execution order.
    pub steps: Vec<Step>,
}

/// One signed instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Keyring label of the signer.
    pub signer: String,
    /// What the signer asks for.
    #[serde(flatten)]
    pub action: Action,
}

/// Instruction in script form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create a proposal.
    Create {
        /// Per-author id.
        pid: ProposalId,
        /// Description text.
        description: String,
    },
    /// Vote yes.
    VoteYes(ProposalRef),
    /// Vote no.
    VoteNo(ProposalRef),
}

/// How a step names a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProposalRef {
    /// Explicit hex address.
    Address {
        /// `0x`-prefixed or bare hex.
        proposal: String,
    },
    /// Derived from the author label and pid.
    Derived {
        /// Keyring label of the author.
        author: String,
        /// Author's proposal id.
        pid: ProposalId,
    },
}

impl ProposalRef {
    /// Resolves to an address under `program_id`.
    pub fn resolve(&self, program_id: &Address) -> Result<Address, AddressError> {
        match self {
            Self::Address { proposal } => Address::from_hex(proposal),
            Self::Derived { author, pid } => {
                Ok(find_proposal_address(program_id, &identity(author), *pid)?.0)
            }
        }
    }
}

impl Script {
    /// Parses script JSON.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Owner creates "Proposal #1"; a votes yes; b and c vote no; a tries
    /// again; then an over-long description is attempted.
    #[must_use]
    pub fn demo() -> Self {
        let target = || ProposalRef::Derived {
            author: "owner".to_string(),
            pid: 0,
        };
        let step = |signer: &str, action| Step {
            signer: signer.to_string(),
            action,
        };
        Self {
            steps: vec![
                step(
                    "owner",
                    Action::Create {
                        pid: 0,
                        description: "Proposal #1".to_string(),
                    },
                ),
                step("a", Action::VoteYes(target())),
                step("b", Action::VoteNo(target())),
                step("c", Action::VoteNo(target())),
                step("a", Action::VoteYes(target())),
                step(
                    "owner",
                    Action::Create {
                        pid: 1,
                        description: "Very large description that will break the program!"
                            .to_string(),
                    },
                ),
            ],
        }
    }

    /// Signs every step for `program_id`.
    pub fn to_transactions(&self, program_id: &Address) -> Result<Vec<Transaction>, ScriptError> {
        self.steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let instruction = match &step.action {
                    Action::Create { pid, description } => Instruction::Create {
                        pid: *pid,
                        description: description.clone(),
                    },
                    Action::VoteYes(target) => Instruction::VoteYes {
                        proposal: target
                            .resolve(program_id)
                            .map_err(|source| ScriptError::BadReference { index, source })?,
                    },
                    Action::VoteNo(target) => Instruction::VoteNo {
                        proposal: target
                            .resolve(program_id)
                            .map_err(|source| ScriptError::BadReference { index, source })?,
                    },
                };
                Transaction::sign(&signing_key(&step.signer), program_id, instruction)
                    .map_err(|source| ScriptError::Signing { index, source })
            })
            .collect()
    }
}
