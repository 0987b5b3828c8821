//! # Node Runtime
//!
//! Hosts one voting program over the in-memory store, replays scripts
//! against it and renders the resulting state.

use crate::config::NodeConfig;
use crate::script::{Script, ScriptError};
use evote_program::adapters::{InMemoryRecordStore, TracingEventPublisher};
use evote_program::domain::entities::Proposal;
use evote_program::domain::value_objects::Address;
use evote_program::errors::VotingError;
use evote_program::ports::inbound::VotingApi;
use evote_program::service::{ServiceStats, VotingService};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Service type the node hosts.
pub type NodeService = VotingService<InMemoryRecordStore, TracingEventPublisher>;

/// Result of one script step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// Step position, from 0.
    pub index: usize,
    /// Keyring label of the signer.
    pub signer: String,
    /// Instruction name.
    pub instruction: &'static str,
    /// `committed` or `rejected`.
    pub status: &'static str,
    /// Error name when rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    /// Error message when rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A stored proposal, rendered for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposalView {
    /// Proposal address, hex.
    pub address: String,
    /// Owner identity, hex.
    pub owner: String,
    /// Per-author id.
    pub pid: u8,
    /// Description text.
    pub description: String,
    /// Yes votes.
    pub yes_votes: u32,
    /// No votes.
    pub no_votes: u32,
    /// Whether voting is open.
    pub ongoing: bool,
}

impl ProposalView {
    fn new(address: Address, proposal: Proposal) -> Self {
        Self {
            address: address.to_hex(),
            owner: proposal.owner.to_hex(),
            pid: proposal.pid,
            description: proposal.description,
            yes_votes: proposal.yes_votes,
            no_votes: proposal.no_votes,
            ongoing: proposal.ongoing,
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Program id, hex.
    pub program_id: String,
    /// Per-step outcomes.
    pub steps: Vec<StepReport>,
    /// Final proposals, ordered by address.
    pub proposals: Vec<ProposalView>,
}

/// Errors from a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The script could not be turned into transactions.
    #[error(transparent)]
    Script(#[from] ScriptError),
    /// Final state could not be read back.
    #[error("reading final state: {0}")]
    State(#[from] VotingError),
}

/// The node runtime.
pub struct NodeRuntime {
    /// Hosted program.
    service: Arc<NodeService>,
}

impl NodeRuntime {
    /// Create a runtime with an empty store.
    pub fn new(config: &NodeConfig) -> Self {
        info!(program_id = %config.service.program_id, "Creating e-voting node runtime");
        let service = VotingService::new(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(TracingEventPublisher),
            config.service.clone(),
        );
        Self {
            service: Arc::new(service),
        }
    }

    /// Hosted program.
    pub fn service(&self) -> Arc<NodeService> {
        Arc::clone(&self.service)
    }

    /// Replays `script` step by step. Rejected steps are recorded and the run
    /// continues.
    pub async fn run(&self, script: &Script) -> Result<RunReport, RunError> {
        let transactions = script.to_transactions(&self.service.program_id())?;
        info!(steps = transactions.len(), "Replaying script");

        let mut steps = Vec::with_capacity(transactions.len());
        for (index, (step, tx)) in script.steps.iter().zip(&transactions).enumerate() {
            let report = match self.service.submit(tx).await {
                Ok(_) => StepReport {
                    index,
                    signer: step.signer.clone(),
                    instruction: tx.instruction.name(),
                    status: "committed",
                    code: None,
                    error: None,
                },
                Err(e) => StepReport {
                    index,
                    signer: step.signer.clone(),
                    instruction: tx.instruction.name(),
                    status: "rejected",
                    code: Some(e.code()),
                    error: Some(e.to_string()),
                },
            };
            steps.push(report);
        }

        let proposals = self
            .service
            .all_proposals()
            .await?
            .into_iter()
            .map(|(address, proposal)| ProposalView::new(address, proposal))
            .collect();

        Ok(RunReport {
            program_id: self.service.program_id().to_hex(),
            steps,
            proposals,
        })
    }

    /// Current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.service.stats().await
    }
}
