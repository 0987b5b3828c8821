//! # Event Publishers
//!
//! - [`InMemoryEventLog`]: keeps every event, for tests and inspection.
//! - [`TracingEventPublisher`]: writes each event as a structured log line.

use crate::events::ProgramEvent;
use crate::ports::outbound::EventPublisher;
use std::sync::{PoisonError, RwLock};
use tracing::info;

/// Append-only in-memory event log.
///
/// A writer that panics mid-push leaves the vector holding a prefix of the
/// published events, so a poisoned lock is recovered rather than reported.
/// Reads never come back empty because of poisoning.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<ProgramEvent>>,
}

impl InMemoryEventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in publication order.
    #[must_use]
    pub fn events(&self) -> Vec<ProgramEvent> {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events published under `topic`.
    #[must_use]
    pub fn by_topic(&self, topic: &str) -> Vec<ProgramEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.topic() == topic)
            .collect()
    }

    /// Number of events published.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing was published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventPublisher for InMemoryEventLog {
    fn publish(&self, event: ProgramEvent) -> Result<(), String> {
        self.events
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}

/// Publishes events to the `tracing` pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventPublisher;

impl EventPublisher for TracingEventPublisher {
    fn publish(&self, event: ProgramEvent) -> Result<(), String> {
        match &event {
            ProgramEvent::ProposalCreated {
                correlation_id,
                proposal,
                owner,
                pid,
                description,
            } => info!(
                topic = event.topic(),
                %correlation_id,
                %proposal,
                %owner,
                pid,
                description = description.as_str(),
                "event"
            ),
            ProgramEvent::VoteCast {
                correlation_id,
                proposal,
                voter,
                choice,
                yes_votes,
                no_votes,
                ..
            } => info!(
                topic = event.topic(),
                %correlation_id,
                %proposal,
                %voter,
                choice = choice.as_str(),
                yes_votes,
                no_votes,
                "event"
            ),
        }
        Ok(())
    }
}
