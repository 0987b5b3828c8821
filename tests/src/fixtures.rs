//! Shared fixtures: deterministic identities and ready-made services.

use ed25519_dalek::SigningKey;
use evote_program::prelude::*;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Deterministic signing key for a human-readable label.
pub fn key(label: &str) -> SigningKey {
    SigningKey::from_bytes(&Sha256::digest(label.as_bytes()).into())
}

/// Public identity for a label.
pub fn identity(label: &str) -> Address {
    Address::new(key(label).verifying_key().to_bytes())
}

/// In-memory service.
pub type TestService = VotingService<InMemoryRecordStore, InMemoryEventLog>;

/// Fresh in-memory service, shareable across tasks.
pub fn shared_service() -> Arc<TestService> {
    Arc::new(create_test_service())
}

/// Signs `instruction` as `label` for the service's program.
pub fn signed(service: &TestService, label: &str, instruction: Instruction) -> Transaction {
    Transaction::sign(&key(label), &service.program_id(), instruction)
        .expect("instruction encodes")
}

/// Creates `label`'s proposal `pid` and returns its address.
pub async fn create_proposal(
    service: &TestService,
    label: &str,
    pid: ProposalId,
    description: &str,
) -> Address {
    service
        .create(&key(label), pid, description.to_string())
        .await
        .expect("proposal created")
        .proposal_address()
}
