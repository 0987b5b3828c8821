//! Deterministic identities for scripted runs.
//!
//! A label such as `"alice"` maps to the Ed25519 key whose secret is
//! `sha256(label)`. Scripts name signers by label and never carry secrets.

use ed25519_dalek::SigningKey;
use evote_program::domain::value_objects::Address;
use sha2::{Digest, Sha256};

/// Signing key for `label`.
#[must_use]
pub fn signing_key(label: &str) -> SigningKey {
    SigningKey::from_bytes(&Sha256::digest(label.as_bytes()).into())
}

/// Public identity for `label`.
#[must_use]
pub fn identity(label: &str) -> Address {
    Address::new(signing_key(label).verifying_key().to_bytes())
}
