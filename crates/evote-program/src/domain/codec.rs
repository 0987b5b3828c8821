//! # Record Codec
//!
//! Stored layout: `discriminator (8 bytes) ‖ bincode(body)`.
//!
//! The discriminator names the record type, so a vote can never be loaded as
//! a proposal even though both share one address space.

use crate::domain::entities::{Proposal, Vote};
use crate::domain::services::account_discriminator;
use crate::domain::value_objects::Address;
use crate::errors::VotingError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Length of the type tag prefix.
pub const DISCRIMINATOR_LEN: usize = 8;

/// A record type the program persists.
pub trait AccountRecord: Serialize + DeserializeOwned {
    /// Type name hashed into the discriminator.
    const NAME: &'static str;

    /// Type tag written in front of every record.
    fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        account_discriminator(Self::NAME)
    }

    /// Encodes the record with its type tag.
    fn encode(&self) -> Result<Vec<u8>, VotingError> {
        let body =
            bincode::serialize(self).map_err(|e| VotingError::AccountDidNotSerialize(e.to_string()))?;
        let mut data = Vec::with_capacity(DISCRIMINATOR_LEN + body.len());
        data.extend_from_slice(&Self::discriminator());
        data.extend_from_slice(&body);
        Ok(data)
    }

    /// Decodes a record stored at `address`, checking the type tag first.
    fn decode(address: Address, data: &[u8]) -> Result<Self, VotingError> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(VotingError::AccountDidNotDeserialize {
                address,
                reason: format!("{} bytes is shorter than the discriminator", data.len()),
            });
        }
        let (tag, body) = data.split_at(DISCRIMINATOR_LEN);
        if tag != Self::discriminator() {
            return Err(VotingError::AccountDiscriminatorMismatch(address));
        }
        bincode::deserialize(body).map_err(|e| VotingError::AccountDidNotDeserialize {
            address,
            reason: e.to_string(),
        })
    }
}

impl AccountRecord for Proposal {
    const NAME: &'static str = "Proposal";
}

impl AccountRecord for Vote {
    const NAME: &'static str = "Vote";
}

/// Returns true if `data` carries the type tag of `T`.
#[must_use]
pub fn has_discriminator<T: AccountRecord>(data: &[u8]) -> bool {
    data.len() >= DISCRIMINATOR_LEN && data[..DISCRIMINATOR_LEN] == T::discriminator()
}
