//! # Domain Services
//!
//! Pure address derivation for the voting program.
//! These functions are deterministic and have no side effects.
//!
//! ## Program-Derived Addresses
//!
//! ```text
//! address = sha256(seed_1 ‖ … ‖ seed_n ‖ program_id ‖ "ProgramDerivedAddress")
//! ```
//!
//! The last seed is a one-byte bump. An address is only valid if it is NOT a
//! point on the Ed25519 curve, so no private key can ever sign for it.
//!
//! | Record | Seeds |
//! |--------|-------|
//! | Proposal | `"proposal"`, author, `[pid]`, `[bump]` |
//! | Vote | `"vote"`, proposal, voter, `[bump]` |
//!
//! The two namespaces differ in tag and in total seed length, so a proposal
//! address can never be re-derived as a vote address.

use crate::domain::value_objects::{Address, ProposalId};
use crate::errors::AddressError;
use ed25519_dalek::VerifyingKey;
use sha2::{Digest, Sha256};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Maximum number of seeds, bump included.
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed in bytes.
pub const MAX_SEED_LEN: usize = 32;

/// Domain separator appended to every derivation.
pub const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Namespace tag for proposal records.
pub const PROPOSAL_SEED: &[u8] = b"proposal";

/// Namespace tag for vote records.
pub const VOTE_SEED: &[u8] = b"vote";

// =============================================================================
// GENERIC DERIVATION
// =============================================================================

/// Returns true if `bytes` decompress to a valid Ed25519 point.
#[must_use]
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    VerifyingKey::from_bytes(bytes).is_ok()
}

/// Derives a program address from seeds that already include the bump.
///
/// Fails with [`AddressError::OnCurve`] if the hash lands on the curve.
pub fn create_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<Address, AddressError> {
    if seeds.len() > MAX_SEEDS {
        return Err(AddressError::TooManySeeds {
            count: seeds.len(),
            max: MAX_SEEDS,
        });
    }

    let mut hasher = Sha256::new();
    for (index, seed) in seeds.iter().enumerate() {
        if seed.len() > MAX_SEED_LEN {
            return Err(AddressError::SeedTooLong {
                index,
                len: seed.len(),
                max: MAX_SEED_LEN,
            });
        }
        hasher.update(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();
    if is_on_curve(&hash) {
        return Err(AddressError::OnCurve);
    }
    Ok(Address::new(hash))
}

/// Finds the canonical program address for `seeds`.
///
/// Tries bumps from 255 down to 0 and returns the first off-curve address
/// together with the bump that produced it.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<(Address, u8), AddressError> {
    if seeds.len() >= MAX_SEEDS {
        return Err(AddressError::TooManySeeds {
            count: seeds.len() + 1,
            max: MAX_SEEDS,
        });
    }

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
        with_bump.extend_from_slice(seeds);
        with_bump.push(&bump_seed);

        match create_program_address(&with_bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(AddressError::OnCurve) => continue,
            Err(e) => return Err(e),
        }
    }

    Err(AddressError::NoViableBump)
}

// =============================================================================
// RECORD ADDRESSES
// =============================================================================

/// Canonical proposal address and bump for `(author, pid)`.
pub fn find_proposal_address(
    program_id: &Address,
    author: &Address,
    pid: ProposalId,
) -> Result<(Address, u8), AddressError> {
    find_program_address(
        &[PROPOSAL_SEED, author.as_ref(), std::slice::from_ref(&pid)],
        program_id,
    )
}

/// Proposal address for `(author, pid)` with a known bump.
pub fn create_proposal_address(
    program_id: &Address,
    author: &Address,
    pid: ProposalId,
    bump: u8,
) -> Result<Address, AddressError> {
    create_program_address(
        &[
            PROPOSAL_SEED,
            author.as_ref(),
            std::slice::from_ref(&pid),
            std::slice::from_ref(&bump),
        ],
        program_id,
    )
}

/// Canonical vote address and bump for `(proposal, voter)`.
pub fn find_vote_address(
    program_id: &Address,
    proposal: &Address,
    voter: &Address,
) -> Result<(Address, u8), AddressError> {
    find_program_address(&[VOTE_SEED, proposal.as_ref(), voter.as_ref()], program_id)
}

/// Default program id, derived from the program name.
#[must_use]
pub fn default_program_id() -> Address {
    Address::new(Sha256::digest(crate::PROGRAM_NAME.as_bytes()).into())
}

// =============================================================================
// RECORD DISCRIMINATORS
// =============================================================================

/// First 8 bytes of `sha256("account:<name>")`.
#[must_use]
pub fn account_discriminator(name: &str) -> [u8; 8] {
    let hash = Sha256::digest(format!("account:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}

// =============================================================================
// TESTS
// =============================================================================
