//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the voting program depends on:
//! - Persistent keyed record storage
//! - Event publication
//!
//! Dependencies point INWARD: adapters implement these traits.

use crate::domain::value_objects::Address;
use crate::errors::StoreError;
use crate::events::ProgramEvent;

// =============================================================================
// RECORD STORE
// =============================================================================

/// Bytes stored at one address, with a version bumped on every write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredRecord {
    /// Encoded record.
    pub data: Vec<u8>,
    /// Starts at 1 on creation.
    pub version: u64,
}

/// A single write inside a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    /// Insert-if-absent. Fails if the address is occupied.
    Create {
        /// Target address.
        address: Address,
        /// Encoded record.
        data: Vec<u8>,
    },
    /// Overwrite an existing record built from `expected_version`.
    Update {
        /// Target address.
        address: Address,
        /// Encoded record.
        data: Vec<u8>,
        /// Version the caller read before building `data`.
        expected_version: u64,
    },
}

impl WriteOp {
    /// Address this op writes.
    #[must_use]
    pub fn address(&self) -> Address {
        match self {
            Self::Create { address, .. } | Self::Update { address, .. } => *address,
        }
    }
}

/// Writes applied all-or-nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an insert-if-absent.
    #[must_use]
    pub fn create(mut self, address: Address, data: Vec<u8>) -> Self {
        self.ops.push(WriteOp::Create { address, data });
        self
    }

    /// Adds a version-checked overwrite.
    #[must_use]
    pub fn update(mut self, address: Address, data: Vec<u8>, expected_version: u64) -> Self {
        self.ops.push(WriteOp::Update {
            address,
            data,
            expected_version,
        });
        self
    }

    /// Ops in insertion order.
    #[must_use]
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Consumes the batch.
    #[must_use]
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    /// Number of ops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if the batch has no ops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Persistent keyed storage for program records.
///
/// ## Atomicity
///
/// `apply` must validate every op before applying any of them. If one op
/// fails, the store is left exactly as it was. Implementations must make
/// `apply` linearizable with respect to concurrent `apply` and `load` calls.
pub trait RecordStore: Send + Sync {
    /// Record at `address`, or `None` if the address is empty.
    fn load(&self, address: &Address) -> Result<Option<StoredRecord>, StoreError>;

    /// Applies a batch atomically.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if a `Create` targets an occupied address
    /// - `NotFound` if an `Update` targets an empty address
    /// - `VersionConflict` if an `Update` was built against a stale version
    /// - `DuplicateWrite` if the batch touches one address twice
    fn apply(&self, batch: WriteBatch) -> Result<(), StoreError>;

    /// All occupied addresses, in ascending order.
    fn addresses(&self) -> Result<Vec<Address>, StoreError>;

    /// Number of stored records.
    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.addresses()?.len())
    }

    /// Returns true if `address` is occupied.
    fn contains(&self, address: &Address) -> Result<bool, StoreError> {
        Ok(self.load(address)?.is_some())
    }
}

// =============================================================================
// EVENT PUBLISHER
// =============================================================================

/// Sink for events emitted by committed transitions.
///
/// Publication happens after the write batch commits. A publisher failure is
/// logged and never rolls back the transition.
pub trait EventPublisher: Send + Sync {
    /// Publishes one event.
    fn publish(&self, event: ProgramEvent) -> Result<(), String>;
}
