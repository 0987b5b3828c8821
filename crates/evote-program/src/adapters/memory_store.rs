//! # In-Memory Record Store
//!
//! `RecordStore` over a `BTreeMap` behind a single `RwLock`. Used by tests and
//! the demo node. A persistent backend would implement the same port.

use crate::domain::value_objects::Address;
use crate::errors::StoreError;
use crate::ports::outbound::{RecordStore, StoredRecord, WriteBatch, WriteOp};
use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

/// In-memory record store.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<BTreeMap<Address, StoredRecord>>,
}

impl InMemoryRecordStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites `address` unconditionally, bypassing version checks.
    ///
    /// For seeding fixtures such as closed proposals or corrupt records.
    pub fn put_raw(&self, address: Address, data: Vec<u8>) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        let version = records.get(&address).map_or(1, |r| r.version + 1);
        records.insert(address, StoredRecord { data, version });
        Ok(())
    }
}

fn validate(
    records: &BTreeMap<Address, StoredRecord>,
    ops: &[WriteOp],
) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(ops.len());
    for op in ops {
        let address = op.address();
        if !seen.insert(address) {
            return Err(StoreError::DuplicateWrite(address));
        }
        match op {
            WriteOp::Create { .. } => {
                if records.contains_key(&address) {
                    return Err(StoreError::AlreadyExists(address));
                }
            }
            WriteOp::Update {
                expected_version, ..
            } => {
                let current = records
                    .get(&address)
                    .ok_or(StoreError::NotFound(address))?;
                if current.version != *expected_version {
                    return Err(StoreError::VersionConflict {
                        address,
                        expected: *expected_version,
                        actual: current.version,
                    });
                }
            }
        }
    }
    Ok(())
}

impl RecordStore for InMemoryRecordStore {
    fn load(&self, address: &Address) -> Result<Option<StoredRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.get(address).cloned())
    }

    fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;

        // Nothing is written unless every op passes.
        validate(&records, batch.ops())?;

        for op in batch.into_ops() {
            match op {
                WriteOp::Create { address, data } => {
                    records.insert(address, StoredRecord { data, version: 1 });
                }
                WriteOp::Update {
                    address,
                    data,
                    expected_version,
                } => {
                    records.insert(
                        address,
                        StoredRecord {
                            data,
                            version: expected_version + 1,
                        },
                    );
                }
            }
        }
        Ok(())
    }

    fn addresses(&self) -> Result<Vec<Address>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.keys().copied().collect())
    }

    fn len(&self) -> Result<usize, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.len())
    }
}

// =============================================================================
// TESTS
// =============================================================================
