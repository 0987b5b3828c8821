//! # E-Voting Test Suite
//!
//! Workspace-level tests that drive the program through its public API only.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks (derivation, signing, voting)
//! └── src/
//!     ├── fixtures.rs   # Keys, services, signed transactions
//!     └── integration/
//!         ├── scenarios.rs    # End-to-end proposal/vote flows
//!         ├── concurrency.rs  # Racing transitions on a multi-thread runtime
//!         └── signatures.rs   # Signed transaction authorization
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p evote-tests
//!
//! # By category
//! cargo test -p evote-tests integration::concurrency::
//!
//! # Benchmarks
//! cargo bench -p evote-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod fixtures;
pub mod integration;
