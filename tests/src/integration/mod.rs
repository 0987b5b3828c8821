//! # Integration Tests
//!
//! Cross-layer flows: service, codec, store and event log together.

pub mod concurrency;
pub mod scenarios;
pub mod signatures;
