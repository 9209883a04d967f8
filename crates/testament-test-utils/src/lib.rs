#![deny(unsafe_code)]

//! Shared test utilities for the Testament workspace.
//!
//! Provides a sample verse corpus, config builders, a running-daemon harness,
//! and tracing helpers so integration tests stay concise.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! testament-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod corpus;
pub mod daemon;
pub mod tracing_setup;
