#![deny(unsafe_code)]

//! Testament core: verse reference resolution and the chat bot runtime.
//!
//! A reference such as `$2:110-120` flows through the pipeline
//! [`reference`] (scan) → [`validate`] → [`lookup`] → [`store`] (fetch) →
//! [`render`] → [`format`]. [`resolver::Resolver`] drives that pipeline;
//! [`bot::Bot`] and [`daemon::Daemon`] put it behind a chat message bus.

use std::future::Future;
use std::pin::Pin;

/// A type-erased, `Send`-safe, boxed future, used by object-safe async trait
/// methods such as [`store::VerseStore::fetch`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Chat command handling.
pub mod bot;
/// Compile-time build metadata (version, git hash, profile).
pub mod build_info;
/// Async daemon runtime and message bus.
pub mod daemon;
/// Length cap and display envelope for outgoing passages.
pub mod format;
/// Fetch descriptors for the verse store.
pub mod lookup;
/// Message envelope types for the internal bus.
pub mod message;
/// Random verse references.
pub mod random;
/// Verse reference types and the reference scanner.
pub mod reference;
/// Passage rendering.
pub mod render;
/// The resolve-and-render pipeline.
pub mod resolver;
/// Verse store trait and the in-memory JSON corpus store.
pub mod store;
/// Reference validation.
pub mod validate;
/// Per-chapter verse counts.
pub mod verse_counts;

pub use bot::Bot;
pub use daemon::Daemon;
pub use format::OutputFormatter;
pub use reference::{ReferenceError, VerseReference, VerseSpan};
pub use resolver::{Passage, ResolveError, Resolver};
pub use store::{MemoryStore, VerseRecord, VerseStore};
pub use validate::{ReferenceRules, VerseBound};
