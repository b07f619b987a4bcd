//! Key-value backends for rcache.
//!
//! A backend knows nothing about instrumentation. It offers the small set of
//! primitives the cache and its decorators are built from: scalar slots with
//! optional expiry, atomic integer counters, and append-only lists.
//!
//! # Backends
//!
//! All backends implement the [`KeyValueBackend`] trait:
//!
//! - [`InMemoryBackend`] -- `HashMap`-based store for tests and embedding
//! - [`Namespaced`] -- prefixes every key of an inner backend, so several
//!   caches can share one backend without seeing each other's data
//!
//! # Design Rules
//!
//! 1. Each primitive is atomic: `incr` and `rpush` are one indivisible
//!    read-modify-write.
//! 2. A key holds either a scalar or a list; using the wrong primitive is a
//!    [`StoreError::WrongType`], never a silent overwrite.
//! 3. Expired scalars are indistinguishable from absent ones.
//! 4. Backend failures are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod namespace;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryBackend;
pub use namespace::Namespaced;
pub use traits::KeyValueBackend;
