//! In-process key-value cache with call counting, call history and replay.
//!
//! This is the main entry point for applications embedding rcache.
//!
//! ```rust
//! use rcache::Cache;
//!
//! let cache = Cache::in_memory().unwrap();
//! let key = cache.store("614").unwrap();
//! assert_eq!(cache.fetch_int(&key.to_string()).unwrap(), 614);
//! assert_eq!(cache.fetch_int("no-such-key").unwrap(), 0);
//!
//! let trace = cache.trace(Cache::STORE).unwrap();
//! assert_eq!(trace.count, 1);
//! assert_eq!(trace.calls[0].input, "('614',)");
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::Cache;
pub use config::CacheConfig;
pub use error::{CacheError, CacheResult};

// Re-export key types
pub use rcache_instrument::{CallRecord, CallTrace, HistoryLog, Operation, OperationExt};
pub use rcache_store::{InMemoryBackend, KeyValueBackend, Namespaced, StoreError};
pub use rcache_types::{EntryKey, OperationId, Value};
