//! Foundation types for rcache.
//!
//! Every other rcache crate depends on `rcache-types`. The types here carry
//! no storage or instrumentation behaviour of their own.
//!
//! # Key Types
//!
//! - [`EntryKey`] -- Random UUID v4 key generated by the cache on every write
//! - [`OperationId`] -- Stable, process-wide name of an instrumented operation
//! - [`Value`] -- A storable scalar or byte string
//! - [`Canonical`] / [`ArgTuple`] -- Text rendering used by call history

pub mod canonical;
pub mod error;
pub mod key;
pub mod operation;
pub mod value;

pub use canonical::{render_tuple, ArgTuple, Canonical};
pub use error::TypeError;
pub use key::EntryKey;
pub use operation::OperationId;
pub use value::{lossy_int, Value};
