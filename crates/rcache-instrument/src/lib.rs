//! Instrumentation for rcache operations.
//!
//! An [`Operation`] is any callable the cache exposes. Two wrappers add
//! bookkeeping around it without changing its result:
//!
//! - [`CountCalls`] increments a per-operation counter before every call
//! - [`RecordHistory`] appends the rendered arguments before the call and the
//!   rendered result after it
//!
//! Both implement [`Operation`] themselves, so they compose. The intended
//! chain is counter outermost, then history, then the real operation, which
//! is what [`OperationExt::instrumented`] builds. [`ReplayEngine`] reads the
//! resulting counter and logs back as a [`CallTrace`].
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use rcache_instrument::{Operation, OperationExt, ReplayEngine};
//! use rcache_store::{InMemoryBackend, KeyValueBackend, StoreError};
//! use rcache_types::OperationId;
//!
//! struct Double;
//!
//! impl Operation for Double {
//!     type Args = (i64,);
//!     type Output = i64;
//!     type Error = StoreError;
//!
//!     fn identity(&self) -> OperationId {
//!         OperationId::new("Math.double")
//!     }
//!
//!     fn invoke(&self, args: &(i64,)) -> Result<i64, StoreError> {
//!         Ok(args.0 * 2)
//!     }
//! }
//!
//! let backend: Arc<dyn KeyValueBackend> = Arc::new(InMemoryBackend::new());
//! let double = Double.instrumented(backend.clone());
//! assert_eq!(double.invoke(&(21,)).unwrap(), 42);
//!
//! let trace = ReplayEngine::trace(backend.as_ref(), double.identity()).unwrap();
//! assert_eq!(
//!     trace.to_string(),
//!     "Math.double was called 1 times:\nMath.double(*(21,)) -> 42\n"
//! );
//! ```

pub mod counter;
pub mod history;
pub mod operation;
pub mod replay;

pub use counter::CountCalls;
pub use history::{HistoryLog, RecordHistory};
pub use operation::{Operation, OperationExt};
pub use replay::{CallRecord, CallTrace, ReplayEngine};
