use std::sync::Arc;

use rcache_store::{KeyValueBackend, StoreError};
use rcache_types::{ArgTuple, Canonical, OperationId};

use crate::counter::CountCalls;
use crate::history::RecordHistory;

/// A callable unit that instrumentation can wrap.
///
/// Wrappers implement this trait too, delegating to an inner operation, so
/// any number of them can be stacked. The trait is `Send + Sync` so wrapped
/// operations can live inside a shared cache.
pub trait Operation: Send + Sync {
    /// Positional arguments, rendered into the inputs log.
    type Args: ArgTuple;
    /// Result, rendered into the outputs log.
    type Output: Canonical;
    /// Error of the underlying call. Wrappers raise backend failures through
    /// the same type.
    type Error: From<StoreError>;

    /// Process-wide name under which counters and logs are filed.
    fn identity(&self) -> OperationId;

    /// Run the operation.
    fn invoke(&self, args: &Self::Args) -> Result<Self::Output, Self::Error>;
}

/// Builder methods for wrapping any [`Operation`].
pub trait OperationExt: Operation + Sized {
    /// Count every call of this operation.
    fn counted(self, backend: Arc<dyn KeyValueBackend>) -> CountCalls<Self> {
        CountCalls::new(self, backend)
    }

    /// Record the arguments and result of every call of this operation.
    fn recorded(self, backend: Arc<dyn KeyValueBackend>) -> RecordHistory<Self> {
        RecordHistory::new(self, backend)
    }

    /// Counter outermost, then history, then this operation.
    ///
    /// With this order the counter moves exactly once per call, even when
    /// recording the history or the call itself fails.
    fn instrumented(self, backend: Arc<dyn KeyValueBackend>) -> CountCalls<RecordHistory<Self>> {
        self.recorded(Arc::clone(&backend)).counted(backend)
    }
}

impl<O: Operation> OperationExt for O {}
