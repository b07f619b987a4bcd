use std::sync::Arc;

use rcache_store::KeyValueBackend;
use rcache_types::OperationId;
use tracing::debug;

use crate::operation::Operation;

/// Increments the counter for the wrapped operation's identity, then
/// delegates.
///
/// The increment happens before the inner call, so failing calls are
/// counted. Errors from the inner call pass through untouched.
pub struct CountCalls<O> {
    inner: O,
    backend: Arc<dyn KeyValueBackend>,
}

impl<O: Operation> CountCalls<O> {
    pub fn new(inner: O, backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { inner, backend }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: Operation> Operation for CountCalls<O> {
    type Args = O::Args;
    type Output = O::Output;
    type Error = O::Error;

    fn identity(&self) -> OperationId {
        self.inner.identity()
    }

    fn invoke(&self, args: &Self::Args) -> Result<Self::Output, Self::Error> {
        let identity = self.inner.identity();
        let count = self.backend.incr(identity.counter_key())?;
        debug!(operation = %identity, count, "call counted");
        self.inner.invoke(args)
    }
}
