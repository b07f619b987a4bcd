use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use rcache_instrument::{
    CallTrace, CountCalls, HistoryLog, Operation, OperationExt, RecordHistory, ReplayEngine,
};
use rcache_store::{InMemoryBackend, KeyValueBackend, Namespaced};
use rcache_types::{lossy_int, EntryKey, OperationId, Value};
use tracing::{debug, info};

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};

/// Writes a value under a freshly generated key. Wrapped by [`Cache`] in
/// counting and history recording.
struct StoreEntry {
    backend: Arc<dyn KeyValueBackend>,
}

impl Operation for StoreEntry {
    type Args = (Value,);
    type Output = EntryKey;
    type Error = CacheError;

    fn identity(&self) -> OperationId {
        Cache::STORE
    }

    fn invoke(&self, args: &(Value,)) -> CacheResult<EntryKey> {
        let (value,) = args;
        let key = EntryKey::new();
        self.backend.set(&key.to_string(), value.encode())?;
        debug!(key = %key, kind = value.kind(), "stored entry");
        Ok(key)
    }
}

/// Key-value cache with an instrumented `store` operation.
///
/// Every construction clears the cache's namespace (the whole backend when no
/// namespace is configured), so nothing written by an earlier cache on the
/// same backend is visible afterwards.
///
/// Counters and history are filed under [`Cache::STORE`], shared by every
/// cache on the same backend and namespace.
pub struct Cache {
    backend: Arc<dyn KeyValueBackend>,
    config: CacheConfig,
    store_op: CountCalls<RecordHistory<StoreEntry>>,
}

impl Cache {
    /// Identity of [`Cache::store`].
    pub const STORE: OperationId = OperationId::new("Cache.store");

    /// A cache over a private in-memory backend.
    pub fn in_memory() -> CacheResult<Self> {
        Self::new(Arc::new(InMemoryBackend::new()))
    }

    pub fn new(backend: Arc<dyn KeyValueBackend>) -> CacheResult<Self> {
        Self::with_config(backend, CacheConfig::default())
    }

    /// Build a cache and clear its namespace. Fails if the backend cannot
    /// be flushed.
    pub fn with_config(backend: Arc<dyn KeyValueBackend>, config: CacheConfig) -> CacheResult<Self> {
        config.validate()?;
        let backend: Arc<dyn KeyValueBackend> = match &config.namespace {
            Some(namespace) => Arc::new(Namespaced::new(backend, namespace)),
            None => backend,
        };
        let store_op = StoreEntry {
            backend: Arc::clone(&backend),
        }
        .instrumented(Arc::clone(&backend));

        let cache = Self {
            backend,
            config,
            store_op,
        };
        cache.reset()?;
        info!(namespace = ?cache.config.namespace, "cache initialized");
        Ok(cache)
    }

    /// Remove every entry, counter and history log in the namespace.
    pub fn reset(&self) -> CacheResult<()> {
        self.backend.flush()?;
        debug!(namespace = ?self.config.namespace, "namespace flushed");
        Ok(())
    }

    // ---- Storage ----

    /// Store a value under a new key and return the key.
    ///
    /// The call is counted and recorded in the `Cache.store` history.
    pub fn store(&self, value: impl Into<Value>) -> CacheResult<EntryKey> {
        self.store_op.invoke(&(value.into(),))
    }

    /// Raw bytes stored under `key`, or `None` if there is nothing there.
    pub fn fetch(&self, key: &str) -> CacheResult<Option<Bytes>> {
        Ok(self.backend.get(key)?)
    }

    /// Like [`fetch`](Self::fetch), converting present values with
    /// `transform`.
    pub fn fetch_with<T>(
        &self,
        key: &str,
        transform: impl FnOnce(Bytes) -> T,
    ) -> CacheResult<Option<T>> {
        Ok(self.fetch(key)?.map(transform))
    }

    /// The value under `key` parsed as an integer.
    ///
    /// Missing keys and values that are not integer text both read as `0`.
    /// Only backend failures are errors.
    pub fn fetch_int(&self, key: &str) -> CacheResult<i64> {
        Ok(self.fetch_with(key, |raw| lossy_int(&raw))?.unwrap_or(0))
    }

    /// The value under `key` decoded as UTF-8 text.
    pub fn fetch_text(&self, key: &str) -> CacheResult<String> {
        let raw = self
            .fetch(key)?
            .ok_or_else(|| CacheError::MissingKey(key.to_string()))?;
        String::from_utf8(raw.to_vec()).map_err(|e| CacheError::Decode {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// Store `value` under a caller-chosen `key` that disappears after
    /// `ttl`. Not instrumented.
    pub fn set_with_expiry(
        &self,
        key: &str,
        value: impl Into<Value>,
        ttl: Duration,
    ) -> CacheResult<()> {
        self.backend.set_with_expiry(key, value.into().encode(), ttl)?;
        Ok(())
    }

    /// [`set_with_expiry`](Self::set_with_expiry) with the configured
    /// default expiry.
    pub fn set_expiring(&self, key: &str, value: impl Into<Value>) -> CacheResult<()> {
        self.set_with_expiry(key, value, self.config.default_expiry())
    }

    // ---- Instrumentation ----

    /// How many times `operation` has been invoked.
    pub fn call_count(&self, operation: OperationId) -> CacheResult<i64> {
        Ok(ReplayEngine::count(self.backend.as_ref(), operation)?)
    }

    pub fn history(&self, operation: OperationId) -> CacheResult<HistoryLog> {
        Ok(HistoryLog::read(self.backend.as_ref(), operation)?)
    }

    pub fn trace(&self, operation: OperationId) -> CacheResult<CallTrace> {
        Ok(ReplayEngine::trace(self.backend.as_ref(), operation)?)
    }

    /// Write the replayed call log of `operation` to `out`.
    pub fn replay_to<W: Write>(&self, operation: OperationId, out: &mut W) -> CacheResult<()> {
        let trace = self.trace(operation)?;
        write!(out, "{trace}")?;
        out.flush()?;
        Ok(())
    }

    /// Print the replayed call log of `operation` to stdout.
    pub fn replay(&self, operation: OperationId) -> CacheResult<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.replay_to(operation, &mut out)
    }

    // ---- Accessors ----

    /// The backend as seen by this cache (namespaced if configured).
    pub fn backend(&self) -> &Arc<dyn KeyValueBackend> {
        &self.backend
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("namespace", &self.config.namespace)
            .field("store_operation", &Self::STORE)
            .finish()
    }
}
