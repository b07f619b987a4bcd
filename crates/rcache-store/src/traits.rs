use std::time::Duration;

use bytes::Bytes;

use crate::error::StoreResult;

/// Key-value backend used by the cache and its instrumentation.
///
/// All implementations must satisfy these invariants:
/// - `incr` and `rpush` are atomic with respect to concurrent callers.
/// - List order is append order; lists are never reordered.
/// - A missing key is `Ok(None)` / an empty list, not an error.
/// - All backend failures are propagated, never silently ignored.
pub trait KeyValueBackend: Send + Sync {
    /// Store a scalar, replacing whatever the key held and clearing any
    /// expiry.
    fn set(&self, key: &str, value: Bytes) -> StoreResult<()>;

    /// Store a scalar that becomes absent once `ttl` has elapsed.
    fn set_with_expiry(&self, key: &str, value: Bytes, ttl: Duration) -> StoreResult<()>;

    /// Read a scalar. Returns `Ok(None)` if the key is absent or expired.
    fn get(&self, key: &str) -> StoreResult<Option<Bytes>>;

    /// Whether the key holds a live scalar or a list.
    fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Remove a key of either kind. Returns `true` if it existed.
    fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Atomically add one to the integer held at `key` (absent counts as 0)
    /// and return the new value.
    fn incr(&self, key: &str) -> StoreResult<i64>;

    /// Atomically append to the list at `key`, creating it if absent.
    /// Returns the list length after the append.
    fn rpush(&self, key: &str, value: Bytes) -> StoreResult<u64>;

    /// The full list at `key`, oldest first. Absent keys yield an empty list.
    fn lrange(&self, key: &str) -> StoreResult<Vec<Bytes>>;

    /// Length of the list at `key`.
    ///
    /// Default implementation reads the whole list. Backends may override.
    fn list_len(&self, key: &str) -> StoreResult<u64> {
        Ok(self.lrange(key)?.len() as u64)
    }

    /// Remove every key.
    fn flush(&self) -> StoreResult<()>;

    /// Remove every key starting with `prefix`. Returns how many were removed.
    fn flush_prefix(&self, prefix: &str) -> StoreResult<u64>;
}
