use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::error::StoreResult;
use crate::traits::KeyValueBackend;

/// Backend adapter that confines every key to `<namespace>:`.
///
/// `flush` on a namespaced backend only clears the namespace, leaving other
/// tenants of the shared inner backend untouched.
pub struct Namespaced {
    inner: Arc<dyn KeyValueBackend>,
    prefix: String,
}

impl Namespaced {
    pub fn new(inner: Arc<dyn KeyValueBackend>, namespace: &str) -> Self {
        Self {
            inner,
            prefix: format!("{namespace}:"),
        }
    }

    /// The namespace without its trailing separator.
    pub fn namespace(&self) -> &str {
        self.prefix.trim_end_matches(':')
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

impl KeyValueBackend for Namespaced {
    fn set(&self, key: &str, value: Bytes) -> StoreResult<()> {
        self.inner.set(&self.scoped(key), value)
    }

    fn set_with_expiry(&self, key: &str, value: Bytes, ttl: Duration) -> StoreResult<()> {
        self.inner.set_with_expiry(&self.scoped(key), value, ttl)
    }

    fn get(&self, key: &str) -> StoreResult<Option<Bytes>> {
        self.inner.get(&self.scoped(key))
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        self.inner.exists(&self.scoped(key))
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        self.inner.delete(&self.scoped(key))
    }

    fn incr(&self, key: &str) -> StoreResult<i64> {
        self.inner.incr(&self.scoped(key))
    }

    fn rpush(&self, key: &str, value: Bytes) -> StoreResult<u64> {
        self.inner.rpush(&self.scoped(key), value)
    }

    fn lrange(&self, key: &str) -> StoreResult<Vec<Bytes>> {
        self.inner.lrange(&self.scoped(key))
    }

    fn list_len(&self, key: &str) -> StoreResult<u64> {
        self.inner.list_len(&self.scoped(key))
    }

    fn flush(&self) -> StoreResult<()> {
        self.inner.flush_prefix(&self.prefix).map(|_| ())
    }

    fn flush_prefix(&self, prefix: &str) -> StoreResult<u64> {
        self.inner.flush_prefix(&self.scoped(prefix))
    }
}

impl std::fmt::Debug for Namespaced {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespaced")
            .field("namespace", &self.namespace())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBackend;

    fn shared() -> (Arc<InMemoryBackend>, Namespaced, Namespaced) {
        let inner = Arc::new(InMemoryBackend::new());
        let a = Namespaced::new(inner.clone(), "a");
        let b = Namespaced::new(inner.clone(), "b");
        (inner, a, b)
    }

    #[test]
    fn keys_are_prefixed_on_inner_backend() {
        let (inner, a, _) = shared();
        a.set("k", Bytes::from_static(b"v")).unwrap();
        assert_eq!(inner.keys(), vec!["a:k".to_string()]);
        assert_eq!(a.get("k").unwrap(), Some(Bytes::from_static(b"v")));
    }

    #[test]
    fn namespaces_do_not_see_each_other() {
        let (_, a, b) = shared();
        a.incr("count").unwrap();
        a.incr("count").unwrap();
        b.incr("count").unwrap();
        assert_eq!(a.get("count").unwrap(), Some(Bytes::from_static(b"2")));
        assert_eq!(b.get("count").unwrap(), Some(Bytes::from_static(b"1")));
    }

    #[test]
    fn flush_clears_only_own_namespace() {
        let (inner, a, b) = shared();
        a.rpush("log", Bytes::from_static(b"x")).unwrap();
        b.rpush("log", Bytes::from_static(b"y")).unwrap();
        inner.set("global", Bytes::from_static(b"g")).unwrap();

        a.flush().unwrap();

        assert!(a.lrange("log").unwrap().is_empty());
        assert_eq!(b.list_len("log").unwrap(), 1);
        assert!(inner.exists("global").unwrap());
    }

    #[test]
    fn namespace_accessor_strips_separator() {
        let (_, a, _) = shared();
        assert_eq!(a.namespace(), "a");
        assert!(format!("{a:?}").contains("\"a\""));
    }
}
