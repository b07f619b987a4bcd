use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueBackend;

enum Slot {
    Scalar {
        data: Bytes,
        expires_at: Option<Instant>,
    },
    List(Vec<Bytes>),
}

impl Slot {
    fn scalar(data: Bytes) -> Self {
        Self::Scalar {
            data,
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        matches!(self, Self::Scalar { expires_at: Some(at), .. } if *at <= now)
    }
}

/// In-memory, HashMap-based backend.
///
/// Intended for tests and embedding. Every primitive runs under a single
/// acquisition of one `RwLock`, which is what makes `incr` and `rpush`
/// atomic. Expiry is lazy: expired scalars read as absent and are dropped by
/// the next write to the same key or by [`purge_expired`](Self::purge_expired).
pub struct InMemoryBackend {
    slots: RwLock<HashMap<String, Slot>>,
}

impl InMemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live keys (scalars and lists).
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| !slot.is_expired(now))
            .count()
    }

    /// Returns `true` if no live key is held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted list of all live keys.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let map = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = map
            .iter()
            .filter(|(_, slot)| !slot.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Drop every expired scalar. Returns how many were removed.
    pub fn purge_expired(&self) -> StoreResult<usize> {
        let now = Instant::now();
        let mut map = self.write_slots()?;
        let before = map.len();
        map.retain(|_, slot| !slot.is_expired(now));
        Ok(before - map.len())
    }

    fn read_slots(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, Slot>>> {
        self.slots
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory backend lock poisoned".into()))
    }

    fn write_slots(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, Slot>>> {
        self.slots
            .write()
            .map_err(|_| StoreError::Unavailable("in-memory backend lock poisoned".into()))
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// The slot at `key`, after dropping it if it has expired.
fn live_slot<'a>(
    map: &'a mut HashMap<String, Slot>,
    key: &str,
    now: Instant,
) -> Option<&'a mut Slot> {
    if map.get(key).is_some_and(|slot| slot.is_expired(now)) {
        map.remove(key);
    }
    map.get_mut(key)
}

impl KeyValueBackend for InMemoryBackend {
    fn set(&self, key: &str, value: Bytes) -> StoreResult<()> {
        let mut map = self.write_slots()?;
        debug!(key, len = value.len(), "set");
        map.insert(key.to_string(), Slot::scalar(value));
        Ok(())
    }

    fn set_with_expiry(&self, key: &str, value: Bytes, ttl: Duration) -> StoreResult<()> {
        if ttl.is_zero() {
            return Err(StoreError::InvalidExpiry {
                key: key.to_string(),
            });
        }
        let expires_at = Instant::now().checked_add(ttl);
        let mut map = self.write_slots()?;
        debug!(key, len = value.len(), ttl_ms = ttl.as_millis() as u64, "set with expiry");
        map.insert(
            key.to_string(),
            Slot::Scalar {
                data: value,
                expires_at,
            },
        );
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<Bytes>> {
        let now = Instant::now();
        let map = self.read_slots()?;
        match map.get(key) {
            None => Ok(None),
            Some(slot) if slot.is_expired(now) => Ok(None),
            Some(Slot::Scalar { data, .. }) => Ok(Some(data.clone())),
            Some(Slot::List(_)) => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        let now = Instant::now();
        let map = self.read_slots()?;
        Ok(map.get(key).is_some_and(|slot| !slot.is_expired(now)))
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        let now = Instant::now();
        let mut map = self.write_slots()?;
        Ok(map
            .remove(key)
            .is_some_and(|slot| !slot.is_expired(now)))
    }

    fn incr(&self, key: &str) -> StoreResult<i64> {
        let now = Instant::now();
        let mut map = self.write_slots()?;
        match live_slot(&mut map, key, now) {
            None => {
                map.insert(key.to_string(), Slot::scalar(Bytes::from_static(b"1")));
                debug!(key, value = 1, "incr");
                Ok(1)
            }
            Some(Slot::Scalar { data, .. }) => {
                let current = std::str::from_utf8(data)
                    .ok()
                    .and_then(|s| s.parse::<i64>().ok())
                    .ok_or_else(|| StoreError::NotAnInteger {
                        key: key.to_string(),
                    })?;
                let next = current
                    .checked_add(1)
                    .ok_or_else(|| StoreError::IntegerOverflow {
                        key: key.to_string(),
                    })?;
                // Expiry, if any, is kept.
                *data = Bytes::from(next.to_string());
                debug!(key, value = next, "incr");
                Ok(next)
            }
            Some(Slot::List(_)) => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    fn rpush(&self, key: &str, value: Bytes) -> StoreResult<u64> {
        let now = Instant::now();
        let mut map = self.write_slots()?;
        let len = match live_slot(&mut map, key, now) {
            None => {
                map.insert(key.to_string(), Slot::List(vec![value]));
                1
            }
            Some(Slot::List(items)) => {
                items.push(value);
                items.len() as u64
            }
            Some(Slot::Scalar { .. }) => {
                return Err(StoreError::WrongType {
                    key: key.to_string(),
                })
            }
        };
        debug!(key, len, "rpush");
        Ok(len)
    }

    fn lrange(&self, key: &str) -> StoreResult<Vec<Bytes>> {
        let now = Instant::now();
        let map = self.read_slots()?;
        match map.get(key) {
            None => Ok(Vec::new()),
            Some(Slot::List(items)) => Ok(items.clone()),
            Some(slot) if slot.is_expired(now) => Ok(Vec::new()),
            Some(Slot::Scalar { .. }) => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    fn list_len(&self, key: &str) -> StoreResult<u64> {
        let now = Instant::now();
        let map = self.read_slots()?;
        match map.get(key) {
            None => Ok(0),
            Some(Slot::List(items)) => Ok(items.len() as u64),
            Some(slot) if slot.is_expired(now) => Ok(0),
            Some(Slot::Scalar { .. }) => Err(StoreError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    fn flush(&self) -> StoreResult<()> {
        let mut map = self.write_slots()?;
        let removed = map.len();
        map.clear();
        debug!(removed, "flush");
        Ok(())
    }

    fn flush_prefix(&self, prefix: &str) -> StoreResult<u64> {
        let mut map = self.write_slots()?;
        let before = map.len();
        map.retain(|key, _| !key.starts_with(prefix));
        let removed = (before - map.len()) as u64;
        debug!(prefix, removed, "flush prefix");
        Ok(removed)
    }
}

impl std::fmt::Debug for InMemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBackend")
            .field("key_count", &self.len())
            .finish()
    }
}
