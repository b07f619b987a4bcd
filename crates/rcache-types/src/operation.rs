use std::fmt;

use serde::Serialize;

/// Stable name of an instrumented operation, e.g. `Cache.store`.
///
/// The identity belongs to the operation *kind*, not to an instance: every
/// cache sharing a backend also shares the counter and history logs filed
/// under the same identity. Per-instance isolation comes only from giving
/// each instance its own backend or namespace.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OperationId(&'static str);

impl OperationId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Backend key holding the invocation counter.
    pub fn counter_key(&self) -> &'static str {
        self.0
    }

    /// Backend key of the list of serialized argument tuples.
    pub fn inputs_key(&self) -> String {
        format!("{}:inputs", self.0)
    }

    /// Backend key of the list of serialized results.
    pub fn outputs_key(&self) -> String {
        format!("{}:outputs", self.0)
    }
}

impl fmt::Debug for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperationId({})", self.0)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
