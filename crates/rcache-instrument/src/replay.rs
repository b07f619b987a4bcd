use std::fmt;

use rcache_store::{KeyValueBackend, StoreResult};
use rcache_types::{lossy_int, OperationId};
use serde::Serialize;
use tracing::{debug, warn};

use crate::history::HistoryLog;

/// One replayed call: rendered argument tuple and rendered result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    pub input: String,
    pub output: String,
}

/// Reconstructed call history of one operation.
///
/// Renders (via `Display`) as a header line followed by one line per
/// recorded call:
///
/// ```text
/// Cache.store was called 2 times:
/// Cache.store(*('a',)) -> 0b2e...
/// Cache.store(*(3.5,)) -> 94c1...
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CallTrace {
    pub operation: OperationId,
    /// Counter value; may exceed `calls.len()` when calls failed.
    pub count: i64,
    pub calls: Vec<CallRecord>,
    /// Inputs with no output (a call that failed or was interrupted).
    pub dropped_inputs: usize,
    /// Outputs with no input. Only possible if the logs were tampered with.
    pub dropped_outputs: usize,
}

impl CallTrace {
    /// Pair the logs positionally, dropping whichever tail is longer.
    pub fn from_parts(operation: OperationId, count: i64, history: HistoryLog) -> Self {
        let dropped_inputs = history.inputs.len().saturating_sub(history.outputs.len());
        let dropped_outputs = history.outputs.len().saturating_sub(history.inputs.len());
        if dropped_inputs + dropped_outputs > 0 {
            warn!(
                operation = %operation,
                dropped_inputs,
                dropped_outputs,
                "history logs differ in length; unmatched entries omitted from replay"
            );
        }

        let calls = history
            .inputs
            .into_iter()
            .zip(history.outputs)
            .map(|(input, output)| CallRecord { input, output })
            .collect();

        Self {
            operation,
            count,
            calls,
            dropped_inputs,
            dropped_outputs,
        }
    }

    pub fn header(&self) -> String {
        format!("{} was called {} times:", self.operation, self.count)
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls
            .iter()
            .map(|call| format!("{}(*{}) -> {}", self.operation, call.input, call.output))
            .collect()
    }
}

impl fmt::Display for CallTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Read-only reconstruction of call history.
pub struct ReplayEngine;

impl ReplayEngine {
    /// Read the counter and both logs of `operation`.
    ///
    /// A counter that is absent or not an integer reads as `0`; an operation
    /// that was never called yields a header-only trace.
    pub fn trace(backend: &dyn KeyValueBackend, operation: OperationId) -> StoreResult<CallTrace> {
        let count = Self::count(backend, operation)?;
        let history = HistoryLog::read(backend, operation)?;
        debug!(
            operation = %operation,
            count,
            inputs = history.inputs.len(),
            outputs = history.outputs.len(),
            "replaying history"
        );
        Ok(CallTrace::from_parts(operation, count, history))
    }

    /// Current counter value of `operation`, `0` when absent or malformed.
    pub fn count(backend: &dyn KeyValueBackend, operation: OperationId) -> StoreResult<i64> {
        Ok(backend
            .get(operation.counter_key())?
            .map(|raw| lossy_int(&raw))
            .unwrap_or(0))
    }
}
