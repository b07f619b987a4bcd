use std::sync::Arc;

use bytes::Bytes;
use rcache_store::{KeyValueBackend, StoreResult};
use rcache_types::{ArgTuple, Canonical, OperationId};
use serde::Serialize;
use tracing::debug;

use crate::operation::Operation;

/// Appends each call's arguments and result to the wrapped operation's
/// history logs.
///
/// Order per call: append input, invoke, append output, return. A failing
/// call leaves an input with no matching output; the error is returned
/// unchanged.
pub struct RecordHistory<O> {
    inner: O,
    backend: Arc<dyn KeyValueBackend>,
}

impl<O: Operation> RecordHistory<O> {
    pub fn new(inner: O, backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { inner, backend }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: Operation> Operation for RecordHistory<O> {
    type Args = O::Args;
    type Output = O::Output;
    type Error = O::Error;

    fn identity(&self) -> OperationId {
        self.inner.identity()
    }

    fn invoke(&self, args: &Self::Args) -> Result<Self::Output, Self::Error> {
        let identity = self.inner.identity();

        let rendered = args.render();
        debug!(operation = %identity, input = %rendered, "recording input");
        self.backend
            .rpush(&identity.inputs_key(), Bytes::from(rendered))?;

        let output = self.inner.invoke(args)?;

        let rendered = output.plain();
        debug!(operation = %identity, output = %rendered, "recording output");
        self.backend
            .rpush(&identity.outputs_key(), Bytes::from(rendered))?;

        Ok(output)
    }
}

/// Both history logs of one operation, oldest entry first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HistoryLog {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl HistoryLog {
    pub fn read(backend: &dyn KeyValueBackend, operation: OperationId) -> StoreResult<Self> {
        Ok(Self {
            inputs: decode_all(backend.lrange(&operation.inputs_key())?),
            outputs: decode_all(backend.lrange(&operation.outputs_key())?),
        })
    }

    /// Number of complete input/output pairs. An input whose call failed
    /// has no output and is not counted.
    pub fn pairs(&self) -> usize {
        self.inputs.len().min(self.outputs.len())
    }

    /// True when neither log holds any entry.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }
}

fn decode_all(items: Vec<Bytes>) -> Vec<String> {
    items
        .iter()
        .map(|item| String::from_utf8_lossy(item).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcache_store::{InMemoryBackend, StoreError};

    const CONCAT: OperationId = OperationId::new("Text.concat");

    struct Concat;

    impl Operation for Concat {
        type Args = (String, String);
        type Output = String;
        type Error = StoreError;

        fn identity(&self) -> OperationId {
            CONCAT
        }

        fn invoke(&self, args: &(String, String)) -> Result<String, StoreError> {
            if args.0.is_empty() {
                return Err(StoreError::Unavailable("nothing to concat".into()));
            }
            Ok(format!("{}{}", args.0, args.1))
        }
    }

    fn backend() -> Arc<dyn KeyValueBackend> {
        Arc::new(InMemoryBackend::new())
    }

    fn args(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn records_inputs_and_outputs_in_call_order() {
        let backend = backend();
        let op = RecordHistory::new(Concat, backend.clone());
        assert_eq!(op.invoke(&args("a", "b")).unwrap(), "ab");
        assert_eq!(op.invoke(&args("it's", "")).unwrap(), "it's");

        let log = HistoryLog::read(backend.as_ref(), CONCAT).unwrap();
        assert_eq!(log.inputs, vec!["('a', 'b')", "(\"it's\", '')"]);
        assert_eq!(log.outputs, vec!["ab", "it's"]);
        assert_eq!(log.pairs(), 2);
    }

    #[test]
    fn failed_call_leaves_unmatched_input() {
        let backend = backend();
        let op = RecordHistory::new(Concat, backend.clone());
        assert!(op.invoke(&args("", "x")).is_err());

        let log = HistoryLog::read(backend.as_ref(), CONCAT).unwrap();
        assert_eq!(log.inputs, vec!["('', 'x')"]);
        assert!(log.outputs.is_empty());
        assert_eq!(log.pairs(), 0);
        assert!(!log.is_empty());
    }

    #[test]
    fn backend_failure_on_input_append_skips_call() {
        let backend = backend();
        backend
            .set(&CONCAT.inputs_key(), Bytes::from_static(b"scalar"))
            .unwrap();
        let op = RecordHistory::new(Concat, backend.clone());
        assert!(matches!(
            op.invoke(&args("a", "b")),
            Err(StoreError::WrongType { .. })
        ));
        assert!(backend.lrange(&CONCAT.outputs_key()).unwrap().is_empty());
    }

    #[test]
    fn empty_history_for_unknown_operation() {
        let backend = backend();
        let log = HistoryLog::read(backend.as_ref(), OperationId::new("Never.called")).unwrap();
        assert!(log.is_empty());
        assert_eq!(log, HistoryLog::default());
    }

    #[test]
    fn history_serializes_as_json() {
        let log = HistoryLog {
            inputs: vec!["(1,)".into()],
            outputs: vec!["2".into()],
        };
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["inputs"][0], "(1,)");
        assert_eq!(json["outputs"][0], "2");
    }
}
