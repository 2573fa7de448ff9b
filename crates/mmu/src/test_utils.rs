//! Testing utilities.

use crate::Trace;
use std::sync::{Arc, Mutex};

/// Collects the [Trace]s handed to an [crate::Mmu] trace hook.
#[derive(Debug, Default, Clone)]
pub(crate) struct TraceRecorder {
    traces: Arc<Mutex<Vec<Trace>>>,
}

impl TraceRecorder {
    /// Returns a hook that appends to this recorder.
    pub(crate) fn hook(&self) -> impl Fn(&Trace) + Send + Sync + 'static {
        let traces = Arc::clone(&self.traces);
        move |trace| traces.lock().unwrap().push(*trace)
    }

    /// Returns a copy of every trace recorded so far.
    pub(crate) fn traces(&self) -> Vec<Trace> {
        self.traces.lock().unwrap().clone()
    }
}
