//! Recording event sink.

use std::sync::{Arc, Mutex, PoisonError};

use ext_engine::{EventSink, LifecycleEvent};

/// An [`EventSink`] keeping every published event, in order.
///
/// Clones share the same log.
#[derive(Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<LifecycleEvent>>>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event published so far, in order.
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &LifecycleEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
