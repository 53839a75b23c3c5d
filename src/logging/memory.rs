//! In-memory event sink for testing

use super::EventSink;
use parking_lot::Mutex;
use std::sync::Arc;

/// An event sink that keeps every message in memory
///
/// Clones share the same buffer, so a test can hand one clone to the store
/// and read the events back through another.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded messages, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl EventSink for MemorySink {
    fn info(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
