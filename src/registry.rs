use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{CompletionEvent, RequestId};
use crate::sync::lock;

/// Pending requests, keyed by the id handed back to the caller.
///
/// An id that is not present was either never issued or has already been resolved;
/// the two cases are deliberately not told apart.
#[derive(Debug, Default)]
pub struct RequestRegistry {
    pending: Mutex<HashMap<RequestId, CompletionEvent>>,
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pending request. `id` must not already be registered.
    pub fn register(&self, id: RequestId, event: CompletionEvent) {
        let previous = lock(&self.pending).insert(id, event);
        debug_assert!(previous.is_none(), "request {id} registered twice");
    }

    /// Removes `id` and returns its event, or `None` if it is unknown.
    pub fn resolve(&self, id: RequestId) -> Option<CompletionEvent> {
        lock(&self.pending).remove(&id)
    }

    pub fn contains(&self, id: RequestId) -> bool {
        lock(&self.pending).contains_key(&id)
    }

    pub fn len(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
