use std::sync::{Arc, RwLock};

use tauri::{AppHandle, Emitter, Runtime};

use crate::models::ShareResult;
use crate::sync::{read, write};
use crate::Result;

/// Outbound half of the frontend channel: fire-and-forget named events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &str, payload: &ShareResult) -> Result<()>;
}

impl<R: Runtime> EventSink for AppHandle<R> {
    fn emit(&self, event: &str, payload: &ShareResult) -> Result<()> {
        Emitter::emit(self, event, payload).map_err(Into::into)
    }
}

/// Best-effort, at-most-once delivery of share results.
///
/// The sink can come and go independently of any window; while it is absent results are
/// dropped rather than queued.
#[derive(Default)]
pub struct ResultNotifier {
    sink: RwLock<Option<Arc<dyn EventSink>>>,
}

impl ResultNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, sink: Arc<dyn EventSink>) {
        *write(&self.sink) = Some(sink);
    }

    pub fn detach(&self) {
        *write(&self.sink) = None;
    }

    pub fn is_attached(&self) -> bool {
        read(&self.sink).is_some()
    }

    pub fn notify(&self, event: &str, payload: ShareResult) {
        let sink = read(&self.sink).clone();
        let Some(sink) = sink else {
            log::warn!(
                "dropping {event} for request {}: no event sink attached",
                payload.request_code
            );
            return;
        };
        if let Err(e) = sink.emit(event, &payload) {
            log::warn!(
                "failed to emit {event} for request {}: {e}",
                payload.request_code
            );
        }
    }
}
