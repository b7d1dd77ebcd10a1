use std::collections::VecDeque;
use std::sync::Mutex;

use crate::initiator::{CompletionHandle, PresentationSurface};
use crate::models::{RequestId, ShareContent, ShareResult};
use crate::notifier::EventSink;
use crate::{Error, Result};

/// Holds on to completion handles until the test settles them.
pub struct ManualSurface {
    label: String,
    launched: Mutex<Vec<ShareContent>>,
    handles: Mutex<VecDeque<CompletionHandle>>,
}

impl ManualSurface {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            launched: Mutex::new(Vec::new()),
            handles: Mutex::new(VecDeque::new()),
        }
    }

    pub fn launched(&self) -> Vec<ShareContent> {
        self.launched.lock().unwrap().clone()
    }

    pub fn pending_ids(&self) -> Vec<RequestId> {
        self.handles.lock().unwrap().iter().map(|h| h.id()).collect()
    }

    pub fn complete_next(&self, success: bool) -> bool {
        let handle = self
            .handles
            .lock()
            .unwrap()
            .pop_front()
            .expect("no pending share on this surface");
        handle.complete(success)
    }
}

impl PresentationSurface for ManualSurface {
    fn label(&self) -> &str {
        &self.label
    }

    fn launch(&self, content: ShareContent, completion: CompletionHandle) -> Result<()> {
        self.launched.lock().unwrap().push(content);
        self.handles.lock().unwrap().push_back(completion);
        Ok(())
    }
}

/// Reports the outcome before `launch` even returns.
pub struct ImmediateSurface(pub bool);

impl PresentationSurface for ImmediateSurface {
    fn label(&self) -> &str {
        "immediate"
    }

    fn launch(&self, _content: ShareContent, completion: CompletionHandle) -> Result<()> {
        completion.complete(self.0);
        Ok(())
    }
}

/// A surface whose share dialog never opens.
pub struct FailingSurface;

impl PresentationSurface for FailingSurface {
    fn label(&self) -> &str {
        "failing"
    }

    fn launch(&self, _content: ShareContent, _completion: CompletionHandle) -> Result<()> {
        Err(Error::NativeApi("share dialog unavailable".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(String, ShareResult)>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<(String, ShareResult)> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &str, payload: &ShareResult) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push((event.to_string(), payload.clone()));
        Ok(())
    }
}
