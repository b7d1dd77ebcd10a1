use std::sync::{Arc, Mutex, Weak};

use crate::initiator::{CompletionListener, PreparedShare, ShareInitiator};
use crate::models::{CompletionEvent, InboundRequest, RequestId, ShareResult};
use crate::notifier::ResultNotifier;
use crate::registry::RequestRegistry;
use crate::sync::lock;
use crate::{Error, Result};

/// Turns share requests into request ids and routes each completion to exactly one event.
///
/// A request is either issued (registered, waiting for its completion signal) or resolved
/// (removed from the registry, event handed to the notifier). There is no timeout: a
/// request whose share dialog never reports back stays issued.
pub struct Dispatcher {
    registry: RequestRegistry,
    initiator: Arc<ShareInitiator>,
    notifier: ResultNotifier,
    last_issued: Mutex<RequestId>,
}

impl Dispatcher {
    /// The first id handed out is `base + 1`.
    pub fn new(base: u32) -> Arc<Self> {
        let dispatcher = Arc::new(Self {
            registry: RequestRegistry::new(),
            initiator: Arc::new(ShareInitiator::new()),
            notifier: ResultNotifier::new(),
            last_issued: Mutex::new(RequestId::new(base)),
        });
        let listener: Weak<dyn CompletionListener> = Arc::downgrade(&dispatcher) as _;
        dispatcher.initiator.set_completion_listener(listener);
        dispatcher
    }

    pub fn initiator(&self) -> &Arc<ShareInitiator> {
        &self.initiator
    }

    pub fn notifier(&self) -> &ResultNotifier {
        &self.notifier
    }

    pub fn registry(&self) -> &RequestRegistry {
        &self.registry
    }

    pub fn dispatch(&self, request: InboundRequest) -> Result<RequestId> {
        match request {
            InboundRequest::Share(args) => self.handle_share(args.text, args.subject),
            InboundRequest::ShareFiles(args) => self.handle_share_files(
                &args.paths,
                args.mime_types.as_deref(),
                args.text,
                args.subject,
            ),
        }
    }

    pub fn handle_share(&self, text: String, subject: Option<String>) -> Result<RequestId> {
        let prepared = self
            .initiator
            .prepare_text_share(text, subject)
            .inspect_err(|err| log::warn!("share request rejected: {err}"))?;
        self.issue(CompletionEvent::Share, prepared)
    }

    pub fn handle_share_files(
        &self,
        paths: &[String],
        mime_types: Option<&[String]>,
        text: Option<String>,
        subject: Option<String>,
    ) -> Result<RequestId> {
        let prepared = self
            .initiator
            .prepare_file_share(paths, mime_types, text, subject)
            .inspect_err(|err| log::warn!("file share request rejected: {err}"))?;
        self.issue(CompletionEvent::ShareFiles, prepared)
    }

    /// Resolves `id` and emits its event. Returns `false` for ids that are unknown or
    /// already resolved.
    pub fn on_completion(&self, id: RequestId, success: bool) -> bool {
        let Some(event) = self.registry.resolve(id) else {
            log::debug!("ignoring completion for unknown share {id}");
            return false;
        };
        log::debug!("share {id} resolved (success: {success})");
        self.notifier.notify(event.name(), ShareResult::new(id, success));
        true
    }

    // Registered before launch: a surface may complete from inside `launch`. No lock is
    // held while launching, since platform surfaces block on the main thread.
    fn issue(&self, event: CompletionEvent, prepared: PreparedShare) -> Result<RequestId> {
        let id = self.allocate(event)?;
        if let Err(err) = self.initiator.launch(id, prepared) {
            self.registry.resolve(id);
            log::warn!("share {id} failed to launch: {err}");
            return Err(err);
        }
        log::debug!("share {id} issued, awaiting {event}");
        Ok(id)
    }

    fn allocate(&self, event: CompletionEvent) -> Result<RequestId> {
        let mut last_issued = lock(&self.last_issued);
        let id = last_issued
            .successor()
            .ok_or(Error::RequestCodesExhausted(*last_issued))?;
        self.registry.register(id, event);
        *last_issued = id;
        Ok(id)
    }
}

impl CompletionListener for Dispatcher {
    fn on_completion(&self, id: RequestId, success: bool) -> bool {
        Dispatcher::on_completion(self, id, success)
    }
}
