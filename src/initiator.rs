use std::sync::{Arc, RwLock, Weak};

use crate::files::prepare_files;
use crate::models::{RequestId, ShareContent};
use crate::sync::{read, write};
use crate::{Error, Result};

/// A foreground UI context that can put a share dialog in front of the user.
///
/// `launch` must return as soon as the dialog is up. The outcome is reported later by
/// consuming the [`CompletionHandle`]; a surface that returns `Err` must not complete it.
pub trait PresentationSurface: Send + Sync {
    /// Identifies the surface, e.g. the window label.
    fn label(&self) -> &str;

    fn launch(&self, content: ShareContent, completion: CompletionHandle) -> Result<()>;
}

/// Receives completion signals on behalf of the request registry.
pub trait CompletionListener: Send + Sync {
    /// Returns `true` if `id` was pending and its result has been handed to the notifier.
    fn on_completion(&self, id: RequestId, success: bool) -> bool;
}

/// One-shot route from a surface back to the initiator for a single request.
///
/// Stays usable after the surface that received it has been detached.
#[must_use = "a dropped handle leaves its request pending forever"]
pub struct CompletionHandle {
    id: RequestId,
    initiator: Weak<ShareInitiator>,
}

impl CompletionHandle {
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn complete(self, success: bool) -> bool {
        match self.initiator.upgrade() {
            Some(initiator) => initiator.on_completion(self.id, success),
            None => {
                log::debug!("share {} completed after the plugin was dropped", self.id);
                false
            }
        }
    }
}

/// A validated share, bound to the surface that was current when it was checked.
pub struct PreparedShare {
    surface: Arc<dyn PresentationSurface>,
    content: ShareContent,
}

impl PreparedShare {
    pub fn content(&self) -> &ShareContent {
        &self.content
    }
}

/// Owns the current surface binding and launches share dialogs on it.
#[derive(Default)]
pub struct ShareInitiator {
    surface: RwLock<Option<Arc<dyn PresentationSurface>>>,
    listener: RwLock<Option<Weak<dyn CompletionListener>>>,
}

impl ShareInitiator {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_completion_listener(&self, listener: Weak<dyn CompletionListener>) {
        *write(&self.listener) = Some(listener);
    }

    /// Binds `surface`, replacing whatever was bound before.
    pub fn attach(&self, surface: Arc<dyn PresentationSurface>) {
        let mut current = write(&self.surface);
        match current.as_ref() {
            Some(previous) if previous.label() == surface.label() => {}
            Some(previous) => log::debug!(
                "share surface {} replaced by {}",
                previous.label(),
                surface.label()
            ),
            None => log::debug!("share surface {} attached", surface.label()),
        }
        *current = Some(surface);
    }

    pub fn detach(&self) {
        if let Some(previous) = write(&self.surface).take() {
            log::debug!("share surface {} detached", previous.label());
        }
    }

    /// Detaches only if the current surface is `label`.
    pub fn detach_labeled(&self, label: &str) -> bool {
        let mut current = write(&self.surface);
        if current.as_ref().is_some_and(|surface| surface.label() == label) {
            *current = None;
            log::debug!("share surface {label} detached");
            true
        } else {
            false
        }
    }

    pub fn is_attached(&self) -> bool {
        read(&self.surface).is_some()
    }

    /// Checks a text share against the current surface without launching anything.
    pub fn prepare_text_share(
        &self,
        text: String,
        subject: Option<String>,
    ) -> Result<PreparedShare> {
        let surface = self.current_surface()?;
        if text.is_empty() {
            return Err(Error::InvalidArgs("Non-empty text expected".to_string()));
        }
        Ok(PreparedShare {
            surface,
            content: ShareContent::Text { text, subject },
        })
    }

    /// Resolves every path up front, so file errors surface before an id is handed out.
    pub fn prepare_file_share(
        &self,
        paths: &[String],
        mime_types: Option<&[String]>,
        text: Option<String>,
        subject: Option<String>,
    ) -> Result<PreparedShare> {
        let surface = self.current_surface()?;
        let files = prepare_files(paths, mime_types)?;
        Ok(PreparedShare {
            surface,
            content: ShareContent::Files {
                files,
                text,
                subject,
            },
        })
    }

    /// Opens a prepared share on the surface it was prepared against, even if that surface
    /// has been detached since.
    pub fn launch(self: &Arc<Self>, id: RequestId, prepared: PreparedShare) -> Result<()> {
        let PreparedShare { surface, content } = prepared;
        surface.launch(content, self.completion_handle(id))
    }

    pub fn share_text(
        self: &Arc<Self>,
        id: RequestId,
        text: String,
        subject: Option<String>,
    ) -> Result<()> {
        let prepared = self.prepare_text_share(text, subject)?;
        self.launch(id, prepared)
    }

    pub fn share_files(
        self: &Arc<Self>,
        id: RequestId,
        paths: &[String],
        mime_types: Option<&[String]>,
        text: Option<String>,
        subject: Option<String>,
    ) -> Result<()> {
        let prepared = self.prepare_file_share(paths, mime_types, text, subject)?;
        self.launch(id, prepared)
    }

    /// Forwards a completion signal to the dispatcher. Does not look at the surface
    /// binding, so signals from a detached surface still resolve.
    pub fn on_completion(&self, id: RequestId, success: bool) -> bool {
        let listener = read(&self.listener).as_ref().and_then(Weak::upgrade);
        match listener {
            Some(listener) => listener.on_completion(id, success),
            None => {
                log::warn!("share {id} completed with no dispatcher listening");
                false
            }
        }
    }

    fn current_surface(&self) -> Result<Arc<dyn PresentationSurface>> {
        read(&self.surface).clone().ok_or(Error::NoSurfaceAttached)
    }

    fn completion_handle(self: &Arc<Self>, id: RequestId) -> CompletionHandle {
        CompletionHandle {
            id,
            initiator: Arc::downgrade(self),
        }
    }
}
