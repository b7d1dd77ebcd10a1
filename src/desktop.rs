use std::sync::Arc;

use tauri::{plugin::PluginApi, AppHandle, Runtime, Window};

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::initiator::{CompletionHandle, PresentationSurface};
use crate::models::*;
use crate::platform;
use crate::Result;

pub fn init<R: Runtime>(
    app: &AppHandle<R>,
    api: PluginApi<R, Option<Config>>,
) -> Result<Share<R>> {
    let config = api.config().clone().unwrap_or_default();
    let share = Share {
        dispatcher: Dispatcher::new(config.request_code_base),
        app: app.clone(),
    };
    share.attach_events();
    Ok(share)
}

/// Access to the share APIs.
pub struct Share<R: Runtime> {
    dispatcher: Arc<Dispatcher>,
    app: AppHandle<R>,
}

impl<R: Runtime> Share<R> {
    /// Opens the share dialog for `args.text` and returns the request code that the
    /// later `shareCallback` event will carry.
    pub fn share(&self, args: ShareArgs) -> Result<String> {
        self.dispatch(InboundRequest::Share(args))
    }

    pub fn share_files(&self, args: ShareFilesArgs) -> Result<String> {
        self.dispatch(InboundRequest::ShareFiles(args))
    }

    pub fn dispatch(&self, request: InboundRequest) -> Result<String> {
        self.dispatcher.dispatch(request).map(|id| id.to_string())
    }

    /// Makes `window` the surface new share dialogs open on.
    pub fn attach_window(&self, window: Window<R>) {
        self.dispatcher
            .initiator()
            .attach(Arc::new(WindowSurface { window }));
    }

    pub fn detach_window(&self, label: &str) {
        self.dispatcher.initiator().detach_labeled(label);
    }

    /// Routes completion events to the frontend through the app's event system.
    pub fn attach_events(&self) {
        self.dispatcher.notifier().attach(Arc::new(self.app.clone()));
    }

    /// Stops emitting completion events; results that arrive meanwhile are dropped.
    pub fn detach_events(&self) {
        self.dispatcher.notifier().detach();
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}

struct WindowSurface<R: Runtime> {
    window: Window<R>,
}

impl<R: Runtime> PresentationSurface for WindowSurface<R> {
    fn label(&self) -> &str {
        self.window.label()
    }

    fn launch(&self, content: ShareContent, completion: CompletionHandle) -> Result<()> {
        let wait = platform::begin_share_wait(&self.window)?;
        if let Err(err) = platform::show_share_sheet(&self.window, &content) {
            wait.cancel();
            return Err(err);
        }
        std::thread::spawn(move || {
            let success = wait.wait();
            completion.complete(success);
        });
        Ok(())
    }
}
