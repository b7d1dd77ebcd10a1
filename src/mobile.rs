use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tauri::{
    plugin::{PluginApi, PluginHandle},
    AppHandle, Runtime, Window,
};

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::files::reduce_mime_types;
use crate::initiator::{CompletionHandle, PresentationSurface};
use crate::models::*;
use crate::Result;

// The crate ships no Kotlin or Swift sources. An Android app that bundles a `SharePlugin`
// class under this package gets native share sheets; everywhere else each share settles
// with `result: false` right after it is issued.
#[cfg(target_os = "android")]
const PLUGIN_IDENTIFIER: &str = "app.tauri.share";

pub fn init<R: Runtime>(
    app: &AppHandle<R>,
    api: PluginApi<R, Option<Config>>,
) -> Result<Share<R>> {
    let config = api.config().clone().unwrap_or_default();
    let share = Share {
        dispatcher: Dispatcher::new(config.request_code_base),
        handle: register_native_plugin(&api).map(Arc::new),
        app: app.clone(),
    };
    share.attach_events();
    Ok(share)
}

#[cfg(target_os = "android")]
fn register_native_plugin<R: Runtime>(
    api: &PluginApi<R, Option<Config>>,
) -> Option<PluginHandle<R>> {
    api.register_android_plugin(PLUGIN_IDENTIFIER, "SharePlugin")
        .inspect_err(|e| {
            log::warn!("native share plugin unavailable, shares will report failure: {e}")
        })
        .ok()
}

#[cfg(not(target_os = "android"))]
fn register_native_plugin<R: Runtime>(
    _api: &PluginApi<R, Option<Config>>,
) -> Option<PluginHandle<R>> {
    log::warn!("no native share plugin on this platform, shares will report failure");
    None
}

/// Arguments of the native `share` call. The native side resolves the call once the
/// share activity returns.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NativeShareArgs {
    request_code: String,
    text: Option<String>,
    subject: Option<String>,
    paths: Vec<String>,
    mime_type: String,
}

#[derive(Debug, Deserialize)]
struct NativeShareOutcome {
    success: bool,
}

/// Access to the share APIs.
pub struct Share<R: Runtime> {
    dispatcher: Arc<Dispatcher>,
    handle: Option<Arc<PluginHandle<R>>>,
    app: AppHandle<R>,
}

impl<R: Runtime> Share<R> {
    pub fn share(&self, args: ShareArgs) -> Result<String> {
        self.dispatch(InboundRequest::Share(args))
    }

    pub fn share_files(&self, args: ShareFilesArgs) -> Result<String> {
        self.dispatch(InboundRequest::ShareFiles(args))
    }

    pub fn dispatch(&self, request: InboundRequest) -> Result<String> {
        self.dispatcher.dispatch(request).map(|id| id.to_string())
    }

    /// The activity behind `window` becomes the surface share intents launch from.
    pub fn attach_window(&self, window: Window<R>) {
        self.dispatcher.initiator().attach(Arc::new(ActivitySurface {
            label: window.label().to_string(),
            handle: self.handle.clone(),
        }));
    }

    pub fn detach_window(&self, label: &str) {
        self.dispatcher.initiator().detach_labeled(label);
    }

    pub fn attach_events(&self) {
        self.dispatcher.notifier().attach(Arc::new(self.app.clone()));
    }

    pub fn detach_events(&self) {
        self.dispatcher.notifier().detach();
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}

struct ActivitySurface<R: Runtime> {
    label: String,
    handle: Option<Arc<PluginHandle<R>>>,
}

impl<R: Runtime> PresentationSurface for ActivitySurface<R> {
    fn label(&self) -> &str {
        &self.label
    }

    fn launch(&self, content: ShareContent, completion: CompletionHandle) -> Result<()> {
        let Some(handle) = self.handle.clone() else {
            log::warn!("share {} has no native share sheet to open", completion.id());
            completion.complete(false);
            return Ok(());
        };
        let args = NativeShareArgs {
            request_code: completion.id().to_string(),
            text: content.text().map(str::to_string),
            subject: content.subject().map(str::to_string),
            paths: content
                .files()
                .iter()
                .map(|file| file.path.to_string_lossy().into_owned())
                .collect(),
            mime_type: match content {
                ShareContent::Text { .. } => "text/plain".to_string(),
                ShareContent::Files { ref files, .. } => reduce_mime_types(files),
            },
        };
        // The native call only returns when the share activity does.
        tauri::async_runtime::spawn_blocking(move || {
            let success = match handle.run_mobile_plugin::<NativeShareOutcome>("share", args) {
                Ok(outcome) => outcome.success,
                Err(e) => {
                    log::warn!("native share {} failed: {e}", completion.id());
                    false
                }
            };
            completion.complete(success);
        });
        Ok(())
    }
}
