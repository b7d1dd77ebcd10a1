//! # tauri-plugin-share-plus
//!
//! A Tauri plugin that opens the native share dialog and reports each share's outcome back
//! to the frontend as an event.
//!
//! Every share call returns a request code right away. Once the user completes or dismisses
//! the dialog, exactly one event carrying that code is emitted: `shareCallback` for text and
//! `shareFilesCallback` for files. The dialog is shown on whichever window is currently
//! attached (the most recently focused one); a window can close or be replaced while a
//! share is open without losing its result.
//!
//! Windows and macOS open the system share sheet. Linux has none, and the crate bundles
//! no Android or iOS code, so on those targets every share is issued and then settles
//! with `result: false`.
//!
//! ## Installation
//!
//! ```sh
//! # Cargo.toml
//! [dependencies]
//! tauri-plugin-share-plus = { git = "https://github.com/vnidrop/plugin-share" }
//! ```
//!
//! ## Usage
//!
//! ### Rust
//!
//! ```rust,ignore
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(tauri_plugin_share_plus::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! ### Frontend (JavaScript/TypeScript)
//!
//! ```js
//! import { invoke } from '@tauri-apps/api/core';
//! import { listen } from '@tauri-apps/api/event';
//!
//! await listen('shareCallback', ({ payload }) => {
//!   console.log(`share ${payload.requestCode} finished: ${payload.result}`);
//! });
//!
//! const requestCode = await invoke('plugin:share-plus|share', {
//!   text: 'I found this cool project built with Tauri.',
//!   subject: 'Check this out!',
//! });
//!
//! await invoke('plugin:share-plus|share_files', {
//!   paths: ['/path/to/report.pdf'],
//!   mimeTypes: ['application/pdf'],
//! });
//! ```
//!
//! ### Configuration
//!
//! ```json
//! { "plugins": { "share-plus": { "requestCodeBase": 5001 } } }
//! ```

use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime, WindowEvent,
};

pub use models::*;

#[cfg(desktop)]
mod desktop;
#[cfg(mobile)]
mod mobile;

mod commands;
mod config;
mod dispatcher;
mod error;
mod files;
mod initiator;
mod models;
mod notifier;
#[cfg(desktop)]
mod platform;
mod registry;
mod sync;
#[cfg(test)]
mod test_support;

pub use config::Config;
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use files::{reduce_mime_types, SharedFile};
pub use initiator::{
    CompletionHandle, CompletionListener, PreparedShare, PresentationSurface, ShareInitiator,
};
pub use notifier::{EventSink, ResultNotifier};
pub use registry::RequestRegistry;

#[cfg(desktop)]
pub use desktop::Share;
#[cfg(mobile)]
pub use mobile::Share;

/// Extensions to [`tauri::App`], [`tauri::AppHandle`] and [`tauri::Window`] to access the share APIs.
pub trait ShareExt<R: Runtime> {
    fn share(&self) -> &Share<R>;
}

impl<R: Runtime, T: Manager<R>> crate::ShareExt<R> for T {
    fn share(&self) -> &Share<R> {
        self.state::<Share<R>>().inner()
    }
}

/// Initializes the plugin.
///
/// Registers the commands, attaches windows as share surfaces as they become ready or
/// focused, and stops emitting completion events once the plugin is dropped.
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<Config>> {
    Builder::<R, Option<Config>>::new("share-plus")
        .invoke_handler(tauri::generate_handler![
            commands::share,
            commands::share_files,
        ])
        .setup(|app, api| {
            #[cfg(mobile)]
            let share = mobile::init(app, api)?;
            #[cfg(desktop)]
            let share = desktop::init(app, api)?;
            app.manage(share);
            Ok(())
        })
        .on_window_ready(|window| {
            window.share().attach_window(window.clone());

            let app = window.app_handle().clone();
            let focused = window.clone();
            window.on_window_event(move |event| match event {
                WindowEvent::Focused(true) => app.share().attach_window(focused.clone()),
                WindowEvent::Destroyed => app.share().detach_window(focused.label()),
                _ => {}
            });
        })
        .on_drop(|app| {
            app.share().detach_events();
        })
        .build()
}
