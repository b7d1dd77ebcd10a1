use tauri::{command, AppHandle, Runtime};

use crate::{error, models, ShareExt};

/// Returns the request code immediately; the outcome follows as a `shareCallback` event.
#[command]
pub async fn share<R: Runtime>(
    app: AppHandle<R>,
    text: String,
    subject: Option<String>,
) -> Result<String, error::Error> {
    app.share().share(models::ShareArgs { text, subject })
}

/// Returns the request code immediately; the outcome follows as a `shareFilesCallback` event.
#[command]
pub async fn share_files<R: Runtime>(
    app: AppHandle<R>,
    paths: Vec<String>,
    mime_types: Option<Vec<String>>,
    text: Option<String>,
    subject: Option<String>,
) -> Result<String, error::Error> {
    app.share().share_files(models::ShareFilesArgs {
        paths,
        mime_types,
        text,
        subject,
    })
}
