use tauri::{Runtime, Window};

use crate::models::ShareContent;
use crate::Error;

// No system share sheet exists here. Requests are accepted and settle as failed, so the
// frontend still gets its completion event.

pub struct ShareWaitHandle;

impl ShareWaitHandle {
    pub fn wait(self) -> bool {
        false
    }

    pub fn cancel(self) {}
}

pub fn begin_share_wait<R: Runtime>(_window: &Window<R>) -> Result<ShareWaitHandle, Error> {
    Ok(ShareWaitHandle)
}

pub fn show_share_sheet<R: Runtime>(window: &Window<R>, content: &ShareContent) -> Result<(), Error> {
    log::warn!(
        "no system share dialog available for window {} ({} file(s))",
        window.label(),
        content.files().len()
    );
    Ok(())
}
