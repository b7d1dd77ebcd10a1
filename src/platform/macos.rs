use crate::models::ShareContent;
use crate::Error;
use objc2::{
    rc::{autoreleasepool, Retained},
    runtime::AnyObject,
    AnyThread,
};
use objc2_app_kit::{NSSharingServicePicker, NSView};
use objc2_core_foundation::{CGPoint, CGRect, CGSize};
use objc2_foundation::{NSArray, NSString, NSURL};
use raw_window_handle::{HasWindowHandle, RawWindowHandle, WindowHandle};
use std::sync::mpsc;
use tauri::{Runtime, Window};

/// Opens an `NSSharingServicePicker` anchored to the middle of the window.
///
/// The picker has no subject field, so only the text and file URLs are handed over.
pub fn show_share_sheet<R: Runtime>(window: &Window<R>, content: &ShareContent) -> Result<(), Error> {
    let (tx, rx) = mpsc::channel();
    let window_clone = window.clone();
    let content = content.clone();

    window.run_on_main_thread(move || {
        let result = (|| -> Result<(), Error> {
            let ns_view = get_ns_view(&window_clone)?;
            let mut items: Vec<Retained<AnyObject>> = Vec::new();

            if let Some(text) = content.text().filter(|text| !text.is_empty()) {
                let text = NSString::from_str(text);
                items.push(Retained::into_super(Retained::into_super(text)));
            }
            for file in content.files() {
                let path = NSString::from_str(&file.path.to_string_lossy());
                let url = unsafe { NSURL::fileURLWithPath(&path) };
                items.push(Retained::into_super(Retained::into_super(url)));
            }

            if items.is_empty() {
                return Err(Error::InvalidArgs("No content provided to share.".to_string()));
            }

            autoreleasepool(|_pool| {
                let items_array = NSArray::from_retained_slice(&items);
                let picker = unsafe {
                    NSSharingServicePicker::initWithItems(NSSharingServicePicker::alloc(), &items_array)
                };

                let bounds = ns_view.bounds();
                unsafe {
                    picker.showRelativeToRect_ofView_preferredEdge(
                        CGRect {
                            origin: CGPoint {
                                x: bounds.size.width / 2.0,
                                y: bounds.size.height / 2.0,
                            },
                            size: CGSize {
                                width: 0.0,
                                height: 0.0,
                            },
                        },
                        &ns_view,
                        objc2_foundation::NSRectEdge::NSMinYEdge,
                    );
                }
            });
            Ok(())
        })();
        let _ = tx.send(result);
    })?;

    rx.recv()
        .map_err(|_| Error::NativeApi("Failed to receive result from main thread".to_string()))?
}

/// Retrieves the native `NSView` pointer from the Tauri window, compatible with `raw-window-handle`.
fn get_ns_view<R: Runtime>(window: &Window<R>) -> Result<Retained<NSView>, Error> {
    let window_handle: WindowHandle<'_> = window
        .window_handle()
        .map_err(|e| Error::NativeApi(e.to_string()))?;
    if let RawWindowHandle::AppKit(handle) = window_handle.as_raw() {
        let ns_view_ptr = handle.ns_view.as_ptr();
        unsafe { Retained::retain(ns_view_ptr.cast()) }
            .ok_or_else(|| Error::NativeApi("Window has no NSView.".to_string()))
    } else {
        Err(Error::NativeApi(
            "Unsupported window handle type on macOS.".to_string(),
        ))
    }
}
