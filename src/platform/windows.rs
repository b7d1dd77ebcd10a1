use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use tauri::{Runtime, Window};
use windows::ApplicationModel::DataTransfer::{DataPackage, DataRequestedEventArgs, DataTransferManager};
use windows::Storage::IStorageItem;
use windows::{
    core::{Interface, HSTRING},
    Foundation::TypedEventHandler,
    Storage::StorageFile,
    Win32::{
        Foundation::HWND,
        System::WinRT::{RoInitialize, RO_INIT_SINGLETHREADED},
        UI::Shell::IDataTransferManagerInterop,
    },
};
use windows_collections::IIterable;

use crate::models::ShareContent;
use crate::Error;

// The share UI only fires DataRequested after ShowShareUIForWindow returns, so the manager
// and its registration token have to outlive this call. They are only touched on the main
// thread.
thread_local! {
    static SHARE_STATE: RefCell<Option<(DataTransferManager, i64)>> = const { RefCell::new(None) };
}

// The data package must carry a title or the share UI refuses to open.
const DEFAULT_TITLE: &str = "Share";

impl From<windows::core::Error> for Error {
    fn from(err: windows::core::Error) -> Self {
        Error::NativeApi(err.message().to_string())
    }
}

pub fn show_share_sheet<R: Runtime>(window: &Window<R>, content: &ShareContent) -> Result<(), Error> {
    let (tx, rx) = mpsc::channel();
    let win_clone = window.clone();
    let content = Arc::new(content.clone());

    window.run_on_main_thread(move || {
        let result = (|| -> Result<(), Error> {
            initialize_winrt_thread()?;
            let hwnd = get_hwnd(&win_clone)?;
            let (dtm, interop) = get_data_transfer_manager(hwnd)?;

            let data_requested_handler = TypedEventHandler::new({
                let content = content.clone();
                move |_, args: windows::core::Ref<'_, DataRequestedEventArgs>| -> windows::core::Result<()> {
                    if let Some(request_args) = (*args).as_ref() {
                        fill_data_package(request_args, &content)?;
                    }
                    release_share_state();
                    Ok(())
                }
            });

            // A previous sheet that was dismissed before requesting data leaves its handler behind.
            release_share_state();
            let token = dtm.DataRequested(&data_requested_handler)?;
            SHARE_STATE.with(|state| {
                *state.borrow_mut() = Some((dtm, token));
            });

            unsafe { interop.ShowShareUIForWindow(hwnd) }?;
            Ok(())
        })();
        tx.send(result).ok();
    })?;

    rx.recv()
        .map_err(|_| Error::NativeApi("Failed to receive result from main thread".to_string()))?
}

fn fill_data_package(args: &DataRequestedEventArgs, content: &ShareContent) -> windows::core::Result<()> {
    let request = args.Request()?;
    let data = request.Data()?;
    let properties = data.Properties()?;
    properties.SetTitle(&HSTRING::from(content.subject().unwrap_or(DEFAULT_TITLE)))?;

    if let Some(text) = content.text().filter(|text| !text.is_empty()) {
        data.SetText(&HSTRING::from(text))?;
    }

    let paths: Vec<PathBuf> = content.files().iter().map(|file| file.path.clone()).collect();
    if !paths.is_empty() {
        let deferral = request.GetDeferral()?;
        tauri::async_runtime::spawn_blocking(move || {
            attach_storage_items(&data, paths);
            if let Err(e) = deferral.Complete() {
                log::warn!("failed to complete share deferral: {e}");
            }
        });
    }
    Ok(())
}

fn attach_storage_items(data: &DataPackage, paths: Vec<PathBuf>) {
    let mut storage_items: Vec<Option<IStorageItem>> = Vec::new();
    for path in paths {
        let item = StorageFile::GetFileFromPathAsync(&HSTRING::from(path.as_os_str()))
            .and_then(|op| op.get())
            .and_then(|file| file.cast::<IStorageItem>());
        match item {
            Ok(item) => storage_items.push(Some(item)),
            Err(e) => log::warn!("failed to open {} for sharing: {e}", path.display()),
        }
    }
    if storage_items.is_empty() {
        return;
    }

    let iterable: Result<IIterable<IStorageItem>, _> = storage_items.try_into();
    match iterable {
        Ok(items) => {
            if let Err(e) = data.SetStorageItemsReadOnly(&items) {
                log::warn!("failed to set storage items on data package: {e}");
            }
        }
        Err(e) => log::warn!("failed to collect storage items: {e:?}"),
    }
}

fn release_share_state() {
    SHARE_STATE.with(|state| {
        if let Some((manager, token)) = state.borrow_mut().take() {
            let _ = manager.RemoveDataRequested(token);
        }
    });
}

/// Initializes the Windows Runtime on the current thread.
fn initialize_winrt_thread() -> Result<(), Error> {
    // RoInitialize returns S_FALSE when the thread is already initialized.
    unsafe { RoInitialize(RO_INIT_SINGLETHREADED) }
        .map_err(|e| Error::NativeApi(format!("Failed to initialize WinRT: {}", e)))
}

/// Retrieves the native window handle (HWND) from the Tauri window.
fn get_hwnd<R: Runtime>(window: &Window<R>) -> Result<HWND, Error> {
    let handle = window
        .window_handle()
        .map_err(|e| Error::NativeApi(e.to_string()))?;

    match handle.as_raw() {
        RawWindowHandle::Win32(handle) => Ok(HWND(handle.hwnd.get() as *mut std::ffi::c_void)),
        _ => Err(Error::NativeApi("Unsupported window handle type".to_string())),
    }
}

/// Desktop (non-UWP) apps must get the DataTransferManager through the interop factory.
fn get_data_transfer_manager(
    hwnd: HWND,
) -> Result<(DataTransferManager, IDataTransferManagerInterop), Error> {
    let interop = windows::core::factory::<DataTransferManager, IDataTransferManagerInterop>()?;
    let dtm = unsafe { interop.GetForWindow(hwnd) }?;
    Ok((dtm, interop))
}
