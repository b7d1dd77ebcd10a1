#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
pub use self::windows::*;

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
mod linux;
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub use self::linux::*;

#[cfg(any(target_os = "windows", target_os = "macos"))]
mod focus;
#[cfg(any(target_os = "windows", target_os = "macos"))]
pub use self::focus::{begin_focus_wait as begin_share_wait, FocusWaitHandle as ShareWaitHandle};

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
pub use self::macos::*;
