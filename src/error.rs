use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

// Every variant is raised synchronously to whoever issued the request.
// Completion events never carry an `Error`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("Method not implemented: {0}")]
    NotImplemented(String),
    #[error("No presentation surface is attached; cannot show the share dialog")]
    NoSurfaceAttached,
    #[error("Failed to prepare {path} for sharing: {reason}")]
    FileAccess { path: String, reason: String },
    #[error("Request codes exhausted: no id left after {0}")]
    RequestCodesExhausted(crate::models::RequestId),
    #[error("Failed to interact with native sharing API: {0}")]
    NativeApi(String),
    #[error("Tauri API error: {0}")]
    Tauri(#[from] tauri::Error),
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}
