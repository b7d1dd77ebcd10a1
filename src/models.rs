use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::files::SharedFile;
use crate::{Error, Result};

/// Correlates an issued share with the completion event that later reports its outcome.
///
/// Crosses the wire as a decimal string (`"5002"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u32);

impl RequestId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// `None` once the id space is used up; ids never wrap back onto pending ones.
    pub(crate) fn successor(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RequestId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// The outbound event a pending request fires once it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionEvent {
    Share,
    ShareFiles,
}

impl CompletionEvent {
    pub const fn name(self) -> &'static str {
        match self {
            CompletionEvent::Share => "shareCallback",
            CompletionEvent::ShareFiles => "shareFilesCallback",
        }
    }
}

impl fmt::Display for CompletionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload of `shareCallback` and `shareFilesCallback`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResult {
    pub request_code: String,
    pub result: bool,
}

impl ShareResult {
    pub fn new(id: RequestId, success: bool) -> Self {
        Self {
            request_code: id.to_string(),
            result: success,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareArgs {
    pub text: String,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareFilesArgs {
    pub paths: Vec<String>,
    pub mime_types: Option<Vec<String>>,
    pub text: Option<String>,
    pub subject: Option<String>,
}

/// A share request as it arrives from the frontend.
#[derive(Debug, Clone)]
pub enum InboundRequest {
    Share(ShareArgs),
    ShareFiles(ShareFilesArgs),
}

impl InboundRequest {
    /// Routes a named-method call (`share`, `shareFiles`) with map arguments.
    pub fn from_method(method: &str, arguments: serde_json::Value) -> Result<Self> {
        if !arguments.is_object() {
            return Err(Error::InvalidArgs("Map argument expected".to_string()));
        }
        match method {
            "share" => serde_json::from_value(arguments)
                .map(InboundRequest::Share)
                .map_err(|e| Error::InvalidArgs(e.to_string())),
            "shareFiles" => serde_json::from_value(arguments)
                .map(InboundRequest::ShareFiles)
                .map_err(|e| Error::InvalidArgs(e.to_string())),
            other => Err(Error::NotImplemented(other.to_string())),
        }
    }
}

/// What a presentation surface is asked to put in front of the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareContent {
    Text {
        text: String,
        subject: Option<String>,
    },
    Files {
        files: Vec<SharedFile>,
        text: Option<String>,
        subject: Option<String>,
    },
}

impl ShareContent {
    pub fn text(&self) -> Option<&str> {
        match self {
            ShareContent::Text { text, .. } => Some(text),
            ShareContent::Files { text, .. } => text.as_deref(),
        }
    }

    pub fn subject(&self) -> Option<&str> {
        match self {
            ShareContent::Text { subject, .. } | ShareContent::Files { subject, .. } => {
                subject.as_deref()
            }
        }
    }

    pub fn files(&self) -> &[SharedFile] {
        match self {
            ShareContent::Text { .. } => &[],
            ShareContent::Files { files, .. } => files,
        }
    }
}
