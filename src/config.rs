use serde::Deserialize;

const DEFAULT_REQUEST_CODE_BASE: u32 = 5001;

/// Plugin configuration, read from `plugins.share-plus` in `tauri.conf.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Request ids start right after this value. Keep it clear of request codes the host
    /// application uses for its own activity results. Ids are never reused, so at most
    /// `u32::MAX - request_code_base` shares can be issued per run.
    pub request_code_base: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_code_base: DEFAULT_REQUEST_CODE_BASE,
        }
    }
}
