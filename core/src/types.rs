//! Caller-facing option types for the pinning API.

use std::path::PathBuf;

use serde::Deserialize;

/// One file of a directory-as-DAG upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEntry {
    /// Inline content sent as two text parts under the given relative path.
    PathAndContent { path: String, content: String },
    /// A local file streamed as-is.
    LocalFilePath(PathBuf),
}

impl FileEntry {
    pub fn inline(path: impl Into<String>, content: impl Into<String>) -> Self {
        FileEntry::PathAndContent {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        FileEntry::LocalFilePath(path.into())
    }
}

/// Optional settings for a generated API token.
///
/// Deserializes from the same camelCase keys `PinClient::build_generate_token`
/// writes, so options can be loaded from JSON config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenOptions {
    pub permissions: Option<Vec<String>>,
    pub expires_in_days: Option<u32>,
    pub ip_allowlist: Option<Vec<String>>,
}

/// Page selection for listing uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}
