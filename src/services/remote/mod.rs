//! File-access backends for a server's filesystem.
//!
//! The aggregation pipeline only ever needs two capabilities from a server:
//! listing the immediate children of a directory and reading the raw bytes of
//! a file. Both are expressed by [`RemoteFiles`] so the control-plane API can
//! be swapped for a local directory without touching the aggregation code.
//!
//! - Listing MUST return immediate children only (no recursion).
//! - Fetching MUST return the bytes untouched; text decoding happens once in
//!   [`crate::services::fetch`].
//! - Unresolvable paths MUST surface as [`crate::Error::NotFound`].

pub mod api;
pub mod local;

use crate::models::{DirectoryEntry, RemoteFileHandle};
use crate::Result;

/// Enumeration of available file-access backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// exaroton control-plane API over HTTPS.
    #[default]
    Api,
    /// A local directory standing in for the server's filesystem.
    Local,
}

impl BackendKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Api => "api",
            BackendKind::Local => "local",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "api" | "exaroton" | "remote" => Some(BackendKind::Api),
            "local" | "fs" => Some(BackendKind::Local),
            _ => None,
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        BackendKind::from_label(s).ok_or_else(|| format!("unknown backend '{s}'"))
    }
}

/// Capability set a backend offers for one server's filesystem.
pub trait RemoteFiles: Sync {
    /// Identify the backend for logging and diagnostics.
    fn kind(&self) -> BackendKind;

    /// List the immediate children of a directory.
    fn list_children(&self, dir: &RemoteFileHandle) -> Result<Vec<DirectoryEntry>>;

    /// Read the raw content of a single file.
    fn fetch_bytes(&self, file: &RemoteFileHandle) -> Result<Vec<u8>>;
}
