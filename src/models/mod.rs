//! Data models for remote entries, report lines, server metadata and errors

use crate::Error;
use serde::{Deserialize, Serialize};

/// Represents an immediate child of a remote directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_directory: bool,
}

impl DirectoryEntry {
    #[must_use]
    pub fn file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_directory: false,
        }
    }

    #[must_use]
    pub fn directory(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_directory: true,
        }
    }
}

/// Reference to a path on a specific server's filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileHandle {
    pub server_id: String,
    pub path: String,
}

impl RemoteFileHandle {
    #[must_use]
    pub fn new(server_id: &str, path: &str) -> Self {
        Self {
            server_id: server_id.to_string(),
            path: path.to_string(),
        }
    }

    /// Handle for a direct child of this directory.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let base = self.path.trim_end_matches('/');
        let path = if base.is_empty() {
            name.to_string()
        } else {
            format!("{base}/{name}")
        };
        Self {
            server_id: self.server_id.clone(),
            path,
        }
    }
}

/// One player's playtime, in game ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    pub uuid: String,
    pub name: String,
    pub total_playtime_ticks: u64,
}

/// A failure scoped to a single player
#[derive(Debug)]
pub struct PlayerIssue {
    pub uuid: String,
    pub error: Error,
}

/// Serializable form of an issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorItem {
    pub subject: String,
    pub code: String,
    pub message: String,
}

impl From<&PlayerIssue> for ErrorItem {
    fn from(issue: &PlayerIssue) -> Self {
        Self {
            subject: issue.uuid.clone(),
            code: issue.error.code().to_string(),
            message: issue.error.to_string(),
        }
    }
}

/// Account the API credential belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// A server visible to the account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: Option<u8>,
}
