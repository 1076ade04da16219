//! Playtime Reporting Library
//!
//! This library lists the per-player statistics directory of an exaroton-hosted
//! Minecraft server, downloads every `<uuid>.json` stats document, joins them
//! against the server's user cache and reports each player's total playtime in
//! game ticks.

pub mod cli;
pub mod io;
pub mod models;
pub mod services;

pub use models::{DirectoryEntry, ErrorItem, PlayerIssue, RemoteFileHandle, ReportLine};
pub use services::aggregate::{AggregateOptions, AggregatedStats, FailurePolicy};
pub use services::identity::{IdentityMapping, MissingFieldPolicy};
pub use services::remote::{BackendKind, RemoteFiles};

use std::result;

/// Custom error type for the library
#[derive(Debug)]
pub enum Error {
    /// Network failure, timeout or non-2xx response.
    Transport {
        path: String,
        status: Option<u16>,
        message: String,
    },
    /// The API envelope reported `success: false`.
    Api { path: String, message: String },
    NotADirectory { path: String },
    NotFound { path: String },
    MalformedDocument {
        path: Option<String>,
        message: String,
    },
    /// An identity record lacks the key field or the `name` field.
    MissingField {
        path: Option<String>,
        index: usize,
        field: String,
    },
    /// A stats document has no matching identity record.
    UnresolvedPlayer { uuid: String },
    /// The playtime counter is absent or not a non-negative integer.
    StatsShape { uuid: String, detail: String },
    Config(String),
    InvalidInput(String),
    Io(std::io::Error),
    System(String),
}

impl Error {
    /// Stable machine-readable code used in JSON output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Error::Transport { .. } => "TRANSPORT",
            Error::Api { .. } => "API",
            Error::NotADirectory { .. } => "NOT_A_DIRECTORY",
            Error::NotFound { .. } => "NOT_FOUND",
            Error::MalformedDocument { .. } => "MALFORMED_DOCUMENT",
            Error::MissingField { .. } => "MISSING_FIELD",
            Error::UnresolvedPlayer { .. } => "UNRESOLVED_PLAYER",
            Error::StatsShape { .. } => "STATS_SHAPE",
            Error::Config(_) => "CONFIG",
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::Io(_) => "IO",
            Error::System(_) => "SYSTEM",
        }
    }

    /// Attach the remote path to a document error raised before the path was known.
    #[must_use]
    pub fn at_path(self, path: &str) -> Self {
        match self {
            Error::MalformedDocument { path: None, message } => Error::MalformedDocument {
                path: Some(path.to_string()),
                message,
            },
            Error::MissingField {
                path: None,
                index,
                field,
            } => Error::MissingField {
                path: Some(path.to_string()),
                index,
                field,
            },
            other => other,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Transport {
                path,
                status: Some(status),
                message,
            } => write!(f, "Transport error for '{path}' (HTTP {status}): {message}"),
            Error::Transport {
                path,
                status: None,
                message,
            } => write!(f, "Transport error for '{path}': {message}"),
            Error::Api { path, message } => write!(f, "API error for '{path}': {message}"),
            Error::NotADirectory { path } => write!(f, "'{path}' is not a directory"),
            Error::NotFound { path } => write!(f, "Remote file not found: '{path}'"),
            Error::MalformedDocument {
                path: Some(path),
                message,
            } => write!(f, "Malformed JSON in '{path}': {message}"),
            Error::MalformedDocument {
                path: None,
                message,
            } => write!(f, "Malformed JSON: {message}"),
            Error::MissingField {
                path: Some(path),
                index,
                field,
            } => write!(f, "Identity record #{index} in '{path}' is missing field '{field}'"),
            Error::MissingField {
                path: None,
                index,
                field,
            } => write!(f, "Identity record #{index} is missing field '{field}'"),
            Error::UnresolvedPlayer { uuid } => {
                write!(f, "Player {uuid} has stats but no user cache entry")
            }
            Error::StatsShape { uuid, detail } => {
                write!(f, "Unexpected stats layout for player {uuid}: {detail}")
            }
            Error::Config(msg) => write!(f, "Config error: {msg}"),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::System(msg) => write!(f, "System error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Well-known location of the player identity cache.
pub const DEFAULT_USERCACHE_PATH: &str = "usercache.json";

/// Options for producing a playtime report
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub usercache_path: String,
    pub key_field: String,
    pub identity_policy: MissingFieldPolicy,
    pub aggregate: AggregateOptions,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            usercache_path: DEFAULT_USERCACHE_PATH.to_string(),
            key_field: services::identity::DEFAULT_KEY_FIELD.to_string(),
            identity_policy: MissingFieldPolicy::Fail,
            aggregate: AggregateOptions::default(),
        }
    }
}

/// Playtime report for a single server
#[derive(Debug)]
pub struct Report {
    pub server_id: String,
    pub lines: Vec<ReportLine>,
    pub issues: Vec<PlayerIssue>,
    pub started_at: std::time::SystemTime,
    pub finished_at: std::time::SystemTime,
}

impl Report {
    /// Collapse the report into the all-or-nothing form: the first per-player
    /// issue becomes the error.
    pub fn into_strict(self) -> Result<Vec<ReportLine>> {
        match self.issues.into_iter().next() {
            Some(issue) => Err(issue.error),
            None => Ok(self.lines),
        }
    }
}

/// Build the playtime report for a server
///
/// # Arguments
/// * `files` - File-access capability for the server's filesystem
/// * `server_id` - Target server identifier
/// * `opts` - Report options
///
/// # Returns
/// A Report with one line per resolvable player and the per-player issues
/// encountered while joining stats against the user cache
pub fn generate_playtime_report(
    files: &dyn RemoteFiles,
    server_id: &str,
    opts: &ReportOptions,
) -> Result<Report> {
    if server_id.trim().is_empty() {
        return Err(Error::InvalidInput("Server ID must not be empty".to_string()));
    }

    let started_at = std::time::SystemTime::now();

    let usercache = RemoteFileHandle::new(server_id, &opts.usercache_path);
    let identities = services::identity::load_mapping(
        files,
        &usercache,
        &opts.key_field,
        opts.identity_policy,
    )?;
    log::debug!("Loaded {} identities from {}", identities.len(), usercache.path);

    let stats = services::aggregate::aggregate_stats(files, server_id, &opts.aggregate)?;
    log::debug!("Aggregated stats for {} players", stats.len());

    let mut report = services::report::generate_report(&identities, &stats);
    let mut issues = stats.into_issues();
    issues.append(&mut report.issues);
    report.issues = issues;

    Ok(Report {
        server_id: server_id.to_string(),
        lines: report.lines,
        issues: report.issues,
        started_at,
        finished_at: std::time::SystemTime::now(),
    })
}
