//! Aggregation of per-player stats documents from the stats directory

use crate::models::{DirectoryEntry, PlayerIssue, RemoteFileHandle};
use crate::services::document;
use crate::services::remote::RemoteFiles;
use crate::{Error, Result};
use rayon::prelude::*;
use serde_json::Value;
use std::collections::HashMap;

pub const DEFAULT_STATS_DIR: &str = "world/stats";
pub const STATS_SUFFIX: &str = ".json";

/// How a failure on one stats file affects the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The first failing file aborts the aggregation.
    #[default]
    FailFast,
    /// Failing files are recorded as issues and skipped.
    BestEffort,
}

/// Options for aggregating a stats directory
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    pub stats_dir: String,
    /// Number of concurrent fetches; 1 keeps the run sequential.
    pub jobs: usize,
    pub policy: FailurePolicy,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            stats_dir: DEFAULT_STATS_DIR.to_string(),
            jobs: 1,
            policy: FailurePolicy::FailFast,
        }
    }
}

/// A stats file selected for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsFile {
    pub key: String,
    pub file_name: String,
}

/// Player key → stats document, in directory-listing order
#[derive(Debug, Default)]
pub struct AggregatedStats {
    order: Vec<String>,
    documents: HashMap<String, Value>,
    issues: Vec<PlayerIssue>,
}

impl AggregatedStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document. Re-inserting a key replaces the document but keeps
    /// its original position.
    pub fn insert(&mut self, key: &str, document: Value) {
        if self.documents.insert(key.to_string(), document).is_none() {
            self.order.push(key.to_string());
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.documents.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.order
            .iter()
            .filter_map(|key| self.documents.get(key).map(|doc| (key.as_str(), doc)))
    }

    /// Files skipped under [`FailurePolicy::BestEffort`].
    #[must_use]
    pub fn issues(&self) -> &[PlayerIssue] {
        &self.issues
    }

    #[must_use]
    pub fn into_issues(self) -> Vec<PlayerIssue> {
        self.issues
    }

    fn absorb(&mut self, file: &StatsFile, loaded: Result<Value>, policy: FailurePolicy) -> Result<()> {
        match loaded {
            Ok(document) => {
                self.insert(&file.key, document);
                Ok(())
            }
            Err(error) => match policy {
                FailurePolicy::FailFast => Err(error),
                FailurePolicy::BestEffort => {
                    log::warn!("Skipping {}: {error}", file.file_name);
                    self.issues.push(PlayerIssue {
                        uuid: file.key.clone(),
                        error,
                    });
                    Ok(())
                }
            },
        }
    }
}

/// Player key for a stats file name: the name minus its trailing `.json`.
#[must_use]
pub fn stats_key(file_name: &str) -> Option<&str> {
    file_name.strip_suffix(STATS_SUFFIX)
}

/// Pick the stats files out of a directory listing
#[must_use]
pub fn select_stats_files(entries: &[DirectoryEntry]) -> Vec<StatsFile> {
    entries
        .iter()
        .filter(|e| !e.is_directory)
        .filter_map(|e| {
            stats_key(&e.name).map(|key| StatsFile {
                key: key.to_string(),
                file_name: e.name.clone(),
            })
        })
        .collect()
}

/// List the stats directory and load every stats document in it
pub fn aggregate_stats(
    files: &dyn RemoteFiles,
    server_id: &str,
    opts: &AggregateOptions,
) -> Result<AggregatedStats> {
    let dir = RemoteFileHandle::new(server_id, &opts.stats_dir);
    let children = files.list_children(&dir)?;
    let selected = select_stats_files(&children);

    log::debug!(
        "{} of {} entries in {} are stats files ({} backend)",
        selected.len(),
        children.len(),
        dir.path,
        files.kind()
    );

    let mut stats = AggregatedStats::new();
    let jobs = opts.jobs.max(1);

    if jobs == 1 || selected.len() < 2 {
        for file in &selected {
            let loaded = document::load(files, &dir.child(&file.file_name));
            stats.absorb(file, loaded, opts.policy)?;
        }
        return Ok(stats);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| Error::System(format!("Failed to start fetch pool: {e}")))?;

    // Indexed collect keeps listing order regardless of completion order
    let loaded: Vec<Result<Value>> = pool.install(|| {
        selected
            .par_iter()
            .map(|file| document::load(files, &dir.child(&file.file_name)))
            .collect()
    });

    for (file, result) in selected.iter().zip(loaded) {
        stats.absorb(file, result, opts.policy)?;
    }

    Ok(stats)
}
