//! Local directory backend using standard library primitives.
//! The directory stands in for a server's filesystem root, which makes it
//! usable both offline (against a copied world folder) and as a test double.

use super::{BackendKind, RemoteFiles};
use crate::models::{DirectoryEntry, RemoteFileHandle};
use crate::{Error, Result};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Serves a server's files from a local directory
#[derive(Debug, Clone)]
pub struct LocalFiles {
    root: PathBuf,
}

impl LocalFiles {
    /// Use `root` as the server's filesystem root.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::InvalidInput(format!(
                "Local root is not a directory: {}",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a slash-delimited logical path below the root. Paths that try to
    /// leave the root are rejected.
    fn resolve(&self, logical: &str) -> Result<PathBuf> {
        let mut resolved = self.root.clone();
        for component in Path::new(logical).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir | Component::RootDir => {}
                Component::ParentDir | Component::Prefix(_) => {
                    return Err(Error::InvalidInput(format!(
                        "Path escapes the server root: {logical}"
                    )));
                }
            }
        }
        Ok(resolved)
    }
}

fn map_io(path: &str, err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::NotFound {
        Error::NotFound {
            path: path.to_string(),
        }
    } else {
        Error::Io(err)
    }
}

impl RemoteFiles for LocalFiles {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn list_children(&self, dir: &RemoteFileHandle) -> Result<Vec<DirectoryEntry>> {
        let full = self.resolve(&dir.path)?;
        let metadata = fs::metadata(&full).map_err(|e| map_io(&dir.path, e))?;
        if !metadata.is_dir() {
            return Err(Error::NotADirectory {
                path: dir.path.clone(),
            });
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&full)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            entries.push(DirectoryEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                is_directory: file_type.is_dir(),
            });
        }

        // read_dir order is platform dependent
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        log::trace!("Listed {} children of {}", entries.len(), full.display());
        Ok(entries)
    }

    fn fetch_bytes(&self, file: &RemoteFileHandle) -> Result<Vec<u8>> {
        let full = self.resolve(&file.path)?;
        if full.is_dir() {
            return Err(Error::InvalidInput(format!(
                "Path is a directory, not a file: {}",
                file.path
            )));
        }
        fs::read(&full).map_err(|e| map_io(&file.path, e))
    }
}
