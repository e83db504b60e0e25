//! Template source storage.
//!
//! The registry reads templates through the [`TemplateStore`] trait, which
//! needs only two capabilities: list the paths matching a glob pattern, and
//! read one file's contents.
//!
//! Two implementations are provided:
//!
//! - [`FsStore`]: the local filesystem, using the `glob` crate. Paths are
//!   returned exactly as `glob` produces them (relative patterns give relative
//!   paths), so the registry's page keys match what callers pass as addresses.
//! - [`MemoryStore`]: an in-memory path → content map, matched with
//!   [`glob::Pattern`]. Used for tests and for templates embedded at build time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The glob pattern is malformed.
    #[error("invalid pattern \"{pattern}\": {message}")]
    Pattern { pattern: String, message: String },

    /// A path could not be listed or read.
    #[error("failed to read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    fn pattern(pattern: &str, err: glob::PatternError) -> Self {
        StoreError::Pattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        }
    }
}

/// Read access to template sources.
pub trait TemplateStore: Send + Sync {
    /// Returns every path matching `pattern`, sorted.
    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, StoreError>;

    /// Reads the contents of one template file.
    fn read(&self, path: &Path) -> Result<String, StoreError>;
}

/// Validates a glob pattern without touching storage.
pub fn validate_pattern(pattern: &str) -> Result<(), StoreError> {
    glob::Pattern::new(pattern)
        .map(|_| ())
        .map_err(|e| StoreError::pattern(pattern, e))
}

/// Filesystem-backed store.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl FsStore {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateStore for FsStore {
    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, StoreError> {
        let entries = glob::glob(pattern).map_err(|e| StoreError::pattern(pattern, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::Io {
                path: e.path().to_path_buf(),
                source: e.into(),
            })?;
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &Path) -> Result<String, StoreError> {
        std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// In-memory store.
///
/// Files can be replaced after the store is handed to a registry, which makes
/// it convenient for exercising reloads without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RwLock<BTreeMap<PathBuf, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from `(path, content)` pairs.
    pub fn from_entries(entries: &[(&str, &str)]) -> Self {
        let store = Self::new();
        for (path, content) in entries {
            store.insert(*path, *content);
        }
        store
    }

    /// Adds or replaces a file.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into(), content.into());
    }

    /// Removes a file, returning its previous content.
    pub fn remove(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.files.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateStore for MemoryStore {
    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, StoreError> {
        let matcher = glob::Pattern::new(pattern).map_err(|e| StoreError::pattern(pattern, e))?;
        let options = glob::MatchOptions {
            require_literal_separator: true,
            ..glob::MatchOptions::new()
        };
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());

        // BTreeMap keys are already sorted.
        Ok(files
            .keys()
            .filter(|path| matcher.matches_path_with(path, options))
            .cloned()
            .collect())
    }

    fn read(&self, path: &Path) -> Result<String, StoreError> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        files.get(path).cloned().ok_or_else(|| StoreError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such template"),
        })
    }
}
