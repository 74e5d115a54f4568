//! One JSON file per [`Document`], named after its key.
//!
//! ```text
//! data/
//!   101.json
//!   102.json
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::record::Key;

/// Errors from reading or writing a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The file system refused.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// A file held something other than a document.
    #[error("malformed document in {}: {source}", .path.display())]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A directory of document files.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Opens the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        Ok(Store { dir })
    }

    /// The directory this store lives in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the document with `key` is kept.
    pub fn path_for(&self, key: Key) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Reads every document in the store, ordered by file name.
    ///
    /// Files that can't be read or parsed are skipped with a warning. A
    /// directory that has disappeared reads as empty.
    pub fn load_all(&self) -> Vec<Document> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                log::warn!("{}", StoreError::io(&self.dir, e));
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    log::warn!("{}", StoreError::io(&self.dir, e));
                    None
                }
            })
            .filter(|path| is_json(path))
            .collect();
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        paths
            .iter()
            .filter_map(|path| match read(path) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    log::warn!("skipping {e}");
                    None
                }
            })
            .collect()
    }

    /// Writes `doc` to its file, replacing whatever was there.
    pub fn save(&self, doc: &Document) -> Result<PathBuf, StoreError> {
        let path = self.path_for(doc.doc_id);
        let json = serde_json::to_string_pretty(doc).map_err(|e| StoreError::json(&path, e))?;
        fs::write(&path, json).map_err(|e| StoreError::io(&path, e))?;
        log::trace!("wrote {}", path.display());
        Ok(path)
    }

    /// Deletes the file for `key`. Returns `false` if there wasn't one.
    pub fn remove(&self, key: Key) -> Result<bool, StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or(false, |name| name.to_ascii_lowercase().ends_with(".json"))
}

fn read(path: &Path) -> Result<Document, StoreError> {
    let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| StoreError::json(path, e))
}
