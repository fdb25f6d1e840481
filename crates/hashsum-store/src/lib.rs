//! On-disk persistence for hashsum manifests.
//!
//! `ManifestFile` reads the manifest currently on disk, decides by exact byte
//! comparison whether new content needs writing, and replaces the file
//! atomically (temp file, `persist`, directory fsync) when it does.

pub mod writer;

pub use writer::{ManifestFile, WriteOutcome};

use std::path::Path;
use thiserror::Error;

/// Fsync a directory so that a preceding `rename()` is durable.
///
/// POSIX does not guarantee a rename survives a crash until the parent
/// directory itself has been synced.
pub(crate) fn fsync_dir(dir: &Path) -> Result<(), std::io::Error> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("manifest path has no file name: {0}")]
    InvalidPath(String),
}
