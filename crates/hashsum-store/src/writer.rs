use crate::{fsync_dir, StoreError};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// What [`ManifestFile::write_if_changed`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Existing content was byte-identical; the file was not touched.
    Unchanged,
}

/// A manifest file at a fixed path on disk.
///
/// Writes replace the whole file atomically via `NamedTempFile` in the same
/// directory, so readers never observe a partially written manifest.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    path: PathBuf,
}

impl ManifestFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current content, or `None` when no file exists yet.
    pub fn read(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Whether `contents` must be written: forced, missing, or different bytes.
    pub fn needs_write(&self, contents: &[u8], force: bool) -> Result<bool, StoreError> {
        if force {
            return Ok(true);
        }
        Ok(match self.read()? {
            Some(existing) => existing != contents,
            None => true,
        })
    }

    /// Atomically replace the file with `contents`, creating parent directories.
    pub fn write(&self, contents: &[u8]) -> Result<(), StoreError> {
        if self.path.file_name().is_none() {
            return Err(StoreError::InvalidPath(self.path.display().to_string()));
        }
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(contents)?;
        if let Some(perms) = self.target_permissions() {
            tmp.as_file().set_permissions(perms)?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        fsync_dir(&dir)?;

        Ok(())
    }

    /// Write `contents` unless the file already holds exactly these bytes.
    pub fn write_if_changed(
        &self,
        contents: &[u8],
        force: bool,
    ) -> Result<WriteOutcome, StoreError> {
        if !self.needs_write(contents, force)? {
            debug!("manifest unchanged: {}", self.path.display());
            return Ok(WriteOutcome::Unchanged);
        }
        self.write(contents)?;
        info!(
            "wrote manifest {} ({} bytes)",
            self.path.display(),
            contents.len()
        );
        Ok(WriteOutcome::Written)
    }

    /// Permissions for the replacement file: those of the file being replaced,
    /// or world-readable for a new one. Temp files start out owner-only.
    fn target_permissions(&self) -> Option<fs::Permissions> {
        match fs::metadata(&self.path) {
            Ok(meta) => Some(meta.permissions()),
            Err(_) => default_permissions(),
        }
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
