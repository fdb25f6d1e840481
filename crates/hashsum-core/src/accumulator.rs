use crate::record::{Contents, FileRecord};
use crate::CoreError;
use hashsum_schema::{normalize, resolve, HashAlgorithm, HashsumOptions, Manifest, ManifestFormat};
use hashsum_store::{ManifestFile, WriteOutcome};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What finalization did with the serialized manifest.
#[derive(Debug)]
pub enum Disposition {
    /// Written to disk at this path.
    Written(PathBuf),
    /// The file at this path already held identical bytes; nothing was written.
    Unchanged(PathBuf),
    /// Returned as a record instead of touching the disk.
    Emitted(FileRecord),
}

/// Data-free summary of a [`Disposition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Written,
    Unchanged,
    Emitted,
}

impl Disposition {
    pub fn outcome(&self) -> Outcome {
        match self {
            Disposition::Written(_) => Outcome::Written,
            Disposition::Unchanged(_) => Outcome::Unchanged,
            Disposition::Emitted(_) => Outcome::Emitted,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Disposition::Written(path) | Disposition::Unchanged(path) => path,
            Disposition::Emitted(record) => &record.path,
        }
    }
}

/// Builds the manifest for a single run.
///
/// Created from options, fed records through [`ingest`](Self::ingest), and
/// consumed by [`finalize`](Self::finalize). Duplicate keys keep the digest of
/// the last record ingested.
#[derive(Debug)]
pub struct ManifestAccumulator {
    algorithm: HashAlgorithm,
    dest: PathBuf,
    file_name: String,
    manifest_path: PathBuf,
    format: ManifestFormat,
    force: bool,
    emit: bool,
    manifest: Manifest,
}

impl ManifestAccumulator {
    /// Validate `options` and prepare an empty manifest.
    ///
    /// A relative `dest` (or none) is resolved against the working directory,
    /// which is not consulted at all for an absolute `dest`. An unknown hash
    /// identifier fails here, before any record is accepted.
    pub fn new(options: &HashsumOptions) -> Result<Self, CoreError> {
        options.validate()?;
        let algorithm = options.algorithm()?;

        let dest = match &options.dest {
            Some(dest) if dest.is_absolute() => resolve(dest, Path::new("")),
            Some(dest) => resolve(&std::env::current_dir()?, dest),
            None => std::env::current_dir()?,
        };
        let file_name = options.file_name();
        let manifest_path = resolve(&dest, Path::new(&file_name));
        debug!(
            "manifest {} ({algorithm}, dest {})",
            manifest_path.display(),
            dest.display()
        );

        Ok(Self {
            algorithm,
            dest,
            file_name,
            manifest_path,
            format: options.format(),
            force: options.force,
            emit: options.stream,
            manifest: Manifest::new(),
        })
    }

    #[inline]
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    #[inline]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    #[inline]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Digest one record and hand it back unchanged for downstream consumers.
    ///
    /// Placeholders pass through without an entry. Streaming records, and
    /// records whose key would not be valid UTF-8, are rejected and dropped.
    pub fn ingest(&mut self, record: FileRecord) -> Result<FileRecord, CoreError> {
        match &record.contents {
            Contents::Empty => {
                debug!("skipping placeholder {}", record.path.display());
                Ok(record)
            }
            Contents::Stream(_) => {
                warn!("rejecting streaming record {}", record.path.display());
                Err(CoreError::UnsupportedInputKind { path: record.path })
            }
            Contents::Buffer(data) => {
                let key = match normalize(&self.dest, &self.file_name, &record.path) {
                    Ok(key) => key,
                    Err(e) => {
                        warn!("rejecting record: {e}");
                        return Err(e.into());
                    }
                };
                let digest = self.algorithm.digest_hex(data);
                debug!("{digest}  {key}");
                if let Some(previous) = self.manifest.insert(key.clone(), digest) {
                    debug!("duplicate key {key}, replacing digest {previous}");
                }
                Ok(record)
            }
        }
    }

    /// Serialize the manifest in its configured format.
    pub fn render(&self) -> Result<Vec<u8>, CoreError> {
        Ok(self.manifest.render(&self.format)?)
    }

    /// Serialize the manifest and apply the write-or-emit policy.
    ///
    /// In emit mode the manifest comes back as a record at the manifest path.
    /// Otherwise the file is replaced only when forced, missing, or different
    /// byte-for-byte.
    pub fn finalize(self) -> Result<Disposition, CoreError> {
        let contents = self.render()?;

        if self.emit {
            debug!(
                "emitting manifest {} ({} entries)",
                self.manifest_path.display(),
                self.manifest.len()
            );
            return Ok(Disposition::Emitted(FileRecord::buffer(
                self.manifest_path,
                contents,
            )));
        }

        let file = ManifestFile::new(&self.manifest_path);
        match file.write_if_changed(&contents, self.force)? {
            WriteOutcome::Written => Ok(Disposition::Written(self.manifest_path)),
            WriteOutcome::Unchanged => Ok(Disposition::Unchanged(self.manifest_path)),
        }
    }
}
