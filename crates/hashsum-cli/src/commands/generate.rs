use super::{EXIT_FAILURE, EXIT_SUCCESS};
use clap::Args;
use hashsum_core::{run_pipeline, CoreError, FileRecord, ManifestAccumulator, Outcome, RecordSink};
use hashsum_schema::{parse_options_file, resolve, HashsumOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Files or directories to digest. Directories are walked recursively.
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// TOML options file (keys: dest, hash, filename, delimiter, force, json,
    /// jsonPrettyPrint, stream). Flags override values from the file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base directory for path resolution and the manifest location.
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Digest algorithm: md5, sha1, sha224, sha256, sha384, sha512, blake3.
    #[arg(long)]
    pub hash: Option<String>,

    /// Manifest file name [default: <HASH>SUMS].
    #[arg(long)]
    pub filename: Option<String>,

    /// Separator between digest and path in line format.
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Write the manifest even if the existing file is identical.
    #[arg(long, default_value_t = false)]
    pub force: bool,

    /// Write the manifest as a compact JSON object.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Write the manifest as JSON indented with two spaces.
    #[arg(long, default_value_t = false)]
    pub json_pretty_print: bool,

    /// Print the manifest to stdout instead of writing it to disk.
    #[arg(long, default_value_t = false)]
    pub stream: bool,
}

impl GenerateArgs {
    /// Options from `--config` (or defaults) with command-line flags applied on top.
    pub fn options(&self) -> Result<HashsumOptions, String> {
        let mut options = match &self.config {
            Some(path) => parse_options_file(path).map_err(|e| e.to_string())?,
            None => HashsumOptions::default(),
        };
        if let Some(dest) = &self.dest {
            options.dest = Some(dest.clone());
        }
        if let Some(hash) = &self.hash {
            options.hash.clone_from(hash);
        }
        if let Some(filename) = &self.filename {
            options.filename = Some(filename.clone());
        }
        if let Some(delimiter) = &self.delimiter {
            options.delimiter.clone_from(delimiter);
        }
        options.force |= self.force;
        options.json |= self.json;
        options.json_pretty_print |= self.json_pretty_print;
        options.stream |= self.stream;
        Ok(options)
    }
}

/// Keeps only the most recent record, which in emit mode is the manifest.
#[derive(Default)]
struct LastRecordSink {
    last: Option<FileRecord>,
    rejected: usize,
}

impl RecordSink for LastRecordSink {
    fn push(&mut self, record: FileRecord) {
        self.last = Some(record);
    }

    fn error(&mut self, error: &CoreError) {
        self.rejected += 1;
        eprintln!("warning: skipped {error}");
    }

    fn end(&mut self) {}
}

pub fn run(args: &GenerateArgs) -> Result<u8, String> {
    let options = args.options()?;
    let accumulator = ManifestAccumulator::new(&options).map_err(|e| e.to_string())?;
    let records = collect_records(&args.paths, accumulator.manifest_path())?;

    let mut sink = LastRecordSink::default();
    let report = run_pipeline(accumulator, records, &mut sink).map_err(|e| e.to_string())?;

    match report.outcome {
        Outcome::Emitted => {
            let manifest = sink
                .last
                .as_ref()
                .and_then(FileRecord::bytes)
                .unwrap_or_default();
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(manifest)
                .and_then(|()| stdout.flush())
                .map_err(|e| format!("failed to write manifest to stdout: {e}"))?;
        }
        Outcome::Written => println!(
            "wrote {} ({} entries)",
            report.manifest_path.display(),
            report.entries
        ),
        Outcome::Unchanged => println!(
            "unchanged {} ({} entries)",
            report.manifest_path.display(),
            report.entries
        ),
    }

    // Some input never made it into the manifest.
    if sink.rejected > 0 {
        eprintln!("{} file(s) left out of the manifest", sink.rejected);
        return Ok(EXIT_FAILURE);
    }
    Ok(EXIT_SUCCESS)
}

/// Read every file under `paths` into a record, in sorted walk order.
///
/// Directories become placeholder records. The manifest itself is skipped so
/// that an existing manifest never ends up digesting itself.
fn collect_records(paths: &[PathBuf], manifest_path: &Path) -> Result<Vec<FileRecord>, String> {
    // Only relative roots need the working directory.
    let cwd = if paths.iter().all(|p| p.is_absolute()) {
        PathBuf::new()
    } else {
        std::env::current_dir().map_err(|e| format!("failed to read working directory: {e}"))?
    };
    let mut records = Vec::new();

    for root in paths {
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| format!("failed to walk {}: {e}", root.display()))?;
            let path = resolve(&cwd, entry.path());
            if path == manifest_path {
                debug!("skipping manifest {}", path.display());
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_dir() {
                records.push(FileRecord::empty(path));
            } else if file_type.is_file() {
                let data = std::fs::read(entry.path())
                    .map_err(|e| format!("failed to read {}: {e}", entry.path().display()))?;
                records.push(FileRecord::buffer(path, data));
            }
        }
    }

    Ok(records)
}
