use crate::accumulator::{Disposition, ManifestAccumulator, Outcome};
use crate::record::FileRecord;
use crate::CoreError;
use std::path::PathBuf;
use tracing::info;

/// Downstream consumer of a pipeline run.
pub trait RecordSink {
    /// Receive a record that passed through, or the emitted manifest.
    fn push(&mut self, record: FileRecord);

    /// A record was rejected; the run continues.
    fn error(&mut self, error: &CoreError);

    /// No more records will follow. Only called after a successful finalize.
    fn end(&mut self);
}

/// Sink that keeps everything it is given.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub records: Vec<FileRecord>,
    pub errors: Vec<String>,
    pub ended: bool,
}

impl RecordSink for CollectingSink {
    fn push(&mut self, record: FileRecord) {
        self.records.push(record);
    }

    fn error(&mut self, error: &CoreError) {
        self.errors.push(error.to_string());
    }

    fn end(&mut self) {
        self.ended = true;
    }
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub manifest_path: PathBuf,
    pub entries: usize,
    pub forwarded: usize,
    pub rejected: usize,
    pub outcome: Outcome,
}

/// Drive `accumulator` over `records`, forwarding each accepted record to `sink`.
///
/// Streaming records and records whose path cannot form a manifest key are
/// reported through [`RecordSink::error`] and dropped;
/// any other error aborts the run without calling [`RecordSink::end`]. In emit
/// mode the manifest record is pushed after all input records.
pub fn run_pipeline<I, S>(
    mut accumulator: ManifestAccumulator,
    records: I,
    sink: &mut S,
) -> Result<RunReport, CoreError>
where
    I: IntoIterator<Item = FileRecord>,
    S: RecordSink + ?Sized,
{
    let mut forwarded = 0;
    let mut rejected = 0;

    for record in records {
        match accumulator.ingest(record) {
            Ok(record) => {
                forwarded += 1;
                sink.push(record);
            }
            Err(e @ (CoreError::UnsupportedInputKind { .. } | CoreError::Normalize(_))) => {
                rejected += 1;
                sink.error(&e);
            }
            Err(e) => return Err(e),
        }
    }

    let entries = accumulator.manifest().len();
    let disposition = accumulator.finalize()?;
    let outcome = disposition.outcome();
    let manifest_path = disposition.path().to_path_buf();
    if let Disposition::Emitted(record) = disposition {
        sink.push(record);
    }
    sink.end();

    info!(
        "manifest {}: {entries} entries, {forwarded} forwarded, {rejected} rejected, {outcome:?}",
        manifest_path.display()
    );

    Ok(RunReport {
        manifest_path,
        entries,
        forwarded,
        rejected,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashsum_schema::HashsumOptions;

    fn accumulator_in(dir: &tempfile::TempDir) -> ManifestAccumulator {
        ManifestAccumulator::new(&HashsumOptions::default().with_dest(dir.path())).unwrap()
    }

    #[test]
    fn empty_input_still_completes() {
        let dir = tempfile::tempdir().unwrap();
        let acc = accumulator_in(&dir);
        let mut sink = CollectingSink::default();

        let report = run_pipeline(acc, Vec::<FileRecord>::new(), &mut sink).unwrap();

        assert!(sink.ended);
        assert!(sink.records.is_empty());
        assert_eq!(report.entries, 0);
        assert_eq!(report.outcome, Outcome::Written);
        assert_eq!(std::fs::read(dir.path().join("SHA1SUMS")).unwrap(), b"");
    }

    #[test]
    fn rejected_stream_is_reported_and_run_continues() {
        let dir = tempfile::tempdir().unwrap();
        let acc = accumulator_in(&dir);
        let mut sink = CollectingSink::default();
        let records = vec![
            FileRecord::stream(dir.path().join("s.bin"), std::io::empty()),
            FileRecord::buffer(dir.path().join("a.txt"), "abc"),
        ];

        let report = run_pipeline(acc, records, &mut sink).unwrap();

        assert_eq!(report.rejected, 1);
        assert_eq!(report.forwarded, 1);
        assert_eq!(report.entries, 1);
        assert_eq!(sink.errors.len(), 1);
        assert!(sink.errors[0].contains("s.bin"));
        assert_eq!(sink.records.len(), 1);
        assert!(sink.ended);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_are_reported_and_run_continues() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let acc = accumulator_in(&dir);
        let mut sink = CollectingSink::default();
        let records = vec![
            FileRecord::buffer(dir.path().join(OsStr::from_bytes(b"a\xff")), "1"),
            FileRecord::buffer(dir.path().join(OsStr::from_bytes(b"a\xfe")), "2"),
            FileRecord::buffer(dir.path().join("a.txt"), "abc"),
        ];

        let report = run_pipeline(acc, records, &mut sink).unwrap();

        assert_eq!(report.rejected, 2);
        assert_eq!(report.entries, 1);
        assert!(sink.errors.iter().all(|e| e.contains("not valid UTF-8")));
        assert!(sink.ended);
    }

    #[test]
    fn failed_finalize_does_not_end_sink() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("blocker"), "x").unwrap();
        let options = HashsumOptions {
            filename: Some("blocker/SHA1SUMS".to_owned()),
            ..HashsumOptions::default().with_dest(dir.path())
        };
        let acc = ManifestAccumulator::new(&options).unwrap();
        let mut sink = CollectingSink::default();

        let records = vec![FileRecord::buffer(dir.path().join("a.txt"), "abc")];
        assert!(run_pipeline(acc, records, &mut sink).is_err());
        assert!(!sink.ended);
        assert_eq!(sink.records.len(), 1);
    }
}
