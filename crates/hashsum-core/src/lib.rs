//! Manifest accumulation and the record pipeline for hashsum.
//!
//! This crate ties the schema and store layers together. `ManifestAccumulator`
//! digests each incoming `FileRecord` into a per-run `Manifest` and, once the
//! input is exhausted, either writes the manifest idempotently or emits it as a
//! new record. `run_pipeline` drives an accumulator over a record sequence and
//! reports pass-through records, rejected inputs, and completion to a
//! `RecordSink`.

pub mod accumulator;
pub mod pipeline;
pub mod record;

pub use accumulator::{Disposition, ManifestAccumulator, Outcome};
pub use pipeline::{run_pipeline, CollectingSink, RecordSink, RunReport};
pub use record::{Contents, FileRecord};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("options error: {0}")]
    Options(#[from] hashsum_schema::OptionsError),
    #[error("{0}")]
    Algorithm(#[from] hashsum_schema::AlgorithmError),
    #[error("streaming contents are not supported: {}", .path.display())]
    UnsupportedInputKind { path: PathBuf },
    #[error("{0}")]
    Normalize(#[from] hashsum_schema::NormalizeError),
    #[error("format error: {0}")]
    Format(#[from] hashsum_schema::FormatError),
    #[error("store error: {0}")]
    Store(#[from] hashsum_store::StoreError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
