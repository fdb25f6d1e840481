use crate::types::{HexDigest, ManifestKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Separator between digest and path in line format, matching `sha1sum` output.
pub const DEFAULT_DELIMITER: &str = "  ";

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to serialize manifest: {0}")]
    Json(#[from] serde_json::Error),
    #[error("line {line}: missing delimiter '{delimiter}' in '{content}'")]
    MalformedLine {
        line: usize,
        delimiter: String,
        content: String,
    },
    #[error("line {line}: '{digest}' is not a lowercase hex digest")]
    InvalidDigest { line: usize, digest: String },
}

/// How a manifest is rendered to bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestFormat {
    /// `<digest><delimiter><key>\n` per entry.
    Lines { delimiter: String },
    /// A flat JSON object, compact or with 2-space indentation.
    Json { pretty: bool },
}

impl Default for ManifestFormat {
    fn default() -> Self {
        ManifestFormat::Lines {
            delimiter: DEFAULT_DELIMITER.to_owned(),
        }
    }
}

/// Mapping from manifest key to digest, kept in canonical (byte) key order.
///
/// Inserting an existing key replaces its digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<ManifestKey, HexDigest>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry, returning the digest it replaced.
    pub fn insert(&mut self, key: ManifestKey, digest: HexDigest) -> Option<HexDigest> {
        self.entries.insert(key, digest)
    }

    pub fn get(&self, key: &str) -> Option<&HexDigest> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self, format: &ManifestFormat) -> Result<Vec<u8>, FormatError> {
        match format {
            ManifestFormat::Lines { delimiter } => Ok(self.render_lines(delimiter).into_bytes()),
            ManifestFormat::Json { pretty: false } => Ok(serde_json::to_vec(self)?),
            ManifestFormat::Json { pretty: true } => Ok(serde_json::to_vec_pretty(self)?),
        }
    }

    fn render_lines(&self, delimiter: &str) -> String {
        let mut out = String::new();
        for (key, digest) in &self.entries {
            out.push_str(digest);
            out.push_str(delimiter);
            out.push_str(key);
            out.push('\n');
        }
        out
    }

    /// Parse line format back into a manifest.
    ///
    /// Each non-empty line is split on the first occurrence of `delimiter`.
    /// Lines end at `\n` only; a `\r` before it belongs to the key.
    pub fn parse_lines(input: &str, delimiter: &str) -> Result<Self, FormatError> {
        let mut manifest = Manifest::new();
        for (idx, line) in input.split_terminator('\n').enumerate() {
            if line.is_empty() {
                continue;
            }
            let line_no = idx + 1;
            let Some((digest, key)) = line.split_once(delimiter) else {
                return Err(FormatError::MalformedLine {
                    line: line_no,
                    delimiter: delimiter.to_owned(),
                    content: line.to_owned(),
                });
            };
            if !is_lower_hex(digest) {
                return Err(FormatError::InvalidDigest {
                    line: line_no,
                    digest: digest.to_owned(),
                });
            }
            manifest.insert(ManifestKey::from(key), HexDigest::from(digest));
        }
        Ok(manifest)
    }

    /// Parse JSON format (compact or pretty) back into a manifest.
    pub fn parse_json(input: &str) -> Result<Self, FormatError> {
        Ok(serde_json::from_str(input)?)
    }
}

fn is_lower_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
