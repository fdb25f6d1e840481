use crate::algorithm::{AlgorithmError, HashAlgorithm};
use crate::format::{ManifestFormat, DEFAULT_DELIMITER};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse options: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("filename must not be empty")]
    EmptyFileName,
    #[error("delimiter must not be empty")]
    EmptyDelimiter,
    #[error("delimiter must not contain a line break")]
    MultilineDelimiter,
}

/// Recognized options for one manifest run.
///
/// Field names follow the `hashsum.toml` keys: `dest`, `hash`, `filename`,
/// `delimiter`, `force`, `json`, `jsonPrettyPrint`, `stream`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HashsumOptions {
    /// Base directory for path resolution. `None` means the working directory.
    #[serde(default)]
    pub dest: Option<PathBuf>,
    /// Digest algorithm identifier.
    #[serde(default = "default_hash")]
    pub hash: String,
    /// Manifest file name. `None` means `uppercase(hash) + "SUMS"`.
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Write even when the existing file is byte-identical.
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub json: bool,
    #[serde(default)]
    pub json_pretty_print: bool,
    /// Emit the manifest as a record instead of writing it to disk.
    #[serde(default)]
    pub stream: bool,
}

impl Default for HashsumOptions {
    fn default() -> Self {
        Self {
            dest: None,
            hash: default_hash(),
            filename: None,
            delimiter: default_delimiter(),
            force: false,
            json: false,
            json_pretty_print: false,
            stream: false,
        }
    }
}

fn default_hash() -> String {
    HashAlgorithm::default().name().to_owned()
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_owned()
}

impl HashsumOptions {
    #[must_use]
    pub fn with_dest(mut self, dest: impl Into<PathBuf>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    #[must_use]
    pub fn with_hash(mut self, hash: &str) -> Self {
        self.hash = hash.to_owned();
        self
    }

    /// Manifest file name, derived from the hash identifier when unset.
    pub fn file_name(&self) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| format!("{}SUMS", self.hash.to_uppercase()))
    }

    pub fn algorithm(&self) -> Result<HashAlgorithm, AlgorithmError> {
        self.hash.parse()
    }

    /// JSON is selected by either `json` or `jsonPrettyPrint`.
    pub fn format(&self) -> ManifestFormat {
        if self.json || self.json_pretty_print {
            ManifestFormat::Json {
                pretty: self.json_pretty_print,
            }
        } else {
            ManifestFormat::Lines {
                delimiter: self.delimiter.clone(),
            }
        }
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.file_name().trim().is_empty() {
            return Err(OptionsError::EmptyFileName);
        }
        // Without a separator the digest runs into the key and cannot be split off.
        if self.delimiter.is_empty() && !self.json && !self.json_pretty_print {
            return Err(OptionsError::EmptyDelimiter);
        }
        if self.delimiter.contains(['\n', '\r']) {
            return Err(OptionsError::MultilineDelimiter);
        }
        Ok(())
    }
}

pub fn parse_options_str(input: &str) -> Result<HashsumOptions, OptionsError> {
    Ok(toml::from_str(input)?)
}

pub fn parse_options_file(path: impl AsRef<Path>) -> Result<HashsumOptions, OptionsError> {
    let content = fs::read_to_string(path)?;
    parse_options_str(&content)
}
