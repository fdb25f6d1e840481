//! Digest algorithms, path normalization, options, and manifest formats for hashsum.
//!
//! This crate defines the schema layer: the supported digest algorithms
//! (`HashAlgorithm`), the pure path normalizer that turns a file location into a
//! manifest key (`manifest_key`), the recognized options and their TOML loading
//! (`HashsumOptions`), and the canonical manifest representation with its line
//! and JSON renderings (`Manifest`, `ManifestFormat`).

pub mod algorithm;
pub mod format;
pub mod normalize;
pub mod options;
pub mod types;

pub use algorithm::{AlgorithmError, HashAlgorithm};
pub use format::{FormatError, Manifest, ManifestFormat, DEFAULT_DELIMITER};
pub use normalize::{manifest_key, normalize, resolve, NormalizeError};
pub use options::{parse_options_file, parse_options_str, HashsumOptions, OptionsError};
pub use types::{HexDigest, ManifestKey};
