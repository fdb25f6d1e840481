use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Contents carried by a [`FileRecord`].
pub enum Contents {
    /// Placeholder with nothing to digest, e.g. a directory entry.
    Empty,
    /// Fully materialized bytes.
    Buffer(Vec<u8>),
    /// An open reader. Not supported by the accumulator.
    Stream(Box<dyn Read + Send>),
}

impl fmt::Debug for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contents::Empty => f.write_str("Empty"),
            Contents::Buffer(data) => write!(f, "Buffer({} bytes)", data.len()),
            Contents::Stream(_) => f.write_str("Stream"),
        }
    }
}

/// A named byte buffer flowing through the pipeline.
#[derive(Debug)]
pub struct FileRecord {
    pub path: PathBuf,
    pub contents: Contents,
}

impl FileRecord {
    pub fn buffer(path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: Contents::Buffer(data.into()),
        }
    }

    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            contents: Contents::Empty,
        }
    }

    pub fn stream(path: impl Into<PathBuf>, reader: impl Read + Send + 'static) -> Self {
        Self {
            path: path.into(),
            contents: Contents::Stream(Box::new(reader)),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The materialized bytes, if any.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.contents {
            Contents::Buffer(data) => Some(data),
            Contents::Empty | Contents::Stream(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.contents, Contents::Empty)
    }
}
