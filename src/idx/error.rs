use std::path::PathBuf;

use thiserror::Error;

/// Which kind of IDX package a file was expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    Images,
    Labels,
}

impl std::fmt::Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageKind::Images => write!(f, "image"),
            PackageKind::Labels => write!(f, "label"),
        }
    }
}

/// Errors raised while reading an IDX image/label pair.
///
/// Every variant is fatal for the load: nothing is partially returned.
#[derive(Debug, Error)]
pub enum IdxError {
    /// The magic number at the start of the file does not match the package kind.
    #[error("file {} is not a valid {kind} package: expected signature {expected}, got {actual}", .path.display())]
    InvalidSignature {
        path: PathBuf,
        kind: PackageKind,
        expected: u32,
        actual: u32,
    },

    /// Image and label packages disagree on the number of records.
    #[error("count of images ({images}) does not match count of labels ({labels})")]
    CountMismatch { images: usize, labels: usize },

    /// `height * width` does not fit in memory on this platform.
    #[error("image dimensions {height}x{width} in {} overflow the addressable size", .path.display())]
    DimensionsOverflow {
        path: PathBuf,
        height: u32,
        width: u32,
    },

    /// The file ended before a declared header or record was complete.
    #[error("unexpected end of file in {} while reading {what}: expected {expected} bytes, got {actual}", .path.display())]
    Truncated {
        path: PathBuf,
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IdxError {
    /// Signature, count or dimension problems: the file is not what it claims to be.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            IdxError::InvalidSignature { .. }
                | IdxError::CountMismatch { .. }
                | IdxError::DimensionsOverflow { .. }
        )
    }

    /// The file is shorter than its header declares.
    pub fn is_truncation(&self) -> bool {
        matches!(self, IdxError::Truncated { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> IdxError {
        IdxError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, IdxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_variants() {
        let sig = IdxError::InvalidSignature {
            path: "a".into(),
            kind: PackageKind::Images,
            expected: 2051,
            actual: 9999,
        };
        assert!(sig.is_format_error());
        assert!(!sig.is_truncation());

        let short = IdxError::Truncated {
            path: "a".into(),
            what: "image 0".into(),
            expected: 4,
            actual: 2,
        };
        assert!(short.is_truncation());
        assert!(!short.is_format_error());

        assert!(IdxError::CountMismatch { images: 1, labels: 2 }.is_format_error());
    }

    #[test]
    fn messages_name_the_file() {
        let err = IdxError::InvalidSignature {
            path: "digits.idx1-ubyte".into(),
            kind: PackageKind::Labels,
            expected: 2049,
            actual: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("digits.idx1-ubyte"));
        assert!(msg.contains("label package"));
    }
}
