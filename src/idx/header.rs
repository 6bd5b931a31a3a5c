//! Fixed-size IDX headers.
//!
//! # Label package layout
//! ```text
//! bytes 0-3:  2049   (signature, big-endian u32)
//! bytes 4-7:  N      (number of labels, big-endian u32)
//! bytes 8..:  N bytes, one label each
//! ```
//!
//! # Image package layout
//! ```text
//! bytes  0-3:   2051    (signature, big-endian u32)
//! bytes  4-7:   N       (number of images, big-endian u32)
//! bytes  8-11:  height  (rows, big-endian u32)
//! bytes 12-15:  width   (columns, big-endian u32)
//! bytes 16..:   N * height * width bytes, row-major
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder};
use log::debug;

use crate::idx::error::{IdxError, PackageKind, Result};

pub const IMAGES_PACKAGE_HEADER_SIGNATURE: u32 = 2051;
pub const LABELS_PACKAGE_HEADER_SIGNATURE: u32 = 2049;
pub const HEADER_SIZE_IMAGES: usize = 16;
pub const HEADER_SIZE_LABELS: usize = 8;

/// Upper bound on up-front allocation; larger reads grow as bytes arrive.
const MAX_PREALLOC: usize = 1 << 20;

/// Header of a label package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelHeader {
    pub count: u32,
}

/// Header of an image package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub count: u32,
    pub height: u32,
    pub width: u32,
}

impl LabelHeader {
    /// Reads and validates the 8-byte label header from the current position of `reader`.
    pub fn read_from<R: Read>(reader: &mut R, path: &Path) -> Result<LabelHeader> {
        let buf = read_block(reader, HEADER_SIZE_LABELS, path, || "label header".to_owned())?;
        check_signature(
            BigEndian::read_u32(&buf[0..4]),
            LABELS_PACKAGE_HEADER_SIGNATURE,
            PackageKind::Labels,
            path,
        )?;
        let header = LabelHeader { count: BigEndian::read_u32(&buf[4..8]) };
        debug!("{}: label header {:?}", path.display(), header);
        Ok(header)
    }
}

impl ImageHeader {
    /// Reads and validates the 16-byte image header from the current position of `reader`.
    pub fn read_from<R: Read>(reader: &mut R, path: &Path) -> Result<ImageHeader> {
        let buf = read_block(reader, HEADER_SIZE_IMAGES, path, || "image header".to_owned())?;
        check_signature(
            BigEndian::read_u32(&buf[0..4]),
            IMAGES_PACKAGE_HEADER_SIGNATURE,
            PackageKind::Images,
            path,
        )?;
        let header = ImageHeader {
            count: BigEndian::read_u32(&buf[4..8]),
            height: BigEndian::read_u32(&buf[8..12]),
            width: BigEndian::read_u32(&buf[12..16]),
        };
        debug!("{}: image header {:?}", path.display(), header);
        Ok(header)
    }

    /// Number of bytes in one image block (`height * width`).
    pub fn image_size(&self, path: &Path) -> Result<usize> {
        (self.height as usize)
            .checked_mul(self.width as usize)
            .ok_or_else(|| IdxError::DimensionsOverflow {
                path: path.to_path_buf(),
                height: self.height,
                width: self.width,
            })
    }
}

/// Opens `path`, validates the label header and returns the declared label count.
pub fn read_label_header(path: impl AsRef<Path>) -> Result<u32> {
    let path = path.as_ref();
    let mut reader = open(path)?;
    Ok(LabelHeader::read_from(&mut reader, path)?.count)
}

/// Opens `path`, validates the image header and returns `(count, height, width)`
/// packed in an [`ImageHeader`].
pub fn read_image_header(path: impl AsRef<Path>) -> Result<ImageHeader> {
    let path = path.as_ref();
    let mut reader = open(path)?;
    ImageHeader::read_from(&mut reader, path)
}

pub(crate) fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| IdxError::io(path, e))
}

/// Reads exactly `len` bytes or reports how many were actually available.
pub(crate) fn read_block<R, F>(reader: &mut R, len: usize, path: &Path, what: F) -> Result<Vec<u8>>
where
    R: Read,
    F: FnOnce() -> String,
{
    let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
    reader
        .take(len as u64)
        .read_to_end(&mut buf)
        .map_err(|e| IdxError::io(path, e))?;

    if buf.len() != len {
        return Err(IdxError::Truncated {
            path: path.to_path_buf(),
            what: what(),
            expected: len,
            actual: buf.len(),
        });
    }
    Ok(buf)
}

fn check_signature(actual: u32, expected: u32, kind: PackageKind, path: &Path) -> Result<()> {
    if actual != expected {
        return Err(IdxError::InvalidSignature {
            path: path.to_path_buf(),
            kind,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn be(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    #[test]
    fn parses_label_header() {
        let bytes = be(&[2049, 60_000]);
        let header = LabelHeader::read_from(&mut bytes.as_slice(), Path::new("mem")).unwrap();
        assert_eq!(header.count, 60_000);
    }

    #[test]
    fn parses_image_header() {
        let bytes = be(&[2051, 3, 28, 14]);
        let header = ImageHeader::read_from(&mut bytes.as_slice(), Path::new("mem")).unwrap();
        assert_eq!(header, ImageHeader { count: 3, height: 28, width: 14 });
        assert_eq!(header.image_size(Path::new("mem")).unwrap(), 392);
    }

    #[test]
    fn rejects_swapped_signatures() {
        let labels_as_images = be(&[2049, 1, 1, 1]);
        let err = ImageHeader::read_from(&mut labels_as_images.as_slice(), Path::new("mem"))
            .unwrap_err();
        assert!(matches!(
            err,
            IdxError::InvalidSignature { expected: 2051, actual: 2049, kind: PackageKind::Images, .. }
        ));

        let images_as_labels = be(&[2051, 1]);
        let err = LabelHeader::read_from(&mut images_as_labels.as_slice(), Path::new("mem"))
            .unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn short_header_is_truncation() {
        let bytes = vec![0, 0, 8, 3, 0, 0];
        let err = ImageHeader::read_from(&mut bytes.as_slice(), Path::new("mem")).unwrap_err();
        match err {
            IdxError::Truncated { expected, actual, .. } => {
                assert_eq!(expected, HEADER_SIZE_IMAGES);
                assert_eq!(actual, 6);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_block_consumes_only_requested_bytes() {
        let bytes = [1u8, 2, 3, 4, 5];
        let mut reader = &bytes[..];
        let first = read_block(&mut reader, 2, Path::new("mem"), || "a".into()).unwrap();
        let rest = read_block(&mut reader, 3, Path::new("mem"), || "b".into()).unwrap();
        assert_eq!(first, vec![1, 2]);
        assert_eq!(rest, vec![3, 4, 5]);
    }

    #[test]
    fn zero_dimensions_are_allowed() {
        let header = ImageHeader { count: 4, height: 0, width: 28 };
        assert_eq!(header.image_size(Path::new("mem")).unwrap(), 0);
    }
}
