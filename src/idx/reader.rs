use std::path::Path;

use log::{debug, info};

use crate::idx::error::{IdxError, Result};
use crate::idx::header::{self, ImageHeader, LabelHeader};
use crate::sample::ImageSample;

/// Reads every label of a label package in file order.
pub fn read_labels(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let mut reader = header::open(path)?;
    let count = LabelHeader::read_from(&mut reader, path)?.count as usize;
    header::read_block(&mut reader, count, path, || format!("{count} labels"))
}

/// Sorted, deduplicated label values. A label's position here is its one-hot index.
pub fn unique_labels(labels: &[u8]) -> Vec<u8> {
    let mut unique = labels.to_vec();
    unique.sort_unstable();
    unique.dedup();
    unique
}

/// One-hot vector over `unique_labels` with a 1 at the rank of `label`.
///
/// A label missing from `unique_labels` yields all zeros.
pub fn one_hot(label: u8, unique_labels: &[u8]) -> Vec<f32> {
    unique_labels
        .iter()
        .map(|&u| if u == label { 1.0 } else { 0.0 })
        .collect()
}

/// Reads the image package and joins each image with the label at the same index.
///
/// The image count declared in the header must equal `labels.len()`; this is
/// checked before any image is read. Header and images share one file handle.
pub fn read_images(
    images_path: impl AsRef<Path>,
    labels_path: impl AsRef<Path>,
    labels: &[u8],
    unique_labels: &[u8],
) -> Result<Vec<ImageSample>> {
    let images_path = images_path.as_ref();
    let labels_path = labels_path.as_ref();

    let mut reader = header::open(images_path)?;
    let image_header = ImageHeader::read_from(&mut reader, images_path)?;
    if image_header.count as usize != labels.len() {
        return Err(IdxError::CountMismatch {
            images: image_header.count as usize,
            labels: labels.len(),
        });
    }

    let ImageHeader { height, width, .. } = image_header;
    let image_size = image_header.image_size(images_path)?;
    let stem = images_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut samples = Vec::with_capacity(labels.len());
    for (index, &label) in labels.iter().enumerate() {
        let original = header::read_block(&mut reader, image_size, images_path, || {
            format!("image {index}")
        })?;
        let pixels = original.iter().map(|&p| p as f32 / 255.0).collect();

        samples.push(ImageSample {
            images_path: images_path.to_path_buf(),
            labels_path: labels_path.to_path_buf(),
            index,
            name: format!("{stem}_{index}"),
            label,
            label_text: label.to_string(),
            target: one_hot(label, unique_labels),
            width,
            height,
            pixels,
            original,
        });
    }

    debug!("{}: read {} images of {}x{}", images_path.display(), samples.len(), height, width);
    Ok(samples)
}

/// Loads an image package and its label package into memory.
///
/// This is the entry point for callers: it reads the labels, derives the
/// distinct label set for the one-hot targets, then reads the images.
pub fn load_image_and_label_data(
    images_path: impl AsRef<Path>,
    labels_path: impl AsRef<Path>,
) -> Result<Vec<ImageSample>> {
    let images_path = images_path.as_ref();
    let labels_path = labels_path.as_ref();

    let labels = read_labels(labels_path)?;
    let unique = unique_labels(&labels);
    let samples = read_images(images_path, labels_path, &labels, &unique)?;

    info!(
        "Loaded {} samples from {} ({} distinct labels)",
        samples.len(),
        images_path.display(),
        unique.len()
    );
    Ok(samples)
}
