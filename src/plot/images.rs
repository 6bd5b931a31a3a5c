//! Renders samples as PNG images.
//!
//! Each image is contrast-stretched between its own minimum and maximum
//! before colouring, and every source pixel becomes a `PIXEL_SCALE`-sized
//! square so 28×28 digits stay readable.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use log::info;

use crate::math::matrix::Matrix;
use crate::plot::colormap::Colormap;
use crate::plot::PlotError;
use crate::sample::ImageSample;

pub const PIXEL_SCALE: u32 = 4;
/// Gap between images in a strip, in output pixels.
const GAP: u32 = PIXEL_SCALE;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Renders one row-major image at its native resolution.
pub fn render_image(
    pixels: &[f32],
    height: u32,
    width: u32,
    colormap: Colormap,
) -> Result<RgbImage, PlotError> {
    let expected = height as usize * width as usize;
    if expected == 0 {
        return Err(PlotError::Empty);
    }
    if pixels.len() != expected {
        return Err(PlotError::ShapeMismatch {
            expected,
            actual: pixels.len(),
            height,
            width,
        });
    }

    let (min, max) = pixels
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &p| (lo.min(p), hi.max(p)));
    let range = max - min;

    Ok(RgbImage::from_fn(width, height, |x, y| {
        let p = pixels[(y * width + x) as usize];
        let v = if range > 0.0 { (p - min) / range } else { 0.0 };
        colormap.color(v)
    }))
}

fn enlarge(img: &RgbImage) -> RgbImage {
    imageops::resize(
        img,
        img.width() * PIXEL_SCALE,
        img.height() * PIXEL_SCALE,
        FilterType::Nearest,
    )
}

/// Writes one sample to `path` as an enlarged PNG.
pub fn plot_image_sample(
    sample: &ImageSample,
    colormap: Colormap,
    path: impl AsRef<Path>,
) -> Result<(), PlotError> {
    let path = path.as_ref();
    let img = render_image(&sample.pixels, sample.height, sample.width, colormap)?;
    enlarge(&img).save(path)?;
    info!("Name: {} | Label: {} -> {}", sample.name, sample.label_text, path.display());
    Ok(())
}

/// Writes every row of `images` side by side into one PNG strip.
///
/// `image_size` is `(height, width)`; each row must hold `height * width` pixels.
pub fn plot_images(
    images: &Matrix,
    image_size: (u32, u32),
    colormap: Colormap,
    path: impl AsRef<Path>,
) -> Result<(), PlotError> {
    let (height, width) = image_size;
    if images.rows == 0 {
        return Err(PlotError::Empty);
    }

    let tiles = images
        .data
        .iter()
        .map(|row| render_image(row, height, width, colormap).map(|img| enlarge(&img)))
        .collect::<Result<Vec<_>, _>>()?;

    let tile_w = width * PIXEL_SCALE;
    let tile_h = height * PIXEL_SCALE;
    let n = tiles.len() as u32;
    let mut strip = RgbImage::from_pixel(n * tile_w + (n - 1) * GAP, tile_h, BACKGROUND);
    for (i, tile) in tiles.iter().enumerate() {
        imageops::replace(&mut strip, tile, (i as u32 * (tile_w + GAP)) as i64, 0);
    }

    let path = path.as_ref();
    strip.save(path)?;
    info!("Plotted {} images -> {}", n, path.display());
    Ok(())
}

/// Writes the given samples side by side, using the first sample's dimensions.
pub fn plot_image_samples<'a, I>(
    samples: I,
    colormap: Colormap,
    path: impl AsRef<Path>,
) -> Result<(), PlotError>
where
    I: IntoIterator<Item = &'a ImageSample>,
{
    let samples: Vec<&ImageSample> = samples.into_iter().collect();
    let first = samples.first().ok_or(PlotError::Empty)?;
    let image_size = (first.height, first.width);
    let images = Matrix {
        rows: samples.len(),
        cols: first.pixels.len(),
        data: samples.iter().map(|s| s.pixels.clone()).collect(),
    };
    plot_images(&images, image_size, colormap, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_stretches_contrast() {
        let img = render_image(&[0.25, 0.5, 0.75, 0.25], 2, 2, Colormap::Gray).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(*img.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(0, 1), Rgb([255, 255, 255]));
        assert_eq!(*img.get_pixel(1, 0), Rgb([128, 128, 128]));
    }

    #[test]
    fn render_of_flat_image_is_black() {
        let img = render_image(&[0.5; 4], 2, 2, Colormap::Gray).unwrap();
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn render_checks_shape() {
        let err = render_image(&[0.0; 3], 2, 2, Colormap::Gray).unwrap_err();
        assert!(matches!(err, PlotError::ShapeMismatch { expected: 4, actual: 3, .. }));
        assert!(matches!(render_image(&[], 0, 3, Colormap::Gray), Err(PlotError::Empty)));
    }

    #[test]
    fn strip_has_one_tile_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strip.png");
        let images = Matrix::from_data(vec![vec![0.0, 1.0, 0.5, 0.25]; 3]);
        plot_images(&images, (2, 2), Colormap::Gray, &path).unwrap();

        let png = image::open(&path).unwrap().to_rgb8();
        let tile = 2 * PIXEL_SCALE;
        assert_eq!(png.dimensions(), (3 * tile + 2 * GAP, tile));
    }

    #[test]
    fn sample_png_is_enlarged_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("first.png");
        let sample = ImageSample {
            images_path: "digits.idx3-ubyte".into(),
            labels_path: "digits.idx1-ubyte".into(),
            index: 0,
            name: "digits_0".into(),
            label: 4,
            label_text: "4".into(),
            target: vec![1.0],
            width: 3,
            height: 2,
            pixels: vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0],
            original: vec![0, 51, 102, 153, 204, 255],
        };
        plot_image_sample(&sample, Colormap::Gray, &path).unwrap();

        let png = image::open(&path).unwrap().to_rgb8();
        assert_eq!(png.dimensions(), (3 * PIXEL_SCALE, 2 * PIXEL_SCALE));
        assert_eq!(*png.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*png.get_pixel(3 * PIXEL_SCALE - 1, 2 * PIXEL_SCALE - 1), Rgb([255, 255, 255]));
    }

    #[test]
    fn no_samples_is_empty_error() {
        let none: Vec<ImageSample> = Vec::new();
        let err = plot_image_samples(&none, Colormap::Gray, "unused.png").unwrap_err();
        assert!(matches!(err, PlotError::Empty));
    }
}
