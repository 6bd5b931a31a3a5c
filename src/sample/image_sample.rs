use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One image from an image package joined with its label from the label package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSample {
    pub images_path: PathBuf,
    pub labels_path: PathBuf,
    /// Position of the record in both packages.
    pub index: usize,
    /// `"<image package stem>_<index>"`.
    pub name: String,
    pub label: u8,
    pub label_text: String,
    /// One-hot over the sorted distinct labels of the whole label package.
    pub target: Vec<f32>,
    pub width: u32,
    pub height: u32,
    /// Row-major pixels scaled to `[0, 1]`.
    pub pixels: Vec<f32>,
    /// Row-major pixels as stored in the file.
    pub original: Vec<u8>,
}

/// A reduced-resolution copy of a sample's pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct SubSample {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<f32>,
}

impl ImageSample {
    pub fn resolution(&self) -> usize {
        self.pixels.len()
    }

    /// Averages overlapping windows of the normalized pixels down to roughly
    /// `resolution` pixels while keeping the aspect ratio.
    ///
    /// - `resolution` is clamped to `[1, width * height]`; each output side is at least 1.
    /// - `overlap` is the window size as a fraction of the original side,
    ///   clamped to `[0, 0.95]`. A window always covers at least one pixel.
    pub fn sub_sample(&self, resolution: usize, overlap: f32) -> SubSample {
        let (width, height) = (self.width as usize, self.height as usize);
        let total = width * height;
        if total == 0 {
            return SubSample { width: 0, height: 0, pixels: Vec::new() };
        }

        let resolution = resolution.clamp(1, total);
        let overlap = overlap.clamp(0.0, 0.95);

        let scale = (resolution as f32 / total as f32).sqrt();
        let sub_width = ((scale * width as f32) as usize).max(1);
        let sub_height = ((scale * height as f32) as usize).max(1);

        let stride_x = width as f32 / sub_width as f32;
        let stride_y = height as f32 / sub_height as f32;
        let window_w = width as f32 * overlap;
        let window_h = height as f32 * overlap;

        let mut pixels = vec![0.0f32; sub_width * sub_height];
        for sy in 0..sub_height {
            let (start_y, end_y) = window_bounds(sy, stride_y, window_h, height);
            for sx in 0..sub_width {
                let (start_x, end_x) = window_bounds(sx, stride_x, window_w, width);

                let mut sum = 0.0f32;
                for y in start_y..end_y {
                    let row = &self.pixels[y * width..(y + 1) * width];
                    sum += row[start_x..end_x].iter().sum::<f32>();
                }
                let area = ((end_x - start_x) * (end_y - start_y)) as f32;
                pixels[sy * sub_width + sx] = sum / area;
            }
        }

        SubSample {
            width: sub_width as u32,
            height: sub_height as u32,
            pixels,
        }
    }
}

/// Half-open pixel range of the window centred on output cell `i`.
fn window_bounds(i: usize, stride: f32, window: f32, limit: usize) -> (usize, usize) {
    let origin = i as f32 * stride - 0.5 * window;
    let start = (origin.max(0.0) as usize).min(limit - 1);
    let end = ((origin + window).max(0.0) as usize).min(limit).max(start + 1);
    (start, end)
}

impl fmt::Display for ImageSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.label_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(width: u32, height: u32, original: Vec<u8>) -> ImageSample {
        ImageSample {
            images_path: "digits.idx3-ubyte".into(),
            labels_path: "digits.idx1-ubyte".into(),
            index: 0,
            name: "digits_0".into(),
            label: 4,
            label_text: "4".into(),
            target: vec![0.0, 1.0],
            width,
            height,
            pixels: original.iter().map(|&p| p as f32 / 255.0).collect(),
            original,
        }
    }

    #[test]
    fn display_shows_name_and_label() {
        assert_eq!(sample(1, 1, vec![0]).to_string(), "digits_0 (4)");
    }

    #[test]
    fn sub_sample_averages_windows() {
        // pixel value = x + 4y
        let original: Vec<u8> = (0..16).collect();
        let s = sample(4, 4, original);
        let sub = s.sub_sample(4, 0.5);

        assert_eq!((sub.width, sub.height), (2, 2));
        assert_eq!(sub.pixels.len(), 4);
        // cell (0,0) covers only pixel (0,0)
        assert!((sub.pixels[0] - 0.0).abs() < 1e-6);
        // cell (1,1) covers pixels x,y in 1..3 -> mean of 5, 6, 9, 10
        assert!((sub.pixels[3] - 7.5 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn sub_sample_of_constant_image_is_constant() {
        let s = sample(6, 6, vec![200; 36]);
        let sub = s.sub_sample(9, 0.9);
        assert_eq!((sub.width, sub.height), (3, 3));
        for p in sub.pixels {
            assert!((p - 200.0 / 255.0).abs() < 1e-5);
        }
    }

    #[test]
    fn sub_sample_clamps_resolution() {
        let s = sample(2, 2, vec![0, 85, 170, 255]);
        let full = s.sub_sample(100, 0.0);
        assert_eq!((full.width, full.height), (2, 2));
        assert_eq!(full.pixels, s.pixels);

        let tiny = s.sub_sample(0, 0.0);
        assert_eq!((tiny.width, tiny.height), (1, 1));
    }

    #[test]
    fn sub_sample_of_empty_image_is_empty() {
        let sub = sample(0, 5, Vec::new()).sub_sample(4, 0.5);
        assert!(sub.pixels.is_empty());
    }
}
