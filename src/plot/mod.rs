pub mod charts;
pub mod colormap;
pub mod images;

use thiserror::Error;

pub use charts::{plot_metric, plot_training_metrics};
pub use colormap::Colormap;
pub use images::{plot_image_sample, plot_image_samples, plot_images, render_image};

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("nothing to plot")]
    Empty,
    #[error("expected {expected} pixels for a {height}x{width} image, got {actual}")]
    ShapeMismatch {
        expected: usize,
        actual: usize,
        height: u32,
        width: u32,
    },
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
