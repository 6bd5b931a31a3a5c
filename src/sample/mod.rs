pub mod dataset;
pub mod image_sample;

pub use dataset::{choose_samples, Dataset};
pub use image_sample::{ImageSample, SubSample};
