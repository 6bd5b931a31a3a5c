pub mod idx;
pub mod loss;
pub mod math;
pub mod plot;
pub mod sample;
pub mod train;

// Convenience re-exports
pub use idx::{load_image_and_label_data, IdxError};
pub use math::matrix::Matrix;
pub use sample::{Dataset, ImageSample};
pub use train::{create_batches, train_loop, Batches, Model, TrainConfig};
