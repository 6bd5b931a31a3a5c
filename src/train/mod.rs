pub mod batches;
pub mod epoch_stats;
pub mod loop_fn;
pub mod metrics;
pub mod train_config;

pub use batches::{create_batches, Batches, EpochBatches};
pub use epoch_stats::{EpochStats, TrainingHistory};
pub use loop_fn::{train_loop, Model};
pub use metrics::{calculate_accuracy, mse_loss};
pub use train_config::{ConfigError, TrainConfig};
