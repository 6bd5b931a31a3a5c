use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Hyperparameters handed to a training routine.
///
/// # Fields
/// - `seed`                    — seeds batch shuffling and dataset splits
/// - `batch_size`              — samples per mini-batch
/// - `learning_rate`           — step size per sample; see [`TrainConfig::batch_learning_rate`]
/// - `l1_decay` / `l2_decay`   — weight decay factors
/// - `momentum`, `nesterov_momentum`
/// - `classification_epochs` / `classification_features` — hidden layer sizes of the classifier
/// - `autoencoder_epochs` / `autoencoder_features`       — layer sizes of the autoencoder
///
/// Missing JSON fields fall back to [`TrainConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub seed: u64,
    pub batch_size: usize,
    pub learning_rate: f32,
    pub l1_decay: f32,
    pub l2_decay: f32,
    pub momentum: f32,
    pub nesterov_momentum: bool,
    pub classification_epochs: usize,
    pub classification_features: Vec<usize>,
    pub autoencoder_epochs: usize,
    pub autoencoder_features: Vec<usize>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            seed: 42,
            batch_size: 32,
            learning_rate: 0.02,
            l1_decay: 0.001,
            l2_decay: 0.001,
            momentum: 0.2,
            nesterov_momentum: true,
            classification_epochs: 50,
            classification_features: vec![20, 15],
            autoencoder_epochs: 100,
            autoencoder_features: vec![196, 49, 12, 49, 196],
        }
    }
}

impl TrainConfig {
    /// Learning rate to apply to a gradient summed over a whole batch.
    pub fn batch_learning_rate(&self) -> f32 {
        self.learning_rate / self.batch_size as f32
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from a JSON file previously written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<TrainConfig, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
