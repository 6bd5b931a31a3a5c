use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::train::train_config::ConfigError;

/// Metrics recorded at the end of one epoch by `train_loop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Mean loss over the training data after this epoch.
    pub loss: f32,
    /// Accuracy as a fraction in [0, 1]; absent when the run does not track it.
    pub accuracy: Option<f32>,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// Ordered per-epoch metrics of one training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub epochs: Vec<EpochStats>,
}

impl TrainingHistory {
    pub fn record(&mut self, stats: EpochStats) {
        self.epochs.push(stats);
    }

    pub fn loss(&self) -> Vec<f32> {
        self.epochs.iter().map(|e| e.loss).collect()
    }

    /// Accuracy series, skipping epochs that did not record one.
    pub fn accuracy(&self) -> Vec<f32> {
        self.epochs.iter().filter_map(|e| e.accuracy).collect()
    }

    pub fn last(&self) -> Option<&EpochStats> {
        self.epochs.last()
    }

    /// Serializes the history to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_follow_recorded_epochs() {
        let mut history = TrainingHistory::default();
        history.record(EpochStats { epoch: 1, loss: 0.5, accuracy: Some(0.6), elapsed_ms: 3 });
        history.record(EpochStats { epoch: 2, loss: 0.25, accuracy: None, elapsed_ms: 2 });

        assert_eq!(history.loss(), vec![0.5, 0.25]);
        assert_eq!(history.accuracy(), vec![0.6]);
        assert_eq!(history.last().map(|e| e.epoch), Some(2));
    }

    #[test]
    fn saves_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut history = TrainingHistory::default();
        history.record(EpochStats { epoch: 1, loss: 1.0, accuracy: None, elapsed_ms: 0 });
        history.save_json(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: TrainingHistory = serde_json::from_str(&text).unwrap();
        assert_eq!(back, history);
    }
}
