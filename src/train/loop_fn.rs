use std::time::Instant;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::math::matrix::Matrix;
use crate::train::batches::Batches;
use crate::train::epoch_stats::{EpochStats, TrainingHistory};
use crate::train::metrics::{calculate_accuracy, mse_loss};
use crate::train::train_config::TrainConfig;

/// A trainable model driven by `train_loop`. The model owns its parameters
/// and its update rule; the loop only feeds it batches.
pub trait Model {
    /// Predictions for every row of `x`, one output row per input row.
    fn predict(&self, x: &Matrix) -> Matrix;

    /// Applies one update from a mini-batch of inputs and targets.
    fn step(&mut self, x: &Matrix, y: &Matrix, config: &TrainConfig);
}

/// Trains `model` for `epochs` passes of shuffled mini-batches and returns the
/// per-epoch history.
///
/// After every epoch the MSE loss over the whole of `x`/`y` is recorded, and
/// the argmax accuracy as well when `track_accuracy` is set. Shuffling is
/// seeded from `config.seed`, so two runs on the same model state match.
///
/// # Panics
/// Panics if `config.batch_size == 0` or `x` and `y` have different row counts.
pub fn train_loop<M: Model + ?Sized>(
    model: &mut M,
    x: &Matrix,
    y: &Matrix,
    epochs: usize,
    track_accuracy: bool,
    config: &TrainConfig,
) -> TrainingHistory {
    let batches = Batches::new(x, y, config.batch_size);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut history = TrainingHistory::default();

    for epoch in 1..=epochs {
        let t_start = Instant::now();

        for (bx, by) in batches.epoch(&mut rng) {
            model.step(&bx, &by, config);
        }

        let predict = |m: &Matrix| model.predict(m);
        let loss = mse_loss(predict, x, y);
        let accuracy = track_accuracy.then(|| calculate_accuracy(predict, x, y));
        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        match accuracy {
            Some(acc) => info!("Epoch {:>4}/{}: loss {:.6}, accuracy {:.2}%", epoch, epochs, loss, acc * 100.0),
            None => info!("Epoch {:>4}/{}: loss {:.6}", epoch, epochs, loss),
        }

        history.record(EpochStats { epoch, loss, accuracy, elapsed_ms });
    }

    history
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Predicts the same vector for every row and nudges it toward the batch mean.
    struct ConstantModel {
        bias: Vec<f32>,
        steps: usize,
    }

    impl Model for ConstantModel {
        fn predict(&self, x: &Matrix) -> Matrix {
            Matrix::from_data(vec![self.bias.clone(); x.rows])
        }

        fn step(&mut self, _x: &Matrix, y: &Matrix, config: &TrainConfig) {
            self.steps += 1;
            for j in 0..self.bias.len() {
                let grad: f32 = y.data.iter().map(|row| self.bias[j] - row[j]).sum();
                self.bias[j] -= config.batch_learning_rate() * grad;
            }
        }
    }

    fn config() -> TrainConfig {
        TrainConfig { batch_size: 4, learning_rate: 0.5, ..TrainConfig::default() }
    }

    #[test]
    fn runs_every_batch_of_every_epoch() {
        let x = Matrix::zeros(10, 3);
        let y = Matrix::from_data(vec![vec![0.0, 1.0]; 10]);
        let mut model = ConstantModel { bias: vec![0.0, 0.0], steps: 0 };

        let history = train_loop(&mut model, &x, &y, 5, true, &config());
        assert_eq!(model.steps, 5 * 2);
        assert_eq!(history.epochs.len(), 5);
        assert_eq!(history.epochs[0].epoch, 1);
        assert_eq!(history.accuracy().len(), 5);
    }

    #[test]
    fn loss_decreases_toward_constant_target() {
        let x = Matrix::zeros(8, 1);
        let y = Matrix::from_data(vec![vec![1.0, 0.0]; 8]);
        let mut model = ConstantModel { bias: vec![0.0, 1.0], steps: 0 };

        let history = train_loop(&mut model, &x, &y, 10, false, &config());
        let loss = history.loss();
        assert!(loss.windows(2).all(|w| w[1] <= w[0]));
        assert!(loss[9] < 1e-3);
        assert!(history.accuracy().is_empty());
        assert_eq!(calculate_accuracy(|m: &Matrix| model.predict(m), &x, &y), 1.0);
    }
}
