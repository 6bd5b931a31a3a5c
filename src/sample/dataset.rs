use std::collections::BTreeMap;

use log::debug;
use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::idx::unique_labels;
use crate::math::matrix::Matrix;
use crate::sample::image_sample::ImageSample;

/// Dense aggregates derived from a list of samples, ready for a training loop.
///
/// Row `i` of `x`, row `i` of `y` and `labels[i]` all describe the same sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// N × (height·width) normalized pixels.
    pub x: Matrix,
    /// N × |unique_labels| one-hot targets.
    pub y: Matrix,
    /// Raw label of each row.
    pub labels: Vec<u8>,
    /// Sorted distinct labels; column `j` of `y` stands for `unique_labels[j]`.
    pub unique_labels: Vec<u8>,
    /// `(height, width)` of every image.
    pub image_size: (u32, u32),
}

impl Dataset {
    /// Stacks the samples' pixels and targets into matrices.
    ///
    /// # Panics
    /// Panics if the samples disagree on pixel count or target length, e.g.
    /// samples from two loads with different label sets.
    pub fn from_samples(samples: &[ImageSample]) -> Dataset {
        let labels: Vec<u8> = samples.iter().map(|s| s.label).collect();
        let image_size = samples.first().map(|s| (s.height, s.width)).unwrap_or((0, 0));

        Dataset {
            x: Matrix::from_data(samples.iter().map(|s| s.pixels.clone()).collect()),
            y: Matrix::from_data(samples.iter().map(|s| s.target.clone()).collect()),
            unique_labels: unique_labels(&labels),
            labels,
            image_size,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of input features per row.
    pub fn input_size(&self) -> usize {
        self.x.cols
    }

    /// Number of target classes per row.
    pub fn output_size(&self) -> usize {
        self.y.cols
    }

    /// Rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            x: self.x.select_rows(indices),
            y: self.y.select_rows(indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            unique_labels: self.unique_labels.clone(),
            image_size: self.image_size,
        }
    }

    /// Shuffles the rows and splits off the last `test_pct` percent (capped at 50)
    /// as a test set. Returns `(train, test)`.
    pub fn split<R: Rng + ?Sized>(&self, test_pct: u8, rng: &mut R) -> (Dataset, Dataset) {
        let total = self.len();
        let test_n = total * test_pct.min(50) as usize / 100;
        let train_n = total - test_n;

        let mut indices: Vec<usize> = (0..total).collect();
        indices.shuffle(rng);
        let (train_idx, test_idx) = indices.split_at(train_n);

        debug!("Split {} rows into {} train / {} test", total, train_n, test_n);
        (self.select(train_idx), self.select(test_idx))
    }

    /// Up to `amount` distinct row indices, for spot checks of `x` and `y`.
    pub fn random_row_indices<R: Rng + ?Sized>(&self, amount: usize, rng: &mut R) -> Vec<usize> {
        index::sample(rng, self.len(), amount.min(self.len())).into_vec()
    }

    /// Up to `amount` distinct input feature (pixel column) indices.
    pub fn random_feature_indices<R: Rng + ?Sized>(&self, amount: usize, rng: &mut R) -> Vec<usize> {
        let features = self.input_size();
        index::sample(rng, features, amount.min(features)).into_vec()
    }

    /// How many rows carry each label.
    pub fn label_frequencies(&self) -> BTreeMap<u8, usize> {
        let mut counts = BTreeMap::new();
        for &label in &self.labels {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }
}

/// Up to `amount` distinct samples chosen uniformly at random.
pub fn choose_samples<'a, R: Rng + ?Sized>(
    samples: &'a [ImageSample],
    amount: usize,
    rng: &mut R,
) -> Vec<&'a ImageSample> {
    let amount = amount.min(samples.len());
    index::sample(rng, samples.len(), amount)
        .into_iter()
        .map(|i| &samples[i])
        .collect()
}
