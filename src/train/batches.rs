use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::math::matrix::Matrix;

/// Fixed-size mini-batches over aligned input/target matrices.
///
/// `Batches` itself holds no iteration state: every call to [`Batches::epoch`]
/// draws a fresh permutation and returns an independent iterator, so one
/// value can drive any number of epochs. Rows that do not fill a whole batch
/// are left out of that epoch.
#[derive(Debug, Clone, Copy)]
pub struct Batches<'a> {
    x: &'a Matrix,
    y: &'a Matrix,
    batch_size: usize,
}

/// One shuffled pass over the data, yielding `(inputs, targets)` pairs.
#[derive(Debug, Clone)]
pub struct EpochBatches<'a> {
    x: &'a Matrix,
    y: &'a Matrix,
    indices: Vec<usize>,
    batch_size: usize,
    next: usize,
}

impl<'a> Batches<'a> {
    /// # Panics
    /// Panics if `batch_size == 0` or `x` and `y` have different row counts.
    pub fn new(x: &'a Matrix, y: &'a Matrix, batch_size: usize) -> Batches<'a> {
        assert!(batch_size > 0, "batch_size must be at least 1");
        assert_eq!(x.rows, y.rows, "inputs and targets must have equal row counts");

        let dropped = x.rows % batch_size;
        if dropped > 0 {
            debug!("{} trailing rows do not fill a batch of {} and are skipped each epoch", dropped, batch_size);
        }
        Batches { x, y, batch_size }
    }

    /// Number of batches in every epoch.
    pub fn len(&self) -> usize {
        self.x.rows / self.batch_size
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Shuffles the row order and returns an iterator over this epoch's batches.
    pub fn epoch<R: Rng + ?Sized>(&self, rng: &mut R) -> EpochBatches<'a> {
        let mut indices: Vec<usize> = (0..self.x.rows).collect();
        indices.shuffle(rng);
        EpochBatches {
            x: self.x,
            y: self.y,
            indices,
            batch_size: self.batch_size,
            next: 0,
        }
    }
}

impl Iterator for EpochBatches<'_> {
    type Item = (Matrix, Matrix);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next * self.batch_size;
        let end = start + self.batch_size;
        if end > self.indices.len() {
            return None;
        }
        self.next += 1;

        let rows = &self.indices[start..end];
        Some((self.x.select_rows(rows), self.y.select_rows(rows)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.indices.len() / self.batch_size - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EpochBatches<'_> {}

/// Convenience wrapper: one shuffled epoch of `(inputs, targets)` batches.
pub fn create_batches<'a, R: Rng + ?Sized>(
    x: &'a Matrix,
    y: &'a Matrix,
    batch_size: usize,
    rng: &mut R,
) -> EpochBatches<'a> {
    Batches::new(x, y, batch_size).epoch(rng)
}
