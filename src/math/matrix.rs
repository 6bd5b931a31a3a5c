use serde::{Serialize, Deserialize};
use std::ops::Sub;

/// Dense row-major matrix; one row per sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f32>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from its rows. An empty input gives a 0×0 matrix.
    ///
    /// # Panics
    /// Panics if the rows have different lengths.
    pub fn from_data(data: Vec<Vec<f32>>) -> Matrix {
        let cols = data.first().map(|row| row.len()).unwrap_or(0);
        if data.iter().any(|row| row.len() != cols) {
            panic!("Matrix rows must all have the same length")
        }
        Matrix {
            rows: data.len(),
            cols,
            data,
        }
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i]
    }

    /// New matrix made of the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        Matrix {
            rows: indices.len(),
            cols: self.cols,
            data: indices.iter().map(|&i| self.data[i].clone()).collect(),
        }
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f32) -> f32,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Arithmetic mean over every element; 0 for an empty matrix.
    pub fn mean(&self) -> f32 {
        let n = self.rows * self.cols;
        if n == 0 {
            return 0.0;
        }
        self.data.iter().flatten().sum::<f32>() / n as f32
    }

    /// Column index of the largest value in each row.
    pub fn argmax_rows(&self) -> Vec<usize> {
        self.data.iter().map(|row| argmax(row)).collect()
    }
}

/// Index of the maximum element in a slice; the first one wins on ties.
pub fn argmax(v: &[f32]) -> usize {
    v.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &x)| match best {
            Some((_, b)) if b >= x => best,
            _ => Some((i, x)),
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }

        res
    }
}
