use crate::math::matrix::Matrix;

pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((predicted - expected)²) over every element.
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> f32 {
        (predicted - expected).map(|d| d * d).mean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_is_mean_of_squared_differences() {
        let p = Matrix::from_data(vec![vec![1.0, 0.0], vec![0.5, 0.5]]);
        let e = Matrix::from_data(vec![vec![0.0, 0.0], vec![1.0, 0.5]]);
        // (1 + 0 + 0.25 + 0) / 4
        assert!((MseLoss::loss(&p, &e) - 0.3125).abs() < 1e-6);
    }

    #[test]
    fn loss_of_identical_matrices_is_zero() {
        let m = Matrix::from_data(vec![vec![0.3, 0.7]]);
        assert_eq!(MseLoss::loss(&m, &m), 0.0);
    }
}
