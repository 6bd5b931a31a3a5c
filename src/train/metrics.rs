use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;

/// Mean squared error of `predict(x)` against `y`.
pub fn mse_loss<F>(predict: F, x: &Matrix, y: &Matrix) -> f32
where
    F: Fn(&Matrix) -> Matrix,
{
    MseLoss::loss(&predict(x), y)
}

/// Fraction in `[0, 1]` of rows whose predicted argmax matches the target argmax.
/// An empty input has accuracy 0.
pub fn calculate_accuracy<F>(predict: F, x: &Matrix, y: &Matrix) -> f32
where
    F: Fn(&Matrix) -> Matrix,
{
    if x.rows == 0 {
        return 0.0;
    }
    let predicted = predict(x).argmax_rows();
    let expected = y.argmax_rows();
    let correct = predicted
        .iter()
        .zip(expected.iter())
        .filter(|(p, e)| p == e)
        .count();
    correct as f32 / x.rows as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_counts_argmax_matches() {
        let x = Matrix::zeros(4, 1);
        let y = Matrix::from_data(vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
        ]);
        // always predicts class 0
        let predict = |x: &Matrix| Matrix::from_data(vec![vec![0.9, 0.1]; x.rows]);
        assert!((calculate_accuracy(predict, &x, &y) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn accuracy_of_empty_input_is_zero() {
        let x = Matrix::default();
        let y = Matrix::default();
        assert_eq!(calculate_accuracy(|m: &Matrix| m.clone(), &x, &y), 0.0);
    }

    #[test]
    fn mse_of_identity_prediction() {
        let x = Matrix::from_data(vec![vec![1.0, 2.0]]);
        let y = Matrix::from_data(vec![vec![1.0, 4.0]]);
        assert!((mse_loss(|m: &Matrix| m.clone(), &x, &y) - 2.0).abs() < 1e-6);
    }
}
