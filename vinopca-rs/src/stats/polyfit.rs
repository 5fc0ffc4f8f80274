//! Least-squares polynomial fitting on a conditioned abscissa
//!
//! Baseline estimation refits the same polynomial dozens of times per
//! spectrum, sometimes at high degree. The abscissa is affinely mapped to
//! `[-1, 1]` before the Vandermonde matrix is built; powers of raw pixel
//! indices overflow double precision long before the solver gets a say.

use crate::error::{Result, VinoPcaError};
use ndarray::{Array1, Array2, ArrayView1};
use ndarray_linalg::LeastSquaresSvd;

/// A polynomial fitted on a scaled abscissa
///
/// Coefficients are stored in ascending powers of the scaled variable;
/// evaluation maps the caller's x back onto the fitting interval, so a
/// `Polynomial` is only meaningful on the abscissa it was fitted against.
#[derive(Debug, Clone)]
pub struct Polynomial {
    coefficients: Array1<f64>,
    x_min: f64,
    x_max: f64,
}

impl Polynomial {
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluate at the given (unscaled) abscissa values.
    pub fn evaluate(&self, x: ArrayView1<f64>) -> Array1<f64> {
        x.mapv(|value| self.evaluate_scalar(value))
    }

    fn evaluate_scalar(&self, x: f64) -> f64 {
        let t = self.scale(x);
        // Horner on the scaled variable
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &coefficient| acc * t + coefficient)
    }

    fn scale(&self, x: f64) -> f64 {
        let span = self.x_max - self.x_min;
        if span > 0.0 {
            2.0 * (x - self.x_min) / span - 1.0
        } else {
            0.0
        }
    }
}

/// Fit a polynomial of `degree` to `(x, y)` by least squares.
///
/// # Errors
/// `InvalidParameter` when the inputs are empty or of unequal length, or when
/// `degree` is not smaller than the number of points.
pub fn polyfit(x: ArrayView1<f64>, y: ArrayView1<f64>, degree: usize) -> Result<Polynomial> {
    if x.is_empty() {
        return Err(VinoPcaError::InvalidParameter(
            "cannot fit a polynomial to empty data".to_string(),
        ));
    }
    if x.len() != y.len() {
        return Err(VinoPcaError::InvalidParameter(format!(
            "x has {} points, y has {}",
            x.len(),
            y.len()
        )));
    }
    if degree >= x.len() {
        return Err(VinoPcaError::InvalidParameter(format!(
            "polynomial degree {degree} requires more than {} points",
            x.len()
        )));
    }

    let x_min = x.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = x_max - x_min;
    let t = x.mapv(|value| {
        if span > 0.0 {
            2.0 * (value - x_min) / span - 1.0
        } else {
            0.0
        }
    });

    let mut vandermonde = Array2::ones((x.len(), degree + 1));
    for (row, &ti) in t.iter().enumerate() {
        for power in 1..=degree {
            vandermonde[[row, power]] = vandermonde[[row, power - 1]] * ti;
        }
    }

    let rhs = y.to_owned();
    let fit = vandermonde.least_squares(&rhs)?;

    Ok(Polynomial {
        coefficients: fit.solution,
        x_min,
        x_max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array1;

    fn abscissa(n: usize) -> Array1<f64> {
        Array1::from_iter((0..n).map(|index| index as f64))
    }

    #[test]
    fn recovers_a_quadratic_exactly() {
        let x = abscissa(50);
        let y = x.mapv(|value| 3.0 + 0.5 * value - 0.02 * value * value);

        let fitted = polyfit(x.view(), y.view(), 2).unwrap().evaluate(x.view());
        for (expected, actual) in y.iter().zip(fitted.iter()) {
            assert_relative_eq!(expected, actual, epsilon = 1e-9);
        }
    }

    #[test]
    fn constant_data_fits_exactly_at_any_degree() {
        let x = abscissa(30);
        let y = Array1::from_elem(30, 7.0);

        let fitted = polyfit(x.view(), y.view(), 5).unwrap().evaluate(x.view());
        for &value in fitted.iter() {
            assert_relative_eq!(value, 7.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn degree_must_be_below_point_count() {
        let x = abscissa(4);
        let y = abscissa(4);
        assert!(matches!(
            polyfit(x.view(), y.view(), 4),
            Err(VinoPcaError::InvalidParameter(_))
        ));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let x = abscissa(4);
        let y = abscissa(5);
        assert!(matches!(
            polyfit(x.view(), y.view(), 1),
            Err(VinoPcaError::InvalidParameter(_))
        ));
    }

    #[test]
    fn high_degree_fit_stays_finite() {
        let x = abscissa(200);
        let y = x.mapv(|value| (value / 30.0).sin() + 0.001 * value);

        let fitted = polyfit(x.view(), y.view(), 20).unwrap().evaluate(x.view());
        assert!(fitted.iter().all(|value| value.is_finite()));
    }
}
