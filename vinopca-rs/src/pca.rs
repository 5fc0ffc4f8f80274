//! Centered principal component analysis of corrected spectra
//!
//! Spectra arrive wavelength-major `[W, N]`; samples become rows before the
//! decomposition. The data is centered but not scaled: intensities share one
//! physical unit, and per-wavelength scaling would inflate the flat, noisy
//! regions relative to the peaks that actually discriminate wines.

use crate::error::{Result, VinoPcaError};
use ndarray::{Array1, Array2, Axis, s};
use ndarray_linalg::SVD;
use serde::Serialize;

/// A fitted PCA model
///
/// All fields are derived together by [`fit_pca`]; refitting produces a
/// fresh value, so no partially-updated state is ever observable.
#[derive(Debug, Clone, Serialize)]
pub struct PcaFit {
    /// `[N, k]` projection of the training samples onto the retained
    /// components
    pub reduced: Array2<f64>,

    /// `[W, k]` orthonormal component directions. Column signs are not
    /// stable across fits; compare directions up to sign.
    pub components: Array2<f64>,

    /// Length k, non-increasing, non-negative
    pub singular_values: Array1<f64>,

    /// Variance captured by each retained component
    pub explained_variance: Array1<f64>,

    /// Fraction of total variance per retained component, non-increasing;
    /// sums to 1 only when k reaches the full rank of the centered data
    pub explained_variance_ratio: Array1<f64>,

    /// Per-wavelength mean of the training samples
    pub mean: Array1<f64>,
}

impl PcaFit {
    pub fn n_components(&self) -> usize {
        self.singular_values.len()
    }

    /// Project additional `[W, M]` spectra with the stored mean and basis.
    ///
    /// # Errors
    /// `InvalidParameter` when the wavelength dimension differs from the
    /// training data.
    pub fn transform(&self, matrix: &Array2<f64>) -> Result<Array2<f64>> {
        if matrix.nrows() != self.components.nrows() {
            return Err(VinoPcaError::InvalidParameter(format!(
                "matrix has {} wavelength rows, model was fitted on {}",
                matrix.nrows(),
                self.components.nrows()
            )));
        }
        let mut samples = matrix.t().to_owned();
        samples -= &self.mean;
        Ok(samples.dot(&self.components))
    }
}

/// Fit a centered (unscaled) PCA over `matrix` `[W, N]`, retaining `k`
/// components.
///
/// # Errors
/// `InvalidParameter` when `k` is outside `1..=min(N, W)` or fewer than two
/// samples are supplied; decomposition failures pass through as `Linalg`.
pub fn fit_pca(matrix: &Array2<f64>, k: usize) -> Result<PcaFit> {
    let n_samples = matrix.ncols();
    let n_features = matrix.nrows();
    let max_k = n_samples.min(n_features);

    if n_samples < 2 {
        return Err(VinoPcaError::InvalidParameter(format!(
            "PCA requires at least 2 samples, got {n_samples}"
        )));
    }
    if k == 0 || k > max_k {
        return Err(VinoPcaError::InvalidParameter(format!(
            "k = {k} outside 1..={max_k} for a {n_features}x{n_samples} matrix"
        )));
    }

    let mut samples = matrix.t().to_owned();
    let mean = samples
        .mean_axis(Axis(0))
        .ok_or_else(|| VinoPcaError::Numeric("mean of an empty sample axis".to_string()))?;
    samples -= &mean;

    let (_, sigma, vt) = samples.svd(false, true)?;
    let vt = vt.ok_or_else(|| VinoPcaError::Numeric("SVD returned no right factor".to_string()))?;

    let components = vt.slice(s![..k, ..]).t().to_owned();
    let reduced = samples.dot(&components);
    let singular_values = sigma.slice(s![..k]).to_owned();

    let denominator = (n_samples - 1) as f64;
    let explained_variance = singular_values.mapv(|value| value * value / denominator);
    let total_variance: f64 = sigma.iter().map(|value| value * value / denominator).sum();
    let explained_variance_ratio = if total_variance > 0.0 {
        explained_variance.mapv(|variance| variance / total_variance)
    } else {
        Array1::zeros(k)
    };

    Ok(PcaFit {
        reduced,
        components,
        singular_values,
        explained_variance,
        explained_variance_ratio,
        mean,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Samples spread along one known spectral direction plus a little noise
    /// on a second, orthogonal one.
    fn two_direction_matrix(n_features: usize, n_samples: usize) -> (Array2<f64>, Array1<f64>) {
        let main: Array1<f64> = Array1::from_iter(
            (0..n_features).map(|index| (index as f64 / n_features as f64 * 6.0).sin()),
        );
        let main = &main / main.dot(&main).sqrt();
        let minor: Array1<f64> = Array1::from_iter(
            (0..n_features).map(|index| (index as f64 / n_features as f64 * 11.0).cos()),
        );
        let minor = &minor / minor.dot(&minor).sqrt();

        let mut matrix = Array2::zeros((n_features, n_samples));
        for sample in 0..n_samples {
            let along = (sample as f64 - n_samples as f64 / 2.0) * 10.0;
            let across = if sample % 2 == 0 { 0.3 } else { -0.3 };
            let spectrum = &main * along + &minor * across;
            matrix.column_mut(sample).assign(&spectrum);
        }
        (matrix, main)
    }

    #[test]
    fn shapes_follow_the_input() {
        let (matrix, _) = two_direction_matrix(30, 8);
        let fit = fit_pca(&matrix, 3).unwrap();

        assert_eq!(fit.reduced.dim(), (8, 3));
        assert_eq!(fit.components.dim(), (30, 3));
        assert_eq!(fit.singular_values.len(), 3);
        assert_eq!(fit.explained_variance_ratio.len(), 3);
    }

    #[test]
    fn first_component_recovers_the_dominant_direction_up_to_sign() {
        let (matrix, main) = two_direction_matrix(40, 10);
        let fit = fit_pca(&matrix, 2).unwrap();

        let alignment = fit.components.column(0).dot(&main).abs();
        assert!(alignment > 0.99, "alignment {alignment} too low");
    }

    #[test]
    fn components_are_unit_norm() {
        let (matrix, _) = two_direction_matrix(25, 6);
        let fit = fit_pca(&matrix, 2).unwrap();

        for column in fit.components.columns() {
            assert_relative_eq!(column.dot(&column).sqrt(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn variance_ratios_are_ordered_and_bounded() {
        let (matrix, _) = two_direction_matrix(30, 9);
        let fit = fit_pca(&matrix, 4).unwrap();

        let ratios = &fit.explained_variance_ratio;
        for window in 0..ratios.len() - 1 {
            assert!(ratios[window] >= ratios[window + 1]);
        }
        assert!(ratios.iter().all(|&ratio| (0.0..=1.0).contains(&ratio)));
        assert!(ratios.sum() <= 1.0 + 1e-9);
    }

    #[test]
    fn full_rank_ratios_sum_to_one() {
        let (matrix, _) = two_direction_matrix(5, 4);
        let fit = fit_pca(&matrix, 4).unwrap();
        assert_relative_eq!(fit.explained_variance_ratio.sum(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn transform_reproduces_training_projection() {
        let (matrix, _) = two_direction_matrix(30, 8);
        let fit = fit_pca(&matrix, 2).unwrap();

        let projected = fit.transform(&matrix).unwrap();
        for (expected, actual) in fit.reduced.iter().zip(projected.iter()) {
            assert_relative_eq!(expected, actual, epsilon = 1e-9);
        }
    }

    #[test]
    fn invalid_k_is_rejected() {
        let (matrix, _) = two_direction_matrix(30, 8);
        assert!(matches!(
            fit_pca(&matrix, 0),
            Err(VinoPcaError::InvalidParameter(_))
        ));
        assert!(matches!(
            fit_pca(&matrix, 9),
            Err(VinoPcaError::InvalidParameter(_))
        ));
    }

    #[test]
    fn single_sample_is_rejected() {
        let matrix = Array2::zeros((10, 1));
        assert!(matches!(
            fit_pca(&matrix, 1),
            Err(VinoPcaError::InvalidParameter(_))
        ));
    }
}
