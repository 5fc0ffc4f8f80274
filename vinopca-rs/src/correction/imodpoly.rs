//! Iterative modified-polynomial fluorescence baseline removal
//!
//! Raman spectra of wine ride on a broad fluorescence background that buries
//! the sharp vibrational peaks. The background is modeled as a low-degree
//! polynomial fitted iteratively: after each fit the working curve is clipped
//! to the signal from above, so peaks stop attracting the next fit, and the
//! polynomial is refitted until the fitted curve stabilises.

use crate::error::{Result, VinoPcaError};
use crate::stats::polyfit;
use ndarray::{Array1, Array2, ArrayView1, Axis, Zip};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Baseline-estimation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Degree of the fluorescence polynomial
    pub degree: usize,

    /// Cap on the clip-and-refit loop
    pub max_iterations: usize,

    /// RMS change between successive fitted curves below which the fit is
    /// considered converged
    pub tolerance: f64,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            degree: 5,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// Outcome of one baseline estimation
#[derive(Debug, Clone)]
pub struct BaselineFit {
    /// Input spectrum with the baseline subtracted
    pub corrected: Array1<f64>,

    /// The estimated baseline; never exceeds the input at any point
    pub baseline: Array1<f64>,

    /// Clip-and-refit iterations actually run
    pub iterations: usize,

    /// Whether the RMS criterion was met before the iteration cap. A `false`
    /// here is not fatal (the last fit is still returned) but callers should
    /// log it rather than discover a degraded decomposition downstream.
    pub converged: bool,
}

/// Estimate and subtract the fluorescence baseline of one spectrum.
///
/// # Algorithm
/// 1. Fit a polynomial of `config.degree` to the spectrum by least squares.
/// 2. Clip the working curve from above: where the fit exceeds the signal,
///    keep the signal (the baseline must never exceed what it models).
/// 3. Refit the polynomial to the clipped curve.
/// 4. Repeat 2-3 until the RMS change between successive fitted curves drops
///    below `config.tolerance`, or `config.max_iterations` is reached.
/// 5. Return the input minus the final baseline, the baseline itself clamped
///    to the input, and the convergence diagnostics.
///
/// A constant spectrum is fitted exactly on the first pass and converges
/// immediately with a (near-)zero corrected spectrum.
///
/// # Errors
/// `InvalidParameter` when the spectrum is empty or `config.degree` is not
/// smaller than the number of points.
pub fn subtract_baseline(spectrum: ArrayView1<f64>, config: &BaselineConfig) -> Result<BaselineFit> {
    if spectrum.is_empty() {
        return Err(VinoPcaError::InvalidParameter(
            "cannot correct an empty spectrum".to_string(),
        ));
    }

    let abscissa = Array1::from_iter((0..spectrum.len()).map(|index| index as f64));
    let mut fitted = polyfit(abscissa.view(), spectrum, config.degree)?.evaluate(abscissa.view());

    let mut iterations = 0;
    let mut converged = false;
    while iterations < config.max_iterations {
        iterations += 1;

        let clipped = Zip::from(spectrum)
            .and(&fitted)
            .map_collect(|&signal, &fit| signal.min(fit));
        let refitted =
            polyfit(abscissa.view(), clipped.view(), config.degree)?.evaluate(abscissa.view());

        let rms = rms_change(refitted.view(), fitted.view());
        fitted = refitted;
        if rms < config.tolerance {
            converged = true;
            break;
        }
    }

    let baseline = Zip::from(spectrum)
        .and(&fitted)
        .map_collect(|&signal, &fit| fit.min(signal));
    let corrected = Zip::from(spectrum)
        .and(&baseline)
        .map_collect(|&signal, &floor| signal - floor);

    Ok(BaselineFit {
        corrected,
        baseline,
        iterations,
        converged,
    })
}

fn rms_change(current: ArrayView1<f64>, previous: ArrayView1<f64>) -> f64 {
    let sum_of_squares = Zip::from(current)
        .and(previous)
        .fold(0.0, |acc, &a, &b| acc + (a - b) * (a - b));
    (sum_of_squares / current.len() as f64).sqrt()
}

/// Per-sample correction of a whole `[W, N]` matrix
#[derive(Debug, Clone)]
pub struct MatrixCorrection {
    /// `[W, N]`, column i corrected independently
    pub corrected: Array2<f64>,

    /// Iterations run per sample column
    pub iterations: Vec<usize>,

    /// Convergence flag per sample column
    pub converged: Vec<bool>,
}

impl MatrixCorrection {
    pub fn n_unconverged(&self) -> usize {
        self.converged.iter().filter(|&&flag| !flag).count()
    }
}

/// Correct every column (sample) of `matrix` independently, in parallel.
///
/// Columns share no state, so the work is distributed across the rayon pool.
/// Samples that hit the iteration cap are reported through the per-column
/// flags and a single warning.
pub fn correct_matrix(matrix: &Array2<f64>, config: &BaselineConfig) -> Result<MatrixCorrection> {
    let fits: Vec<BaselineFit> = matrix
        .axis_iter(Axis(1))
        .into_par_iter()
        .map(|column| subtract_baseline(column, config))
        .collect::<Result<_>>()?;

    let mut corrected = Array2::zeros(matrix.raw_dim());
    for (index, fit) in fits.iter().enumerate() {
        corrected.column_mut(index).assign(&fit.corrected);
    }
    let iterations = fits.iter().map(|fit| fit.iterations).collect();
    let converged: Vec<bool> = fits.iter().map(|fit| fit.converged).collect();

    let n_unconverged = converged.iter().filter(|&&flag| !flag).count();
    if n_unconverged > 0 {
        warn!(
            n_unconverged,
            n_samples = converged.len(),
            "baseline fits hit the iteration cap"
        );
    }

    Ok(MatrixCorrection {
        corrected,
        iterations,
        converged,
    })
}
