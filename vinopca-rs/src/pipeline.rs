//! End-to-end reduction pipeline: fetch, verify, mask, correct, decompose

use crate::correction::{BaselineConfig, MatrixCorrection, correct_matrix};
use crate::error::{Result, VinoPcaError};
use crate::labels::map_labels;
use crate::pca::{PcaFit, fit_pca};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vino_spectra::{SpectraKind, SpectralDataset, SpectralRepository, WavelengthMask};

/// First wavelength index kept by the default edge mask.
pub const DEFAULT_MASK_FIRST: usize = 200;
/// Last wavelength index kept by the default edge mask.
pub const DEFAULT_MASK_LAST: usize = 999;

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Data-type tag of the uncorrected spectra
    pub raw_tag: String,

    /// Data-type tag of the repository's corrected spectra
    pub corrected_tag: String,

    /// Wavelength sub-range fed to the decomposition; `None` keeps the full
    /// axis. The default keeps indices 200..=999, the working convention for
    /// the lab's 1044-point axis whose edges are dominated by filter
    /// roll-off; corpora on other axes should set their own range.
    pub mask: Option<WavelengthMask>,

    /// Baseline-removal settings used when correcting from raw
    pub baseline: BaselineConfig,

    /// Components to retain
    pub n_components: usize,

    /// Trust the repository's corrected matrix instead of re-estimating
    /// baselines from the raw one
    pub use_stored_corrected: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_tag: SpectraKind::Raw.to_string(),
            corrected_tag: SpectraKind::FluorescenceCorrected.to_string(),
            mask: WavelengthMask::range(DEFAULT_MASK_FIRST, DEFAULT_MASK_LAST).ok(),
            baseline: BaselineConfig::default(),
            n_components: 10,
            use_stored_corrected: false,
        }
    }
}

/// Per-sample baseline diagnostics carried into the report
#[derive(Debug, Clone, Serialize)]
pub struct CorrectionSummary {
    /// Clip-and-refit iterations per sample
    pub iterations: Vec<usize>,

    /// Convergence flag per sample
    pub converged: Vec<bool>,
}

impl CorrectionSummary {
    pub fn n_unconverged(&self) -> usize {
        self.converged.iter().filter(|&&flag| !flag).count()
    }
}

/// Everything downstream consumers need for plotting and reporting
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Sample identifiers, column-aligned with the reduced coordinates
    pub sample_ids: Vec<String>,

    /// Small-integer color key per sample, grouped by wine
    pub color_keys: Vec<usize>,

    /// The fitted decomposition
    pub pca: PcaFit,

    /// The (masked) wavelength axis the component basis is expressed on
    pub wavelengths: Array1<f64>,

    /// Baseline diagnostics; `None` when the stored corrected matrix was used
    pub correction: Option<CorrectionSummary>,
}

impl PipelineReport {
    /// Scree values: the explained-variance ratio of each retained component.
    pub fn scree_values(&self) -> &Array1<f64> {
        &self.pca.explained_variance_ratio
    }
}

/// Run the full reduction pipeline against a repository.
///
/// Fetches the raw/corrected pairing, applies the wavelength mask, obtains a
/// corrected matrix (re-estimated from raw unless
/// `config.use_stored_corrected`), fits the PCA and derives the per-sample
/// color keys.
pub fn run_pipeline<R: SpectralRepository>(
    repo: &R,
    config: &PipelineConfig,
) -> Result<PipelineReport> {
    if config.n_components == 0 {
        return Err(VinoPcaError::InvalidParameter(
            "n_components must be at least 1".to_string(),
        ));
    }

    match repo.group_summary() {
        Ok(summary) => {
            let n_samples: usize = summary.values().sum();
            info!(n_groups = summary.len(), n_samples, "sample universe");
        }
        Err(error) => debug!(%error, "group summary unavailable"),
    }

    let mut dataset = SpectralDataset::from_repository(repo, &config.raw_tag, &config.corrected_tag)?;
    if let Some(mask) = &config.mask {
        dataset.apply_mask(mask.clone())?;
    }
    info!(
        n_samples = dataset.n_samples(),
        n_wavelengths = dataset.n_wavelengths(),
        masked = config.mask.is_some(),
        "dataset ready"
    );

    let (corrected, correction) = if config.use_stored_corrected {
        (dataset.corrected().clone(), None)
    } else {
        let MatrixCorrection {
            corrected,
            iterations,
            converged,
        } = correct_matrix(dataset.raw(), &config.baseline)?;
        (
            corrected,
            Some(CorrectionSummary {
                iterations,
                converged,
            }),
        )
    };

    let pca = fit_pca(&corrected, config.n_components)?;
    info!(
        k = config.n_components,
        variance_captured = pca.explained_variance_ratio.sum(),
        "decomposition fitted"
    );

    let color_keys = map_labels(dataset.labels())?;

    Ok(PipelineReport {
        sample_ids: dataset.labels().to_vec(),
        color_keys,
        pca,
        wavelengths: dataset.wavelengths().clone(),
        correction,
    })
}
