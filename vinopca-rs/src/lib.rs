//! Fluorescence-baseline removal and PCA reduction for wine Raman spectra
//!
//! Wine spectra carry a broad fluorescence background that swamps the Raman
//! peaks; this crate removes it with an iterative modified-polynomial fit,
//! reduces the corrected spectra with a centered PCA, and keys every reduced
//! point to its originating wine for plotting. Data comes in through the
//! [`vino_spectra::SpectralRepository`] contract, so any storage backend
//! works.
//!
//! # Quick Start
//!
//! ```rust
//! use ndarray::{Array1, Array2};
//! use vino_spectra::{MemoryRepository, SpectraKind};
//! use vinopca_rs::{PipelineConfig, run_pipeline};
//!
//! # fn main() -> vinopca_rs::Result<()> {
//! let wavelengths = Array1::linspace(100.0, 200.0, 64);
//! let raw = Array2::from_shape_fn((64, 6), |(w, s)| {
//!     50.0 + w as f64 + (s % 3) as f64 * (w as f64 / 8.0).sin()
//! });
//! let labels: Vec<String> = (0..6)
//!     .map(|i| format!("{:04}-{:04}", i / 3 + 1, i % 3 + 1))
//!     .collect();
//!
//! let mut repo = MemoryRepository::new(wavelengths);
//! repo.insert(SpectraKind::Raw.as_tag(), raw.clone(), labels.clone())?;
//! repo.insert(SpectraKind::FluorescenceCorrected.as_tag(), raw, labels)?;
//!
//! let config = PipelineConfig {
//!     mask: None, // the full axis is clean in this synthetic corpus
//!     n_components: 2,
//!     ..Default::default()
//! };
//! let report = run_pipeline(&repo, &config)?;
//!
//! assert_eq!(report.pca.reduced.nrows(), 6);
//! assert_eq!(report.color_keys.len(), 6);
//! println!("scree: {:?}", report.scree_values());
//! # Ok(())
//! # }
//! ```
//!
//! The stages compose individually as well: [`subtract_baseline`] corrects a
//! single spectrum, [`correct_matrix`] a whole `[W, N]` matrix in parallel,
//! [`fit_pca`] decomposes any corrected matrix, and [`map_labels`] derives
//! color keys from identifiers alone. See `examples/basic_usage.rs` for a
//! fuller walkthrough.

pub mod correction;
pub mod error;
pub mod labels;
pub mod pca;
pub mod pipeline;
pub mod stats;

pub use correction::{
    BaselineConfig, BaselineFit, MatrixCorrection, correct_matrix, subtract_baseline,
};
pub use error::{Result, VinoPcaError};
pub use labels::map_labels;
pub use pca::{PcaFit, fit_pca};
pub use pipeline::{
    CorrectionSummary, DEFAULT_MASK_FIRST, DEFAULT_MASK_LAST, PipelineConfig, PipelineReport,
    run_pipeline,
};
