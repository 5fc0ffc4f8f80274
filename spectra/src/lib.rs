//! Data model for wine Raman spectroscopy corpora
//!
//! A corpus is a set of spectra acquired on a shared wavelength axis, stored
//! under data-type tags (`raw`, `fluorescence-corrected`, ...) by some storage
//! backend. This crate defines the [`SpectralRepository`] contract that
//! backends implement, the sample-identifier and wavelength-mask value types,
//! and [`SpectralDataset`], which joins the raw and corrected variants of one
//! sample universe and verifies they stay aligned.
//!
//! # Quick Start
//!
//! ```rust
//! use ndarray::{array, Array2};
//! use vino_spectra::{MemoryRepository, SpectralDataset, WavelengthMask};
//!
//! # fn main() -> vino_spectra::Result<()> {
//! let mut repo = MemoryRepository::new(array![100.0, 101.0, 102.0, 103.0]);
//! let matrix = Array2::from_shape_fn((4, 2), |(w, s)| (w + 4 * s) as f64);
//! let labels = vec!["0001-0001".to_string(), "0002-0001".to_string()];
//! repo.insert("raw", matrix.clone(), labels.clone())?;
//! repo.insert("fluorescence-corrected", matrix, labels)?;
//!
//! let mut dataset = SpectralDataset::from_repository(&repo, "raw", "fluorescence-corrected")?;
//! dataset.apply_mask(WavelengthMask::range(1, 2)?)?;
//! assert_eq!(dataset.n_wavelengths(), 2);
//! assert_eq!(dataset.unmasked_wavelengths().len(), 4);
//! # Ok(())
//! # }
//! ```

pub use dataset::{MatrixKind, SpectralDataset};
pub use datatype::SpectraKind;
pub use error::{Result, SpectraError};
pub use identifier::{SampleId, group_code_of};
pub use mask::WavelengthMask;
pub use repository::{MemoryRepository, SpectralRepository};

pub mod dataset;
pub mod datatype;
pub mod error;
pub mod identifier;
pub mod mask;
pub mod repository;

/// Group-code portion of a sample identifier; names the originating wine/bottle.
pub type GroupCode = String;
/// Number of acquisitions attributed to one group.
pub type SampleCount = usize;
