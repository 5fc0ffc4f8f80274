use crate::error::{Result, SpectraError};
use crate::identifier::group_code_of;
use crate::mask::WavelengthMask;
use crate::repository::SpectralRepository;
use itertools::Itertools;
use ndarray::{Array1, Array2, Axis};
use tracing::info;

/// Which owned matrix an operation reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    Raw,
    Corrected,
}

/// The raw and fluorescence-corrected spectra of one sample universe
///
/// Construction fetches both variants from a repository and verifies once
/// that they describe the same samples in the same column order; every later
/// accessor relies on that check. The matrices and axis are immutable after
/// construction: masking caches narrowed copies and leaves the originals
/// retrievable through the `unmasked_*` accessors, so the two views are never
/// conflated.
#[derive(Debug, Clone)]
pub struct SpectralDataset {
    wavelengths: Array1<f64>,
    raw: Array2<f64>,
    corrected: Array2<f64>,
    labels: Vec<String>,
    masked: Option<MaskedView>,
}

#[derive(Debug, Clone)]
struct MaskedView {
    mask: WavelengthMask,
    wavelengths: Array1<f64>,
    raw: Array2<f64>,
    corrected: Array2<f64>,
}

impl SpectralDataset {
    /// Fetch the raw and corrected matrices for the same logical samples and
    /// join them into one dataset.
    ///
    /// # Errors
    /// `DataInconsistency` when the two label sequences differ (the corpus is
    /// only partially corrected, or the fetches are ordered differently), or
    /// when any matrix violates the shape contract; repository errors pass
    /// through.
    pub fn from_repository<R: SpectralRepository>(
        repo: &R,
        raw_type: &str,
        corrected_type: &str,
    ) -> Result<Self> {
        let wavelengths = repo.wavelengths()?;
        let (raw, raw_labels) = repo.spectra(raw_type)?;
        let (corrected, corrected_labels) = repo.spectra(corrected_type)?;

        if raw_labels != corrected_labels {
            return Err(SpectraError::DataInconsistency(
                "not all spectra are corrected: raw and corrected label sequences differ"
                    .to_string(),
            ));
        }

        let dataset = Self::from_parts(wavelengths, raw, corrected, raw_labels)?;
        info!(
            n_wavelengths = dataset.wavelengths.len(),
            n_samples = dataset.labels.len(),
            raw_type,
            corrected_type,
            "loaded spectral dataset"
        );
        Ok(dataset)
    }

    /// Assemble a dataset from already-fetched parts, applying the same
    /// validation as [`SpectralDataset::from_repository`].
    pub fn from_parts(
        wavelengths: Array1<f64>,
        raw: Array2<f64>,
        corrected: Array2<f64>,
        labels: Vec<String>,
    ) -> Result<Self> {
        if wavelengths
            .iter()
            .tuple_windows()
            .any(|(previous, next)| next <= previous)
        {
            return Err(SpectraError::DataInconsistency(
                "wavelength axis is not strictly increasing".to_string(),
            ));
        }
        for (name, matrix) in [("raw", &raw), ("corrected", &corrected)] {
            if matrix.nrows() != wavelengths.len() {
                return Err(SpectraError::DataInconsistency(format!(
                    "{name} matrix has {} wavelength rows, axis has {} points",
                    matrix.nrows(),
                    wavelengths.len()
                )));
            }
            if matrix.ncols() != labels.len() {
                return Err(SpectraError::DataInconsistency(format!(
                    "{name} matrix has {} sample columns, {} labels supplied",
                    matrix.ncols(),
                    labels.len()
                )));
            }
        }

        Ok(Self {
            wavelengths,
            raw,
            corrected,
            labels,
            masked: None,
        })
    }

    /// Narrow the wavelength axis and every owned matrix to `mask`.
    ///
    /// The mask is always resolved against the unmasked axis, so re-applying
    /// the same mask yields the same view. Narrowed copies are cached; the
    /// originals stay untouched behind the `unmasked_*` accessors.
    pub fn apply_mask(&mut self, mask: WavelengthMask) -> Result<()> {
        let view = MaskedView {
            wavelengths: mask.select_axis(&self.wavelengths)?,
            raw: mask.select_rows(&self.raw)?,
            corrected: mask.select_rows(&self.corrected)?,
            mask,
        };
        self.masked = Some(view);
        Ok(())
    }

    /// Drop the mask and return to the full axis.
    pub fn clear_mask(&mut self) {
        self.masked = None;
    }

    pub fn mask(&self) -> Option<&WavelengthMask> {
        self.masked.as_ref().map(|view| &view.mask)
    }

    /// Current wavelength axis (masked view when a mask is applied).
    pub fn wavelengths(&self) -> &Array1<f64> {
        self.masked
            .as_ref()
            .map_or(&self.wavelengths, |view| &view.wavelengths)
    }

    /// Current raw matrix `[W, N]` (masked view when a mask is applied).
    pub fn raw(&self) -> &Array2<f64> {
        self.masked.as_ref().map_or(&self.raw, |view| &view.raw)
    }

    /// Current corrected matrix `[W, N]` (masked view when a mask is applied).
    pub fn corrected(&self) -> &Array2<f64> {
        self.masked
            .as_ref()
            .map_or(&self.corrected, |view| &view.corrected)
    }

    pub fn matrix(&self, kind: MatrixKind) -> &Array2<f64> {
        match kind {
            MatrixKind::Raw => self.raw(),
            MatrixKind::Corrected => self.corrected(),
        }
    }

    pub fn unmasked_wavelengths(&self) -> &Array1<f64> {
        &self.wavelengths
    }

    pub fn unmasked_raw(&self) -> &Array2<f64> {
        &self.raw
    }

    pub fn unmasked_corrected(&self) -> &Array2<f64> {
        &self.corrected
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    /// Points on the current (possibly masked) axis.
    pub fn n_wavelengths(&self) -> usize {
        self.wavelengths().len()
    }

    /// Per-wavelength mean across the samples of each group code
    ///
    /// Returns a `[W_current, n_groups]` matrix in sorted-groupCode order.
    /// Groups of size 1 are kept as-is.
    ///
    /// # Errors
    /// `MalformedIdentifier` when any label lacks a group-code separator.
    pub fn group_average(&self, kind: MatrixKind) -> Result<Array2<f64>> {
        let codes: Vec<&str> = self
            .labels
            .iter()
            .map(|label| group_code_of(label))
            .collect::<Result<_>>()?;
        let groups: Vec<&str> = codes.iter().copied().unique().sorted().collect();

        let matrix = self.matrix(kind);
        let mut averages = Array2::zeros((matrix.nrows(), groups.len()));
        for (slot, group) in groups.iter().enumerate() {
            let members: Vec<usize> = codes.iter().positions(|code| code == group).collect();
            let mean = matrix
                .select(Axis(1), &members)
                .mean_axis(Axis(1))
                .ok_or_else(|| {
                    SpectraError::DataInconsistency(format!("group {group} has no samples"))
                })?;
            averages.column_mut(slot).assign(&mean);
        }
        Ok(averages)
    }
}
