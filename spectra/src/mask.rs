use crate::error::{Result, SpectraError};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// A sub-selection of wavelength-axis indices
///
/// Used to exclude low-quality edge regions of the axis before a
/// decomposition. A mask is resolved once and applied to the axis and every
/// matrix of a dataset consistently; it always addresses indices of the
/// unmasked axis, so applying the same mask twice selects the same points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WavelengthMask {
    indices: Vec<usize>,
}

impl WavelengthMask {
    /// Contiguous mask keeping indices `first..=last`.
    ///
    /// # Errors
    /// `InvalidParameter` when `first > last`.
    pub fn range(first: usize, last: usize) -> Result<Self> {
        if first > last {
            return Err(SpectraError::InvalidParameter(format!(
                "mask range start {first} exceeds end {last}"
            )));
        }
        Ok(Self {
            indices: (first..=last).collect(),
        })
    }

    /// Boolean mask keeping the indices flagged `true`.
    ///
    /// # Errors
    /// `InvalidParameter` when no index is kept.
    pub fn from_flags(flags: &[bool]) -> Result<Self> {
        let indices: Vec<usize> = flags
            .iter()
            .enumerate()
            .filter_map(|(index, &keep)| keep.then_some(index))
            .collect();
        if indices.is_empty() {
            return Err(SpectraError::InvalidParameter(
                "mask keeps no wavelengths".to_string(),
            ));
        }
        Ok(Self { indices })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Kept indices of the unmasked axis, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Narrow a wavelength axis to the masked indices.
    pub fn select_axis(&self, wavelengths: &Array1<f64>) -> Result<Array1<f64>> {
        self.check_bounds(wavelengths.len())?;
        Ok(wavelengths.select(Axis(0), &self.indices))
    }

    /// Narrow the wavelength (row) dimension of a `[W, N]` matrix.
    pub fn select_rows(&self, matrix: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_bounds(matrix.nrows())?;
        Ok(matrix.select(Axis(0), &self.indices))
    }

    fn check_bounds(&self, axis_len: usize) -> Result<()> {
        match self.indices.last() {
            Some(&max) if max >= axis_len => Err(SpectraError::InvalidParameter(format!(
                "mask index {max} out of range for a {axis_len}-point wavelength axis"
            ))),
            _ => Ok(()),
        }
    }
}
