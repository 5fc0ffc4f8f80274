use crate::datatype::SpectraKind;
use crate::error::{Result, SpectraError};
use crate::identifier::group_code_of;
use ndarray::{Array1, Array2};
use std::collections::BTreeMap;
use tracing::debug;

/// Storage-side contract for spectral corpora
///
/// Implement this trait on your storage backend (SQL, file-backed, remote) to
/// feed datasets and pipelines. Every matrix/label pair a backend hands out
/// must be rectangular, `[W, N]` with W matching the wavelength axis, and
/// column-aligned with its labels; [`crate::SpectralDataset`] re-verifies the
/// alignment across data types once at construction.
pub trait SpectralRepository {
    /// The wavelength axis shared by every spectrum in the corpus, in nm,
    /// strictly increasing.
    fn wavelengths(&self) -> Result<Array1<f64>>;

    /// The `[W, N]` intensity matrix and parallel sample labels stored under
    /// `data_type`.
    ///
    /// # Errors
    /// `UnknownDataType` when `data_type` is not among the registered tags.
    fn spectra(&self, data_type: &str) -> Result<(Array2<f64>, Vec<String>)>;

    /// Number of acquisitions per group code, e.g. for corpus summaries.
    fn group_summary(&self) -> Result<BTreeMap<String, usize>>;
}

/// In-memory repository for tests, examples and small ad-hoc corpora
///
/// Registered matrices are validated against the axis and their labels at
/// insertion, so anything fetched back already satisfies the shape contract.
#[derive(Debug, Default, Clone)]
pub struct MemoryRepository {
    wavelengths: Array1<f64>,
    sets: BTreeMap<String, (Array2<f64>, Vec<String>)>,
}

impl MemoryRepository {
    pub fn new(wavelengths: Array1<f64>) -> Self {
        Self {
            wavelengths,
            sets: BTreeMap::new(),
        }
    }

    /// Register a matrix/label pair under a data-type tag, replacing any
    /// previous registration for that tag.
    ///
    /// # Errors
    /// `DataInconsistency` when the matrix does not match the axis length or
    /// the label count.
    pub fn insert(&mut self, data_type: &str, matrix: Array2<f64>, labels: Vec<String>) -> Result<()> {
        if matrix.nrows() != self.wavelengths.len() {
            return Err(SpectraError::DataInconsistency(format!(
                "matrix has {} wavelength rows, axis has {} points",
                matrix.nrows(),
                self.wavelengths.len()
            )));
        }
        if matrix.ncols() != labels.len() {
            return Err(SpectraError::DataInconsistency(format!(
                "matrix has {} sample columns, {} labels supplied",
                matrix.ncols(),
                labels.len()
            )));
        }
        debug!(data_type, n_samples = labels.len(), "registered spectra");
        self.sets.insert(data_type.to_string(), (matrix, labels));
        Ok(())
    }

    /// Registered data-type tags, sorted.
    pub fn data_types(&self) -> Vec<String> {
        self.sets.keys().cloned().collect()
    }
}

impl SpectralRepository for MemoryRepository {
    fn wavelengths(&self) -> Result<Array1<f64>> {
        Ok(self.wavelengths.clone())
    }

    fn spectra(&self, data_type: &str) -> Result<(Array2<f64>, Vec<String>)> {
        self.sets
            .get(data_type)
            .cloned()
            .ok_or_else(|| SpectraError::UnknownDataType(data_type.to_string()))
    }

    fn group_summary(&self) -> Result<BTreeMap<String, usize>> {
        // All registered sets share one sample universe; prefer the raw one.
        let labels = match self
            .sets
            .get(SpectraKind::Raw.as_tag())
            .or_else(|| self.sets.values().next())
        {
            Some((_, labels)) => labels,
            None => return Ok(BTreeMap::new()),
        };

        let mut summary = BTreeMap::new();
        for label in labels {
            let group = group_code_of(label)?;
            *summary.entry(group.to_string()).or_insert(0) += 1;
        }
        Ok(summary)
    }
}
