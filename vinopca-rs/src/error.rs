use thiserror::Error;
use vino_spectra::SpectraError;

#[derive(Error, Debug)]
pub enum VinoPcaError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Spectra(#[from] SpectraError),

    #[error("Linear algebra failure: {0}")]
    Linalg(#[from] ndarray_linalg::error::LinalgError),

    #[error("Numerical failure: {0}")]
    Numeric(String),
}

pub type Result<T> = std::result::Result<T, VinoPcaError>;
