use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpectraError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Data inconsistency: {0}")]
    DataInconsistency(String),

    #[error("Malformed sample identifier: {0}")]
    MalformedIdentifier(String),

    #[error("Unknown data type: {0}")]
    UnknownDataType(String),
}

pub type Result<T> = std::result::Result<T, SpectraError>;
