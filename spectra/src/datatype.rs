use crate::error::{Result, SpectraError};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// The kind of spectra stored under a data-type tag
///
/// A corpus keeps the same sample universe under several tags; the two a
/// reduction pipeline cares about are the raw acquisitions and their
/// fluorescence-corrected counterparts.
#[derive(Default, Display, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum SpectraKind {
    /// Intensities exactly as acquired by the instrument
    #[default]
    #[strum(serialize = "raw")]
    Raw,
    /// Intensities with the fluorescence baseline subtracted
    #[strum(serialize = "fluorescence-corrected")]
    FluorescenceCorrected,
}

impl SpectraKind {
    /// Matches the tag string and returns the corresponding kind
    ///
    /// # Errors
    /// `UnknownDataType` for any tag outside the registered set.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "raw" => Ok(Self::Raw),
            "fluorescence-corrected" => Ok(Self::FluorescenceCorrected),
            _ => Err(SpectraError::UnknownDataType(tag.to_string())),
        }
    }

    /// The tag string used by repository backends
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::FluorescenceCorrected => "fluorescence-corrected",
        }
    }
}
