use crate::error::{Result, SpectraError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?<group>[^-]+)-(?<acquisition>\d+)$").expect("valid pattern"));

/// A sample identifier of the form `{groupCode}-{sampleIndex}`, e.g. `0002-0001`
///
/// The group code names the source bottle/wine; the index enumerates repeated
/// acquisitions of that bottle. Identifiers double as join keys between the
/// data-type variants of a corpus and as the grouping key for coloring and
/// per-wine statistics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SampleId {
    /// Key of the originating wine/bottle
    pub group_code: String,
    /// 1-based acquisition number within the group
    pub acquisition: u32,
}

impl SampleId {
    pub fn new(group_code: impl Into<String>, acquisition: u32) -> Self {
        Self {
            group_code: group_code.into(),
            acquisition,
        }
    }
}

impl FromStr for SampleId {
    type Err = SpectraError;

    fn from_str(s: &str) -> Result<Self> {
        let captures = IDENTIFIER_PATTERN
            .captures(s)
            .ok_or_else(|| SpectraError::MalformedIdentifier(s.to_string()))?;
        let acquisition = captures["acquisition"]
            .parse()
            .map_err(|_| SpectraError::MalformedIdentifier(s.to_string()))?;
        Ok(Self {
            group_code: captures["group"].to_string(),
            acquisition,
        })
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:04}", self.group_code, self.acquisition)
    }
}

/// Extract the group-code prefix of an identifier without parsing the index.
///
/// # Errors
/// `MalformedIdentifier` when the identifier has no separator or an empty
/// group code; separator-less keys must never be silently grouped together.
pub fn group_code_of(identifier: &str) -> Result<&str> {
    match identifier.split_once('-') {
        Some((group, _)) if !group.is_empty() => Ok(group),
        _ => Err(SpectraError::MalformedIdentifier(identifier.to_string())),
    }
}
