//! Group-code color keys for reduced-coordinate plots

use crate::error::Result;
use std::collections::{BTreeMap, BTreeSet};
use vino_spectra::group_code_of;

/// Map each identifier to a small integer keyed by its group code.
///
/// Codes are assigned by position in the *sorted* unique group-code set, not
/// by first occurrence, so a given sample universe always yields the same
/// assignment no matter how the acquisitions were ordered.
///
/// # Errors
/// `MalformedIdentifier` when any identifier lacks a group-code separator;
/// such keys must never be silently lumped into one group.
pub fn map_labels<S: AsRef<str>>(identifiers: &[S]) -> Result<Vec<usize>> {
    let codes = identifiers
        .iter()
        .map(|identifier| group_code_of(identifier.as_ref()))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let index: BTreeMap<&str, usize> = codes
        .iter()
        .copied()
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .enumerate()
        .map(|(slot, code)| (code, slot))
        .collect();

    Ok(codes.into_iter().map(|code| index[code]).collect())
}
