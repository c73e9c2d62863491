//! Turning user-supplied cell tags into a validated selection.

use crate::cell::CellType;
use crate::prelude::{SimError, SimResult};

/// Parses cell tags case-insensitively, skipping blank entries.
///
/// Fails on the first unknown tag, and with [`SimError::InvalidSelection`]
/// when nothing is left to generate.
pub fn parse_selection<S: AsRef<str>>(tags: &[S]) -> SimResult<Vec<CellType>> {
    let selection = tags
        .iter()
        .map(AsRef::as_ref)
        .filter(|tag| !tag.trim().is_empty())
        .map(str::parse::<CellType>)
        .collect::<SimResult<Vec<_>>>()?;

    if selection.is_empty() {
        return Err(SimError::InvalidSelection);
    }
    Ok(selection)
}

/// Keeps the first occurrence of each chemistry, preserving order.
pub fn dedupe_selection(selection: &[CellType]) -> Vec<CellType> {
    let mut unique = Vec::with_capacity(selection.len());
    for &cell in selection {
        if !unique.contains(&cell) {
            unique.push(cell);
        }
    }
    unique
}
