//! Column identifier recovery from the log's two descriptive header rows.
//!
//! The monitoring tool writes column labels and their units on separate
//! lines. Identifiers are rebuilt as `"<label>, <unit>"` so that every
//! metric carries its unit, e.g. `"GPU1 temperature, °C"`.

use std::collections::HashSet;

use crate::error::{ReportError, Result};

/// Identifier given to column 0 (row index), whatever its raw label.
pub const INDEX_COLUMN: &str = "-";
/// Identifier given to column 1 (elapsed time), whatever its raw label.
pub const TIMESTAMP_COLUMN: &str = "timestamp";
/// Number of leading positional columns that are not metrics.
pub const POSITIONAL_COLUMNS: usize = 2;

/// Split a raw header or units line into its comma-separated fields.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.trim_end_matches(['\r', '\n']).split(',').collect()
}

/// Build unit-annotated column identifiers from a header row and a units row.
///
/// Labels and units are whitespace-trimmed. Positions 0 and 1 become
/// [`INDEX_COLUMN`] and [`TIMESTAMP_COLUMN`]; their units are ignored.
/// Fails if the two rows differ in length or if two metric identifiers
/// collide.
pub fn recover_identifiers<S: AsRef<str>>(header: &[S], units: &[S]) -> Result<Vec<String>> {
    if header.len() != units.len() {
        return Err(ReportError::Schema(format!(
            "header has {} columns but units row has {}",
            header.len(),
            units.len()
        )));
    }

    let mut identifiers = Vec::with_capacity(header.len());
    let mut seen = HashSet::new();

    for (position, (label, unit)) in header.iter().zip(units).enumerate() {
        let identifier = match position {
            0 => INDEX_COLUMN.to_string(),
            1 => TIMESTAMP_COLUMN.to_string(),
            _ => format!("{}, {}", label.as_ref().trim(), unit.as_ref().trim()),
        };
        if position >= POSITIONAL_COLUMNS && !seen.insert(identifier.clone()) {
            return Err(ReportError::Schema(format!(
                "duplicate column identifier '{identifier}' at position {position}"
            )));
        }
        identifiers.push(identifier);
    }

    Ok(identifiers)
}
