/// Input side of the pivot.
///
/// Submodules:
/// - `csv_source` — reads `precipitation.csv` into validated records.
/// - `fixtures` (test only) — representative CSV payloads.

pub mod csv_source;

#[cfg(test)]
pub(crate) mod fixtures;
