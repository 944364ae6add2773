/// Output side of the pivot.
///
/// Every sink receives the finished `MonthlyTables` and persists it in its
/// own format. Sinks never see records or cells, only the two matrices and
/// their labels.
///
/// Submodules:
/// - `tables` — `totals.csv` / `counts.csv`, one station per row.
/// - `bundle` — `monthdata.npz`, the matrices as a NumPy archive.
/// - `json` — optional single JSON document with matrices and labels.

pub mod bundle;
pub mod json;
pub mod tables;

use std::path::PathBuf;

use crate::logging::{log_output_summary, Reporter, Stage};
use crate::model::MonthlyTables;

pub use bundle::BundleSink;
pub use json::JsonBundleSink;
pub use tables::CsvTableSink;

/// Something that can persist the pivot result.
pub trait MatrixSink {
    /// Short name used in progress messages.
    fn name(&self) -> &str;

    /// Writes `tables`, returning the files it created.
    fn write(&self, tables: &MonthlyTables) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>>;
}

/// Hands `tables` to every sink in turn, reporting each outcome.
///
/// All sinks are attempted even if an earlier one fails. Returns the files
/// written, or the first error if any sink failed.
pub fn write_all(
    sinks: &[Box<dyn MatrixSink>],
    tables: &MonthlyTables,
    reporter: &dyn Reporter,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut written = Vec::new();
    let mut first_error = None;
    let mut successful = 0;

    for sink in sinks {
        match sink.write(tables) {
            Ok(paths) => {
                successful += 1;
                for path in &paths {
                    reporter.info(Stage::Output, &format!("✓ {} → {}", sink.name(), path.display()));
                }
                written.extend(paths);
            }
            Err(e) => {
                reporter.error(Stage::Output, &format!("{} failed: {}", sink.name(), e));
                first_error.get_or_insert(e);
            }
        }
    }

    log_output_summary(reporter, sinks.len(), successful);

    match first_error {
        Some(e) => Err(e),
        None => Ok(written),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::RecordingReporter;

    struct FailingSink;

    impl MatrixSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        fn write(&self, _tables: &MonthlyTables) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
            Err("disk full".into())
        }
    }

    #[test]
    fn test_write_all_attempts_every_sink() {
        let dir = tempfile::tempdir().unwrap();
        let sinks: Vec<Box<dyn MatrixSink>> = vec![
            Box::new(FailingSink),
            Box::new(BundleSink::new(dir.path().join("monthdata.npz"))),
        ];
        let tables = MonthlyTables::zeroed(vec![], vec![]);
        let reporter = RecordingReporter::new();

        let result = write_all(&sinks, &tables, &reporter);

        assert!(result.is_err());
        assert!(dir.path().join("monthdata.npz").exists());
        assert!(reporter.contains("failing failed: disk full"));
        assert!(reporter.contains("1/2 sinks written"));
    }
}
