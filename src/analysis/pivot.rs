/// Station x month pivot.
///
/// Turns records (or pre-aggregated cells) into the dense `MonthlyTables`
/// pair. Two strategies are provided and must agree:
///
/// - `GroupBy` aggregates into a keyed map first, then looks every
///   (station, month) pair up while filling the matrices.
/// - `Indexed` assigns each station and month a dense integer index up
///   front and accumulates straight into zeroed arrays.
///
/// Unobserved pairs are zero in both matrices under either strategy.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::analysis::aggregate::{aggregate, labels_from_cells, CellMap};
use crate::analysis::months::month_label;
use crate::logging::{Reporter, Stage};
use crate::model::{MonthLabel, MonthlyTables, PrecipRecord};

// ---------------------------------------------------------------------------
// Strategy selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    #[default]
    GroupBy,
    Indexed,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::GroupBy => write!(f, "group-by"),
            Strategy::Indexed => write!(f, "indexed"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "group-by" | "groupby" => Ok(Strategy::GroupBy),
            "indexed" | "loops" => Ok(Strategy::Indexed),
            other => Err(format!(
                "unknown strategy '{}' (expected 'group-by' or 'indexed')",
                other
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Fills dense totals/counts matrices from aggregated cells.
///
/// `stations` and `months` must be sorted; they become the row and column
/// labels unchanged. Pairs with no cell are left at zero. Either list may
/// be empty, giving a zero-row or zero-column result.
pub fn assemble(cells: &CellMap, stations: &[String], months: &[MonthLabel]) -> MonthlyTables {
    let mut tables = MonthlyTables::zeroed(stations.to_vec(), months.to_vec());

    for (row, station) in stations.iter().enumerate() {
        for (col, month) in months.iter().enumerate() {
            if let Some(cell) = cells.get(&(station.clone(), month.clone())) {
                tables.totals[[row, col]] = cell.sum_precipitation;
                tables.counts[[row, col]] = cell.observation_count;
            }
        }
    }

    tables
}

/// Sorted distinct station names and month labels in `records`.
pub fn station_and_month_sets(records: &[PrecipRecord]) -> (Vec<String>, Vec<MonthLabel>) {
    let mut stations = BTreeSet::new();
    let mut months = BTreeSet::new();
    for record in records {
        stations.insert(record.station());
        months.insert(month_label(&record.date()));
    }
    (
        stations.into_iter().map(str::to_string).collect(),
        months.into_iter().collect(),
    )
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Group-by strategy: aggregate into a keyed map, then assemble.
pub fn pivot_grouped(records: &[PrecipRecord]) -> MonthlyTables {
    let cells = aggregate(records);
    let (stations, months) = labels_from_cells(&cells);
    assemble(&cells, &stations, &months)
}

/// Indexed strategy: dense row/column lookup tables and indexed addition.
pub fn pivot_indexed(records: &[PrecipRecord]) -> MonthlyTables {
    let (stations, months) = station_and_month_sets(records);

    let station_to_row: HashMap<String, usize> = stations
        .iter()
        .enumerate()
        .map(|(i, s)| (s.clone(), i))
        .collect();
    let month_to_col: HashMap<MonthLabel, usize> = months
        .iter()
        .enumerate()
        .map(|(i, m)| (m.clone(), i))
        .collect();

    let mut tables = MonthlyTables::zeroed(stations, months);

    for record in records {
        let row = station_to_row[record.station()];
        let col = month_to_col[&month_label(&record.date())];
        tables.totals[[row, col]] += record.precipitation();
        tables.counts[[row, col]] += 1;
    }

    tables
}

/// Pivots `records` into monthly totals and counts with the chosen strategy.
pub fn pivot_months(records: &[PrecipRecord], strategy: Strategy) -> MonthlyTables {
    match strategy {
        Strategy::GroupBy => pivot_grouped(records),
        Strategy::Indexed => pivot_indexed(records),
    }
}

/// `pivot_months` plus progress reporting: record count, strategy, result
/// shape, and a preview of the first `preview_rows` stations at debug level.
pub fn run_pivot(
    records: &[PrecipRecord],
    strategy: Strategy,
    preview_rows: usize,
    reporter: &dyn Reporter,
) -> MonthlyTables {
    reporter.info(
        Stage::Aggregate,
        &format!("Pivoting {} records ({} strategy)...", records.len(), strategy),
    );

    let tables = pivot_months(records, strategy);
    let (rows, cols) = tables.shape();

    if tables.is_empty() {
        reporter.warn(Stage::Aggregate, "No station/month combinations found");
    } else {
        reporter.info(
            Stage::Aggregate,
            &format!("✓ {} stations x {} months", rows, cols),
        );
    }

    if preview_rows > 0 && !tables.is_empty() {
        reporter.debug(
            Stage::Aggregate,
            &format!("Monthly totals:\n{}", tables.preview_totals(preview_rows)),
        );
        reporter.debug(
            Stage::Aggregate,
            &format!("Monthly counts:\n{}", tables.preview_counts(preview_rows)),
        );
    }

    tables
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, RecordingReporter};
    use chrono::NaiveDate;
    use ndarray::array;

    fn record(station: &str, date: &str, precip: f64) -> PrecipRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        PrecipRecord::new(station, date, precip, 0).unwrap()
    }

    fn scenario() -> Vec<PrecipRecord> {
        vec![
            record("A", "2021-01-05", 1.0),
            record("A", "2021-01-10", 2.0),
            record("B", "2021-02-01", 5.0),
        ]
    }

    fn month_strs(tables: &MonthlyTables) -> Vec<&str> {
        tables.months.iter().map(|m| m.as_str()).collect()
    }

    // --- Scenarios -----------------------------------------------------------

    #[test]
    fn test_pivot_scenario_with_both_strategies() {
        for strategy in [Strategy::GroupBy, Strategy::Indexed] {
            let tables = pivot_months(&scenario(), strategy);
            assert_eq!(tables.stations, vec!["A".to_string(), "B".to_string()]);
            assert_eq!(month_strs(&tables), vec!["2021-01", "2021-02"]);
            assert_eq!(tables.totals, array![[3.0, 0.0], [0.0, 5.0]], "{}", strategy);
            assert_eq!(tables.counts, array![[2, 0], [0, 1]], "{}", strategy);
        }
    }

    #[test]
    fn test_pivot_empty_input_gives_zero_by_zero() {
        for strategy in [Strategy::GroupBy, Strategy::Indexed] {
            let tables = pivot_months(&[], strategy);
            assert!(tables.stations.is_empty());
            assert!(tables.months.is_empty());
            assert_eq!(tables.totals.dim(), (0, 0));
            assert_eq!(tables.counts.dim(), (0, 0));
        }
    }

    #[test]
    fn test_isolated_record_leaves_rest_of_row_zero() {
        let mut records = scenario();
        records.push(record("C", "2021-03-15", 0.7));
        let tables = pivot_months(&records, Strategy::GroupBy);

        let row = tables.station_row("C").unwrap();
        assert_eq!(tables.totals.row(row).to_vec(), vec![0.0, 0.0, 0.7]);
        assert_eq!(tables.counts.row(row).to_vec(), vec![0, 0, 1]);
    }

    // --- Ordering ------------------------------------------------------------

    #[test]
    fn test_rows_and_columns_strictly_increasing() {
        let records = vec![
            record("Vancouver", "2016-12-01", 1.0),
            record("Calgary", "2016-02-01", 1.0),
            record("Vancouver", "2015-12-01", 1.0),
            record("Atlanta", "2016-01-09", 1.0),
        ];
        let tables = pivot_months(&records, Strategy::Indexed);
        assert!(tables.stations.windows(2).all(|w| w[0] < w[1]));
        assert!(tables.months.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(month_strs(&tables), vec!["2015-12", "2016-01", "2016-02", "2016-12"]);
    }

    // --- Assembly ------------------------------------------------------------

    #[test]
    fn test_assemble_with_no_months_gives_zero_columns() {
        let cells = aggregate(&scenario());
        let stations = vec!["A".to_string(), "B".to_string()];
        let tables = assemble(&cells, &stations, &[]);
        assert_eq!(tables.shape(), (2, 0));
        assert_eq!(tables.totals.dim(), (2, 0));
    }

    #[test]
    fn test_assemble_zero_fills_labels_without_cells() {
        let cells = aggregate(&scenario());
        let stations = vec!["A".to_string(), "Z".to_string()];
        let (_, months) = labels_from_cells(&cells);
        let tables = assemble(&cells, &stations, &months);

        assert_eq!(tables.total("A", "2021-01"), Some(3.0));
        assert_eq!(tables.total("Z", "2021-02"), Some(0.0));
        assert_eq!(tables.count("Z", "2021-01"), Some(0));
    }

    // --- Strategy equivalence / idempotence -----------------------------------

    #[test]
    fn test_strategies_agree_on_fractional_values() {
        let records = vec![
            record("A", "2021-01-01", 0.1),
            record("A", "2021-01-02", 0.2),
            record("A", "2021-01-03", 0.3),
            record("B", "2021-01-01", 12.7),
            record("B", "2021-03-01", 0.0),
        ];
        let grouped = pivot_months(&records, Strategy::GroupBy);
        let indexed = pivot_months(&records, Strategy::Indexed);

        assert_eq!(grouped.stations, indexed.stations);
        assert_eq!(grouped.months, indexed.months);
        assert_eq!(grouped.counts, indexed.counts);
        for (g, i) in grouped.totals.iter().zip(indexed.totals.iter()) {
            assert!((g - i).abs() <= 1e-9 * g.abs().max(1.0));
        }
    }

    #[test]
    fn test_pivot_is_idempotent() {
        let records = scenario();
        assert_eq!(
            pivot_months(&records, Strategy::Indexed),
            pivot_months(&records, Strategy::Indexed)
        );
    }

    // --- Strategy parsing ----------------------------------------------------

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("group-by".parse::<Strategy>(), Ok(Strategy::GroupBy));
        assert_eq!("group_by".parse::<Strategy>(), Ok(Strategy::GroupBy));
        assert_eq!("Indexed".parse::<Strategy>(), Ok(Strategy::Indexed));
        assert!("pandas".parse::<Strategy>().is_err());
    }

    // --- Reporting -----------------------------------------------------------

    #[test]
    fn test_run_pivot_reports_shape_and_preview() {
        let reporter = RecordingReporter::new();
        let tables = run_pivot(&scenario(), Strategy::GroupBy, 5, &reporter);

        assert_eq!(tables.shape(), (2, 2));
        assert!(reporter.contains("Pivoting 3 records (group-by strategy)"));
        assert!(reporter.contains("2 stations x 2 months"));
        let previews: Vec<_> = reporter
            .entries()
            .into_iter()
            .filter(|e| e.level == LogLevel::Debug)
            .collect();
        assert_eq!(previews.len(), 2);
        assert!(previews[0].message.starts_with("Monthly totals:"));
    }

    #[test]
    fn test_run_pivot_warns_on_empty_input() {
        let reporter = RecordingReporter::new();
        run_pivot(&[], Strategy::Indexed, 5, &reporter);
        assert!(reporter
            .entries()
            .iter()
            .any(|e| e.level == LogLevel::Warning));
    }
}
