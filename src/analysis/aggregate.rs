/// Group-by aggregation of precipitation records.
///
/// `aggregate` takes the flat list of `PrecipRecord`s produced by the ingest
/// layer and folds it into one `AggregationCell` per (station, month) pair.
/// The map is ordered, so iterating it visits stations lexicographically and,
/// within a station, months chronologically.

use std::collections::{BTreeMap, BTreeSet};

use crate::analysis::months::month_label;
use crate::model::{AggregationCell, MonthLabel, PrecipRecord};

/// Composite grouping key: station name and month label.
pub type CellKey = (String, MonthLabel);

/// Aggregated cells keyed by (station, month).
pub type CellMap = BTreeMap<CellKey, AggregationCell>;

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Single pass over `records`, accumulating sum and count per
/// (station, month). Empty input gives an empty map.
pub fn aggregate(records: &[PrecipRecord]) -> CellMap {
    let mut cells = CellMap::new();

    for record in records {
        let key = (record.station().to_string(), month_label(&record.date()));
        cells.entry(key).or_default().add(record.precipitation());
    }

    cells
}

/// Combines two partial aggregations, e.g. from disjoint slices of one
/// record set. Sums and counts are associative, so
/// `merge(aggregate(a), aggregate(b))` matches `aggregate(a ++ b)` up to
/// floating-point rounding.
pub fn merge(mut into: CellMap, from: CellMap) -> CellMap {
    for (key, cell) in from {
        let target = into.entry(key).or_default();
        target.sum_precipitation += cell.sum_precipitation;
        target.observation_count += cell.observation_count;
    }
    into
}

/// Distinct stations and months present in a cell map, both sorted.
pub fn labels_from_cells(cells: &CellMap) -> (Vec<String>, Vec<MonthLabel>) {
    let stations: BTreeSet<&String> = cells.keys().map(|(s, _)| s).collect();
    let months: BTreeSet<&MonthLabel> = cells.keys().map(|(_, m)| m).collect();
    (
        stations.into_iter().cloned().collect(),
        months.into_iter().cloned().collect(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
