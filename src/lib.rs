/// precip_months: monthly precipitation totals and observation counts per station.
///
/// # Module structure
///
/// ```text
/// precip_months
/// ├── model       — shared data types (PrecipRecord, MonthLabel, MonthlyTables, PivotError, …)
/// ├── config      — run configuration loader (precip_months.toml)
/// ├── logging     — Reporter trait, console/file logger, test reporters
/// ├── ingest
/// │   ├── csv_source — precipitation.csv → validated records
/// │   └── fixtures (test only) — representative CSV payloads
/// ├── analysis
/// │   ├── months    — date → YYYY-MM label
/// │   ├── aggregate — (station, month) group-by
/// │   └── pivot     — dense station x month totals/counts
/// └── output
///     ├── tables  — totals.csv / counts.csv
///     ├── bundle  — monthdata.npz array bundle
///     └── json    — optional monthdata.json bundle
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod output;
