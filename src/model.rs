/// PrecipRecord, MonthLabel, AggregationCell, MonthlyTables, PivotError
///
/// Core data types for the monthly precipitation pivot.
///
/// This module defines the shared domain model imported by all other modules.
/// Apart from record validation and label lookups it contains no logic and
/// no I/O.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A single daily precipitation observation from one station.
///
/// Only constructible through [`PrecipRecord::new`], so every record that
/// reaches the aggregation step has a station name, a date and a finite,
/// non-negative precipitation value.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecipRecord {
    station: String,
    date: NaiveDate,
    precipitation: f64,
}

impl PrecipRecord {
    /// Builds a validated record. `line` is the 1-based source line, used
    /// only for error reporting (pass 0 for in-memory records).
    pub fn new(
        station: impl Into<String>,
        date: NaiveDate,
        precipitation: f64,
        line: u64,
    ) -> Result<Self, PivotError> {
        let station = station.into();
        if station.trim().is_empty() {
            return Err(PivotError::MissingStation { line });
        }
        if !precipitation.is_finite() || precipitation < 0.0 {
            return Err(PivotError::InvalidPrecipitation {
                line,
                value: precipitation.to_string(),
            });
        }
        Ok(Self { station, date, precipitation })
    }

    pub fn station(&self) -> &str {
        &self.station
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn precipitation(&self) -> f64 {
        self.precipitation
    }

    pub fn month(&self) -> MonthLabel {
        MonthLabel::from_date(&self.date)
    }
}

// ---------------------------------------------------------------------------
// Month labels
// ---------------------------------------------------------------------------

/// Canonical `YYYY-MM` month key, e.g. `"2003-04"`.
///
/// Ordering is the ordering of the text, which is chronological for
/// four-digit years because both parts are zero-padded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthLabel(String);

impl MonthLabel {
    pub fn from_date<D: Datelike>(date: &D) -> Self {
        MonthLabel(format!("{:04}-{:02}", date.year(), date.month()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Aggregation types
// ---------------------------------------------------------------------------

/// Running sum and observation tally for one (station, month) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregationCell {
    pub sum_precipitation: f64,
    pub observation_count: u64,
}

impl AggregationCell {
    pub fn add(&mut self, precipitation: f64) {
        self.sum_precipitation += precipitation;
        self.observation_count += 1;
    }
}

/// Station x month totals and counts, labelled by sorted station names
/// (rows) and sorted month labels (columns).
///
/// Unobserved (station, month) pairs hold zero in both matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTables {
    pub stations: Vec<String>,
    pub months: Vec<MonthLabel>,
    pub totals: Array2<f64>,
    pub counts: Array2<u64>,
}

impl MonthlyTables {
    /// Zero-filled tables for the given labels.
    pub fn zeroed(stations: Vec<String>, months: Vec<MonthLabel>) -> Self {
        let shape = (stations.len(), months.len());
        MonthlyTables {
            stations,
            months,
            totals: Array2::zeros(shape),
            counts: Array2::zeros(shape),
        }
    }

    /// `(rows, columns)`, i.e. `(stations, months)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.stations.len(), self.months.len())
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty() || self.months.is_empty()
    }

    pub fn station_row(&self, station: &str) -> Option<usize> {
        self.stations
            .binary_search_by(|s| s.as_str().cmp(station))
            .ok()
    }

    pub fn month_column(&self, month: &str) -> Option<usize> {
        self.months.binary_search_by(|m| m.as_str().cmp(month)).ok()
    }

    /// Total for a labelled cell; `None` if either label is unknown.
    pub fn total(&self, station: &str, month: &str) -> Option<f64> {
        let (r, c) = (self.station_row(station)?, self.month_column(month)?);
        Some(self.totals[[r, c]])
    }

    pub fn count(&self, station: &str, month: &str) -> Option<u64> {
        let (r, c) = (self.station_row(station)?, self.month_column(month)?);
        Some(self.counts[[r, c]])
    }

    pub fn grand_total(&self) -> f64 {
        self.totals.sum()
    }

    pub fn observation_count(&self) -> u64 {
        self.counts.sum()
    }

    /// Text rendering of the first `rows` stations of the totals matrix.
    pub fn preview_totals(&self, rows: usize) -> String {
        render_preview(&self.stations, &self.months, rows, |r, c| {
            format!("{:?}", self.totals[[r, c]])
        })
    }

    /// Text rendering of the first `rows` stations of the counts matrix.
    pub fn preview_counts(&self, rows: usize) -> String {
        render_preview(&self.stations, &self.months, rows, |r, c| {
            self.counts[[r, c]].to_string()
        })
    }
}

fn render_preview<F>(stations: &[String], months: &[MonthLabel], rows: usize, cell: F) -> String
where
    F: Fn(usize, usize) -> String,
{
    let shown = rows.min(stations.len());
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(shown + 1);

    let mut header = vec!["name".to_string()];
    header.extend(months.iter().map(|m| m.to_string()));
    grid.push(header);

    for (r, station) in stations.iter().take(shown).enumerate() {
        let mut line = vec![station.clone()];
        line.extend((0..months.len()).map(|c| cell(r, c)));
        grid.push(line);
    }

    let columns = months.len() + 1;
    let widths: Vec<usize> = (0..columns)
        .map(|c| grid.iter().map(|line| line[c].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for line in &grid {
        let padded: Vec<String> = line
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(c, (text, width))| {
                if c == 0 {
                    format!("{:<width$}", text, width = *width)
                } else {
                    format!("{:>width$}", text, width = *width)
                }
            })
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    }
    if stations.len() > shown {
        out.push_str(&format!("... ({} more stations)\n", stations.len() - shown));
    }
    out
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while turning source rows into records.
///
/// Rows are rejected, never dropped: a silently skipped row would corrupt the
/// totals without any signal.
#[derive(Debug, Clone, PartialEq)]
pub enum PivotError {
    /// The station name column is absent or blank.
    MissingStation { line: u64 },
    /// The date column is absent or blank.
    MissingDate { line: u64 },
    /// The date column holds text that is not a recognised date.
    InvalidDate { line: u64, value: String },
    /// Precipitation is absent, non-numeric, negative or non-finite.
    InvalidPrecipitation { line: u64, value: String },
    /// The delimited source itself could not be read.
    Csv(String),
}

impl fmt::Display for PivotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PivotError::MissingStation { line } => {
                write!(f, "Line {}: record has no station name", line)
            }
            PivotError::MissingDate { line } => write!(f, "Line {}: record has no date", line),
            PivotError::InvalidDate { line, value } => {
                write!(f, "Line {}: unrecognised date '{}'", line, value)
            }
            PivotError::InvalidPrecipitation { line, value } => {
                write!(f, "Line {}: invalid precipitation value '{}'", line, value)
            }
            PivotError::Csv(msg) => write!(f, "CSV error: {}", msg),
        }
    }
}

impl std::error::Error for PivotError {}
