/// Precipitation CSV loader
///
/// Reads the daily observation file (`precipitation.csv`) into validated
/// `PrecipRecord`s. Only the `name`, `date` and `precipitation` columns are
/// used; anything else in the file (station id, coordinates, elevation) is
/// ignored.
///
/// A missing file is not an error: `load_records` returns
/// `LoadOutcome::Missing` and the caller decides what "no data" means.
/// A malformed row, on the other hand, fails the whole load with the line
/// number it came from.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::model::{PivotError, PrecipRecord};

/// Columns the loader requires in the header row.
pub const REQUIRED_COLUMNS: [&str; 3] = ["name", "date", "precipitation"];

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Result of trying to read the input source.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The file exists and every row parsed. May hold zero records.
    Loaded(Vec<PrecipRecord>),
    /// The file does not exist.
    Missing(PathBuf),
}

/// One CSV row before validation. Every field is optional so blank cells
/// can be reported as the specific error they are.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    precipitation: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Loads every record from the CSV file at `path`.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<LoadOutcome, PivotError> {
    let path = path.as_ref();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(LoadOutcome::Missing(path.to_path_buf()));
        }
        Err(e) => {
            return Err(PivotError::Csv(format!("{}: {}", path.display(), e)));
        }
    };

    read_records(file).map(LoadOutcome::Loaded)
}

/// Parses records from any reader producing headered CSV text.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<PrecipRecord>, PivotError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(csv_error)?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(PivotError::Csv(format!("missing required column '{}'", column)));
        }
    }

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(csv_error)?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let raw: RawRow = row
            .deserialize(Some(&headers))
            .map_err(|e| PivotError::Csv(format!("line {}: {}", line, e)))?;
        records.push(to_record(raw, line)?);
    }

    Ok(records)
}

// `PivotError::Csv` displays its own "CSV error: " prefix.
fn csv_error(e: csv::Error) -> PivotError {
    let text = e.to_string();
    let message = text.strip_prefix("CSV error: ").unwrap_or(&text);
    PivotError::Csv(message.to_string())
}

fn to_record(raw: RawRow, line: u64) -> Result<PrecipRecord, PivotError> {
    let station = non_blank(raw.name).ok_or(PivotError::MissingStation { line })?;

    let date_text = non_blank(raw.date).ok_or(PivotError::MissingDate { line })?;
    let date = parse_date(&date_text).ok_or_else(|| PivotError::InvalidDate {
        line,
        value: date_text.clone(),
    })?;

    let precip_text = non_blank(raw.precipitation).unwrap_or_default();
    let precipitation: f64 = precip_text
        .parse()
        .map_err(|_| PivotError::InvalidPrecipitation {
            line,
            value: precip_text.clone(),
        })?;

    PrecipRecord::new(station, date, precipitation, line)
}

fn non_blank(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

/// Accepts plain dates, naive date-times and RFC 3339 timestamps; only the
/// calendar date is kept.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Some(date);
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
