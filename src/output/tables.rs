/// CSV table output: `totals.csv` and `counts.csv`.
///
/// Layout (one row per station, one column per month):
///
/// ```text
/// name,2021-01,2021-02
/// A,3.0,0.0
/// B,0.0,5.0
/// ```
///
/// Totals are written with `{:?}` so whole numbers keep their decimal point
/// and fractional sums print in shortest round-trip form.

use std::io::Write;
use std::path::PathBuf;

use crate::model::MonthlyTables;
use crate::output::MatrixSink;

/// Header of the row-label column.
pub const INDEX_COLUMN: &str = "name";

pub struct CsvTableSink {
    totals_path: PathBuf,
    counts_path: PathBuf,
}

impl CsvTableSink {
    pub fn new(totals_path: impl Into<PathBuf>, counts_path: impl Into<PathBuf>) -> Self {
        CsvTableSink {
            totals_path: totals_path.into(),
            counts_path: counts_path.into(),
        }
    }
}

impl MatrixSink for CsvTableSink {
    fn name(&self) -> &str {
        "csv tables"
    }

    fn write(&self, tables: &MonthlyTables) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
        write_totals(csv::Writer::from_path(&self.totals_path)?, tables)?;
        write_counts(csv::Writer::from_path(&self.counts_path)?, tables)?;
        Ok(vec![self.totals_path.clone(), self.counts_path.clone()])
    }
}

/// Writes the totals matrix as CSV.
pub fn write_totals<W: Write>(writer: csv::Writer<W>, tables: &MonthlyTables) -> csv::Result<()> {
    write_matrix(writer, tables, |r, c| format!("{:?}", tables.totals[[r, c]]))
}

/// Writes the counts matrix as CSV.
pub fn write_counts<W: Write>(writer: csv::Writer<W>, tables: &MonthlyTables) -> csv::Result<()> {
    write_matrix(writer, tables, |r, c| tables.counts[[r, c]].to_string())
}

fn write_matrix<W, F>(mut writer: csv::Writer<W>, tables: &MonthlyTables, cell: F) -> csv::Result<()>
where
    W: Write,
    F: Fn(usize, usize) -> String,
{
    let mut header = Vec::with_capacity(tables.months.len() + 1);
    header.push(INDEX_COLUMN.to_string());
    header.extend(tables.months.iter().map(|m| m.to_string()));
    writer.write_record(&header)?;

    for (row, station) in tables.stations.iter().enumerate() {
        let mut line = Vec::with_capacity(tables.months.len() + 1);
        line.push(station.clone());
        line.extend((0..tables.months.len()).map(|col| cell(row, col)));
        writer.write_record(&line)?;
    }

    writer.flush()?;
    Ok(())
}
