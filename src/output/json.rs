/// Optional JSON bundle: both matrices and their labels in one document.
///
/// ```json
/// {
///   "stations": ["A", "B"],
///   "months": ["2021-01", "2021-02"],
///   "totals": [[3.0, 0.0], [0.0, 5.0]],
///   "counts": [[2, 0], [0, 1]]
/// }
/// ```
///
/// Matrices are row-major nested arrays, one inner array per station.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::model::{MonthLabel, MonthlyTables};
use crate::output::MatrixSink;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBundle {
    pub stations: Vec<String>,
    pub months: Vec<MonthLabel>,
    pub totals: Vec<Vec<f64>>,
    pub counts: Vec<Vec<u64>>,
}

impl MonthBundle {
    pub fn from_tables(tables: &MonthlyTables) -> Self {
        MonthBundle {
            stations: tables.stations.clone(),
            months: tables.months.clone(),
            totals: tables.totals.rows().into_iter().map(|r| r.to_vec()).collect(),
            counts: tables.counts.rows().into_iter().map(|r| r.to_vec()).collect(),
        }
    }

    /// Rebuilds the dense tables. Fails if a matrix is ragged or its shape
    /// does not match the label lists.
    pub fn into_tables(self) -> Result<MonthlyTables, Box<dyn std::error::Error>> {
        let shape = (self.stations.len(), self.months.len());
        let totals = to_array(self.totals, shape, "totals")?;
        let counts = to_array(self.counts, shape, "counts")?;
        Ok(MonthlyTables {
            stations: self.stations,
            months: self.months,
            totals,
            counts,
        })
    }
}

fn to_array<T>(
    rows: Vec<Vec<T>>,
    shape: (usize, usize),
    what: &str,
) -> Result<Array2<T>, Box<dyn std::error::Error>> {
    if rows.len() != shape.0 || rows.iter().any(|r| r.len() != shape.1) {
        return Err(format!(
            "{} matrix does not match {} stations x {} months",
            what, shape.0, shape.1
        )
        .into());
    }
    let flat: Vec<T> = rows.into_iter().flatten().collect();
    Ok(Array2::from_shape_vec(shape, flat)?)
}

/// Reads a document written by `JsonBundleSink`.
pub fn load_json_bundle<P: AsRef<Path>>(
    path: P,
) -> Result<MonthlyTables, Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(path)?);
    let bundle: MonthBundle = serde_json::from_reader(reader)?;
    bundle.into_tables()
}

pub struct JsonBundleSink {
    path: PathBuf,
}

impl JsonBundleSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonBundleSink { path: path.into() }
    }
}

impl MatrixSink for JsonBundleSink {
    fn name(&self) -> &str {
        "JSON bundle"
    }

    fn write(&self, tables: &MonthlyTables) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &MonthBundle::from_tables(tables))?;
        writer.flush()?;
        Ok(vec![self.path.clone()])
    }
}
