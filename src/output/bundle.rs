/// Array bundle output: `monthdata.npz`, the NumPy zip archive loaded with
/// `np.load('monthdata.npz')`.
///
/// Entries:
/// - `totals` — float64, stations x months
/// - `counts` — uint64, stations x months
///
/// Row and column labels are not stored in the archive; they are the header
/// row and first column of `totals.csv` / `counts.csv`, or the optional JSON
/// bundle.

use std::fs::File;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use ndarray_npy::{NpzReader, NpzWriter, ReadNpzError, ReadableElement};

use crate::model::MonthlyTables;
use crate::output::MatrixSink;

pub const TOTALS_ENTRY: &str = "totals";
pub const COUNTS_ENTRY: &str = "counts";

/// Reads the matrices back from a bundle written by `BundleSink`.
pub fn load_bundle<P: AsRef<Path>>(
    path: P,
) -> Result<(Array2<f64>, Array2<u64>), Box<dyn std::error::Error>> {
    let mut npz = NpzReader::new(File::open(path)?)?;
    let totals: Array2<f64> = read_matrix(&mut npz, TOTALS_ENTRY)?;
    let counts: Array2<u64> = read_matrix(&mut npz, COUNTS_ENTRY)?;

    if totals.dim() != counts.dim() {
        return Err(format!(
            "totals {:?} and counts {:?} differ in shape",
            totals.dim(),
            counts.dim()
        )
        .into());
    }
    Ok((totals, counts))
}

// Archives written by numpy store entries as `<name>.npy`.
fn read_matrix<T: ReadableElement>(
    npz: &mut NpzReader<File>,
    name: &str,
) -> Result<Array2<T>, ReadNpzError> {
    npz.by_name(name)
        .or_else(|_| npz.by_name(&format!("{}.npy", name)))
}

pub struct BundleSink {
    path: PathBuf,
}

impl BundleSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        BundleSink { path: path.into() }
    }
}

impl MatrixSink for BundleSink {
    fn name(&self) -> &str {
        "array bundle"
    }

    fn write(&self, tables: &MonthlyTables) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
        let mut npz = NpzWriter::new(File::create(&self.path)?);
        npz.add_array(TOTALS_ENTRY, &tables.totals)?;
        npz.add_array(COUNTS_ENTRY, &tables.counts)?;
        npz.finish()?;
        Ok(vec![self.path.clone()])
    }
}
