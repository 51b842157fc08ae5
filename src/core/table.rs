//! In-memory CSV tables with typed column access.
//!
//! A [`Table`] keeps the raw string records of a result file and parses
//! columns on demand, so each figure decides how strict it wants to be:
//! [`Table::f64_column`] rejects malformed cells, [`Table::f64_column_lossy`]
//! coerces them to `NaN` the way a dataframe `to_numeric(errors="coerce")`
//! would.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::FigureError;

#[derive(Clone, Debug)]
pub struct Table {
    source: PathBuf,
    headers: Vec<String>,
    records: Vec<StringRecord>,
}

impl Table {
    /// Read a CSV file; a missing file is reported with the attempted path.
    pub fn read(path: &Path) -> Result<Self, FigureError> {
        if !path.exists() {
            return Err(FigureError::MissingInput {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        Self::from_reader(path, file)
    }

    pub fn from_reader<R: Read>(source: impl Into<PathBuf>, reader: R) -> Result<Self, FigureError> {
        let source = source.into();
        let mut rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = rdr
            .headers()
            .map_err(|source_err| FigureError::Csv {
                path: source.clone(),
                source: source_err,
            })?
            .iter()
            .map(str::to_string)
            .collect();
        let mut records = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|source_err| FigureError::Csv {
                path: source.clone(),
                source: source_err,
            })?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            records.push(record);
        }
        debug!(
            source = %source.display(),
            columns = headers.len(),
            rows = records.len(),
            "loaded table"
        );
        Ok(Self {
            source,
            headers,
            records,
        })
    }

    /// File name used in error messages (`results_roc.csv`, ...).
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Fails with every missing name, sorted, when any of `names` is absent.
    pub fn require(&self, names: &[&str]) -> Result<(), FigureError> {
        let mut missing: Vec<String> = names
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.to_string())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        missing.dedup();
        Err(FigureError::MissingColumns {
            file: self.file_name(),
            columns: missing,
        })
    }

    fn column_index(&self, name: &str) -> Result<usize, FigureError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| FigureError::MissingColumns {
                file: self.file_name(),
                columns: vec![name.to_string()],
            })
    }

    fn cells<'a>(&'a self, idx: usize) -> impl Iterator<Item = &'a str> + 'a {
        self.records.iter().map(move |r| r.get(idx).unwrap_or(""))
    }

    pub fn str_column(&self, name: &str) -> Result<Vec<String>, FigureError> {
        let idx = self.column_index(name)?;
        Ok(self.cells(idx).map(str::to_string).collect())
    }

    /// Strict numeric column: missing cells become `NaN`, anything else that
    /// does not parse is an error naming the offending line.
    pub fn f64_column(&self, name: &str) -> Result<Vec<f64>, FigureError> {
        let idx = self.column_index(name)?;
        let mut out = Vec::with_capacity(self.records.len());
        for (row, cell) in self.cells(idx).enumerate() {
            if is_missing(cell) {
                out.push(f64::NAN);
                continue;
            }
            let value = cell.parse::<f64>().map_err(|_| FigureError::InvalidValue {
                file: self.file_name(),
                column: name.to_string(),
                line: row + 2,
                value: cell.to_string(),
            })?;
            out.push(value);
        }
        Ok(out)
    }

    /// Lenient numeric column: unparsable cells become `NaN`.
    pub fn f64_column_lossy(&self, name: &str) -> Result<Vec<f64>, FigureError> {
        let idx = self.column_index(name)?;
        Ok(self
            .cells(idx)
            .map(|cell| cell.parse::<f64>().unwrap_or(f64::NAN))
            .collect())
    }

    /// A column is numeric when every non-missing cell parses as a number.
    pub fn is_numeric(&self, name: &str) -> bool {
        let Ok(idx) = self.column_index(name) else {
            return false;
        };
        self.cells(idx)
            .filter(|cell| !is_missing(cell))
            .all(|cell| cell.parse::<f64>().is_ok())
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        self.headers
            .iter()
            .filter(|h| self.is_numeric(h))
            .cloned()
            .collect()
    }
}

/// Blank, `NA` and `NaN` cells count as missing.
pub fn is_missing(cell: &str) -> bool {
    cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell.eq_ignore_ascii_case("na")
}
