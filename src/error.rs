use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while loading, validating or saving a figure.
#[derive(Debug, Error)]
pub enum FigureError {
    #[error("Missing input CSV: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("{file} missing columns: {columns:?}")]
    MissingColumns { file: String, columns: Vec<String> },

    #[error("{file} has no data rows")]
    NoRows { file: String },

    #[error("{file} is empty or groups are mislabeled.")]
    EmptyCohort { file: String },

    #[error(
        "Could not infer columns automatically.\n\
         Found columns: {found:?}\n\
         Rename your CSV columns to: survival, checkpoint, CAS \
         (or extend the [inference] candidate lists in the config)."
    )]
    ColumnInference { found: Vec<String> },

    #[error("{file}: invalid value {value:?} in column `{column}` at line {line}")]
    InvalidValue {
        file: String,
        column: String,
        line: usize,
        value: String,
    },

    #[error("{file}: no row with alpha={alpha} and beta={beta}")]
    MissingGridPoint { file: String, alpha: f64, beta: f64 },

    #[error("failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse rendered SVG: {0}")]
    Svg(String),

    #[error("failed to convert figure to PDF: {0}")]
    Pdf(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
