use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NjError {
    #[error("empty distance matrix: need at least one taxon")]
    EmptyMatrix,

    #[error("distance matrix data length mismatch: expected {expected}, got {got}")]
    DataLenMismatch { expected: usize, got: usize },

    #[error("asymmetric distance at ({i}, {j}): {upper} != {lower}")]
    AsymmetricDistance {
        i: usize,
        j: usize,
        upper: f64,
        lower: f64,
    },

    #[error("negative distance at ({i}, {j}): {value}")]
    NegativeDistance { i: usize, j: usize, value: f64 },

    #[error("nonzero diagonal at index {i}: {value}")]
    NonzeroDiagonal { i: usize, value: f64 },

    #[error("duplicate taxon label '{label}'")]
    DuplicateLabel { label: Box<str> },

    #[error("phylip format error at line {line}: {msg}")]
    PhylipFormat { msg: &'static str, line: usize },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv report error: {0}")]
    CsvReport(#[from] csv::Error),
}

pub type NjResult<T> = Result<T, NjError>;
