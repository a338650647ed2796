use std::path::PathBuf;

use thiserror::Error; // Import the `Error` derive macro from the `thiserror` crate

use crate::ops::Op;

// Failures raised while evaluating one RPN expression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    // The expression left nothing on the stack (e.g. it was empty)
    #[error("expression produced no result")]
    EmptyResult,

    // An operator needed more operands than the stack held
    #[error("stack underflow: {op} needs {needed} operand(s), found {found}")]
    StackUnderflow { op: Op, needed: usize, found: usize },

    // A token that is neither operator, variable nor float literal
    #[error("malformed token `{token}` at position {position}")]
    MalformedToken { token: String, position: usize },

    // Two vectors of different lengths met in a binary operator
    #[error("shape mismatch in {op}: {left} vs {right} samples")]
    ShapeMismatch { op: Op, left: usize, right: usize },

    // `$name` not present in the bound data context (strict policy only)
    #[error("missing field `{0}`")]
    MissingField(String),
}

// Type alias for results that use `EvalError` as the error type
pub type Result<T> = std::result::Result<T, EvalError>;

// Failures while locating or reading `.dat` log files
#[derive(Debug, Error)]
pub enum DatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: column `{name}` appears more than once")]
    DuplicateHeader { path: PathBuf, name: String },

    #[error("{path}: file has no header line")]
    MissingHeader { path: PathBuf },

    #[error("{path}:{line}: expected {expected} values, found {found}")]
    RowLength {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{path}:{line}: `{cell}` is not a number")]
    BadNumber {
        path: PathBuf,
        line: usize,
        cell: String,
    },

    #[error("the input {0} is not a valid directory")]
    NotADirectory(PathBuf),

    #[error("did not find a data subdirectory in {0}")]
    MissingDataDir(PathBuf),
}

// Failures while loading plot settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("series #{index}: {reason}")]
    Invalid { index: usize, reason: String },
}
