//! Tab-delimited instrument log files.
//!
//! Layout of a `.dat` file:
//!
//! ```text
//! #Time	SltACh1	SltACh2
//! #------------------------
//! 0.0	1.0	2.0
//! 0.1	1.0	2.0
//! ```
//!
//! The first header carries a comment marker, the second line is a divider.

use std::fs;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use itertools::Itertools;

use crate::context::Context;
use crate::errors::DatalogError;

/// Subdirectory of a test folder holding the log files.
pub const DATA_DIR: &str = "data";
/// Extension of log files.
pub const DATA_EXTENSION: &str = "dat";

const DELIMITER: u8 = b'\t';

/// One parsed log file, stored column-wise.
#[derive(Debug, Clone, PartialEq)]
pub struct Datalog {
    headers: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl Datalog {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatalogError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let log = Self::parse(path, &text)?;
        tracing::debug!(?path, columns = log.headers.len(), rows = log.rows(), "parsed datalog");
        Ok(log)
    }

    /// Parse file contents; `path` is only used in error messages.
    pub fn parse(path: &Path, text: &str) -> Result<Self, DatalogError> {
        let csv_err = |source| DatalogError::Csv { path: path.to_path_buf(), source };
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            // the header carries a comment marker, so it is handled by hand
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut records = reader.records();

        let header = records
            .next()
            .transpose()
            .map_err(csv_err)?
            .ok_or_else(|| DatalogError::MissingHeader { path: path.to_path_buf() })?;
        let headers = parse_headers(&header);
        if headers.is_empty() {
            return Err(DatalogError::MissingHeader { path: path.to_path_buf() });
        }
        if let Some(name) = headers.iter().duplicates().next() {
            return Err(DatalogError::DuplicateHeader {
                path: path.to_path_buf(),
                name: name.clone(),
            });
        }

        let mut columns = vec![Vec::new(); headers.len()];
        // record after the header is a comment divider
        for record in records.skip(1) {
            let record = record.map_err(csv_err)?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            let cells = trim_trailing_empty(&record);
            if cells.is_empty() {
                continue;
            }
            if cells.len() != headers.len() {
                return Err(DatalogError::RowLength {
                    path: path.to_path_buf(),
                    line,
                    expected: headers.len(),
                    found: cells.len(),
                });
            }
            for (column, cell) in columns.iter_mut().zip(cells) {
                let x = cell.trim().parse::<f64>().map_err(|_| DatalogError::BadNumber {
                    path: path.to_path_buf(),
                    line,
                    cell: cell.to_string(),
                })?;
                column.push(x);
            }
        }
        Ok(Self { headers, columns })
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Bind every column as a series.
    pub fn into_context(self) -> Context {
        self.headers.into_iter().zip(self.columns).collect()
    }
}

/// Non-empty header cells, with the comment marker cut off the first one.
fn parse_headers(record: &StringRecord) -> Vec<String> {
    let mut headers: Vec<String> = record
        .iter()
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(String::from)
        .collect();
    if let Some(first) = headers.first_mut() {
        first.remove(0);
        if first.is_empty() {
            headers.remove(0);
        }
    }
    headers
}

fn trim_trailing_empty(record: &StringRecord) -> Vec<&str> {
    let mut cells: Vec<&str> = record.iter().collect();
    while cells.last().is_some_and(|c| c.trim().is_empty()) {
        cells.pop();
    }
    cells
}

/// Check that `path` is a test folder: a directory with a `data` subdirectory.
pub fn test_directory(path: impl AsRef<Path>) -> Result<PathBuf, DatalogError> {
    let path = path.as_ref();
    if !path.is_dir() {
        return Err(DatalogError::NotADirectory(path.to_path_buf()));
    }
    if !path.join(DATA_DIR).is_dir() {
        return Err(DatalogError::MissingDataDir(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

/// All `.dat` files in `dir`, sorted by file name.
pub fn data_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, DatalogError> {
    let dir = dir.as_ref();
    let io_err = |source| DatalogError::Io { path: dir.to_path_buf(), source };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == DATA_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "#Time\tSltACh1\tSltACh2\t\n#-----\n0\t1\t2\n1\t1\t4\t\n\n";

    #[test]
    fn strips_comment_marker_and_divider() {
        let log = Datalog::parse(Path::new("dut0.dat"), SAMPLE).unwrap();
        assert_eq!(log.headers(), ["Time", "SltACh1", "SltACh2"]);
        assert_eq!(log.rows(), 2);
        assert_eq!(log.column("SltACh2"), Some(&[2.0, 4.0][..]));
        assert_eq!(log.column("Missing"), None);
    }

    #[test]
    fn reports_line_of_bad_cell() {
        let err = Datalog::parse(Path::new("x.dat"), "#A\tB\n#--\n1\t2\n3\tfoo\n").unwrap_err();
        assert_eq!(err.to_string(), "x.dat:4: `foo` is not a number");
    }

    #[test]
    fn rejects_short_rows() {
        let err = Datalog::parse(Path::new("x.dat"), "#A\tB\n#--\n1\n").unwrap_err();
        assert!(matches!(err, DatalogError::RowLength { line: 3, expected: 2, found: 1, .. }));
    }

    #[test]
    fn empty_file_has_no_header() {
        let err = Datalog::parse(Path::new("x.dat"), "").unwrap_err();
        assert!(matches!(err, DatalogError::MissingHeader { .. }));
    }

    #[test]
    fn quoted_cells_follow_csv_rules() {
        let log = Datalog::parse(Path::new("x.dat"), "\"#Time\"\t\"A\"\n#--\n0\t\"2.5\"\n").unwrap();
        assert_eq!(log.headers(), ["Time", "A"]);
        assert_eq!(log.column("A"), Some(&[2.5][..]));
    }

    #[test]
    fn first_header_always_loses_one_char() {
        let log = Datalog::parse(Path::new("x.dat"), "%Time\tA\n#--\n").unwrap();
        assert_eq!(log.headers(), ["Time", "A"]);
        let log = Datalog::parse(Path::new("x.dat"), "#\tTime\tA\n#--\n").unwrap();
        assert_eq!(log.headers(), ["Time", "A"]);
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let err = Datalog::parse(Path::new("x.dat"), "#T\tA\tA\n#--\n0\t1\t2\n").unwrap_err();
        assert_eq!(err.to_string(), "x.dat: column `A` appears more than once");
    }

    #[test]
    fn context_holds_columns() {
        let ctx = Datalog::parse(Path::new("x.dat"), SAMPLE).unwrap().into_context();
        assert_eq!(ctx.len(), 3);
        assert_eq!(ctx.get("Time").and_then(|v| v.len()), Some(2));
    }
}
