//! Evaluates configured series over log files and groups them into subplots.

use std::fmt;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use serde::{Serialize, Serializer};

use crate::config::{PlotConfig, SeriesConfig};
use crate::datalog::{self, Datalog, DATA_DIR};
use crate::engine::Evaluator;
use crate::errors::{DatalogError, EvalError};
use crate::series::{decimate, normalize};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub name: String,
    pub value: Value,
}

/// Series sharing one subplot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotGroup {
    pub key: String,
    pub y_label: String,
    pub series: Vec<PlotSeries>,
}

/// A series whose expression failed; the rest of the file is still plotted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesFailure {
    pub name: String,
    #[serde(serialize_with = "display")]
    pub error: EvalError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotFile {
    pub file: PathBuf,
    pub groups: Vec<PlotGroup>,
    pub failures: Vec<SeriesFailure>,
}

/// A log file that could not be read; the other files are still plotted.
#[derive(Debug, Serialize)]
pub struct FileFailure {
    pub file: PathBuf,
    #[serde(serialize_with = "display")]
    pub error: DatalogError,
}

/// Everything plotted from one test folder.
#[derive(Debug, Serialize)]
pub struct PlotReport {
    pub files: Vec<PlotFile>,
    pub failures: Vec<FileFailure>,
}

impl PlotReport {
    /// Series and files that could not be produced.
    pub fn failure_count(&self) -> usize {
        self.failures.len() + self.files.iter().map(|f| f.failures.len()).sum::<usize>()
    }
}

fn display<E: fmt::Display, S: Serializer>(e: &E, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(e)
}

/// Evaluate one series and apply its decimation and normalization.
pub fn evaluate_series(calc: &mut Evaluator, series: &SeriesConfig) -> Result<Value, EvalError> {
    let raw = calc.calculate(&series.expression)?;
    let out = decimate(raw, series.decimation);
    Ok(if series.normalize { normalize(out) } else { out })
}

/// Plot every configured series against one loaded log.
pub fn render_datalog(config: &PlotConfig, file: PathBuf, log: Datalog) -> PlotFile {
    let mut calc = Evaluator::new().with_missing_fields(config.missing_fields);
    calc.load_data(log.into_context());

    let mut done = Vec::new();
    let mut failures = Vec::new();
    for series in &config.series {
        match evaluate_series(&mut calc, series) {
            Ok(value) => done.push((series, value)),
            Err(error) => {
                tracing::warn!(file = ?file, series = %series.name, %error, "skipping series");
                failures.push(SeriesFailure { name: series.name.clone(), error });
            }
        }
    }

    let groups = done
        .iter()
        .map(|(s, _)| s.group())
        .unique()
        .map(|key| {
            let members = done.iter().filter(|(s, _)| s.group() == key);
            let y_label = members
                .clone()
                .map(|(s, _)| s.y_label.as_str())
                .find(|l| !l.is_empty())
                .unwrap_or_default()
                .to_string();
            PlotGroup {
                key: key.to_string(),
                y_label,
                series: members
                    .map(|(s, v)| PlotSeries { name: s.name.clone(), value: v.clone() })
                    .collect(),
            }
        })
        .collect();

    PlotFile { file, groups, failures }
}

/// Run the whole pipeline over `<test_dir>/data/*.dat`.
///
/// Only a missing or unreadable folder is an error; a bad log file is
/// recorded in [`PlotReport::failures`].
pub fn render(config: &PlotConfig, test_dir: &Path) -> Result<PlotReport, DatalogError> {
    let test_dir = datalog::test_directory(test_dir)?;
    let paths = datalog::data_files(test_dir.join(DATA_DIR))?;
    tracing::info!(dir = ?test_dir, files = paths.len(), "rendering test folder");

    let mut report = PlotReport { files: Vec::new(), failures: Vec::new() };
    for path in paths {
        match Datalog::from_path(&path) {
            Ok(log) => report.files.push(render_datalog(config, path, log)),
            Err(error) => {
                tracing::warn!(file = ?path, %error, "skipping log file");
                report.failures.push(FileFailure { file: path, error });
            }
        }
    }
    Ok(report)
}
