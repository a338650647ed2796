//! Plot settings loaded from a JSON file.

use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::context::MissingFieldPolicy;
use crate::errors::ConfigError;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlotConfig {
    #[serde(default)]
    pub missing_fields: MissingFieldPolicy,
    pub series: Vec<SeriesConfig>,
}

/// One derived signal to plot.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SeriesConfig {
    pub name: String,
    /// Subplot key; series sharing it are drawn together. Defaults to `name`.
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub y_label: String,
    #[serde(default)]
    pub normalize: bool,
    #[serde(default = "default_decimation")]
    pub decimation: NonZeroUsize,
    /// RPN expression, e.g. `$SltACh1 $SltACh2 MUL`.
    pub expression: String,
}

fn default_decimation() -> NonZeroUsize {
    NonZeroUsize::MIN
}

impl SeriesConfig {
    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or(&self.name)
    }
}

impl PlotConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, s) in self.series.iter().enumerate() {
            if s.name.trim().is_empty() {
                return Err(ConfigError::Invalid { index, reason: "empty name".into() });
            }
            if s.expression.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    index,
                    reason: format!("`{}` has an empty expression", s.name),
                });
            }
        }
        if let Some(dup) = self.series.iter().map(|s| s.name.as_str()).duplicates().next() {
            let index = self.series.iter().rposition(|s| s.name == dup).unwrap_or_default();
            return Err(ConfigError::Invalid {
                index,
                reason: format!("duplicate series name `{dup}`"),
            });
        }
        Ok(())
    }
}

impl FromStr for PlotConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: PlotConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
