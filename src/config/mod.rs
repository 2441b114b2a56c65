//! Configuration for loading the dataset and building pages.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PanelError, Result};

/// Default location of the national dataset, relative to the working directory
pub const DEFAULT_DATA_FILE: &str = "BD_Completo_Nacional_Formatado.csv";

/// Environment variable overriding the data path
pub const DATA_PATH_ENV: &str = "ESTATAIS_DATA";

/// Environment variable overriding the reader batch size
pub const BATCH_SIZE_ENV: &str = "ESTATAIS_BATCH_SIZE";

/// Configuration for the panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// CSV or Parquet file, or a directory of them
    pub data_path: PathBuf,
    /// State whose companies the single-state pages describe
    pub state: String,
    /// Year used by the single-year sections
    pub focus_year: i32,
    /// First year of the analysed period
    pub first_year: i32,
    /// Last year of the analysed period
    pub last_year: i32,
    /// CSV field delimiter
    pub delimiter: char,
    /// Rows per record batch when reading
    pub batch_size: usize,
    /// Years kept on the state comparison page (empty keeps all)
    pub comparison_years: Vec<i32>,
    /// States kept on the state comparison page (empty keeps all)
    pub comparison_states: Vec<String>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            state: "DF".to_string(),
            focus_year: 2023,
            first_year: 2020,
            last_year: 2023,
            delimiter: ',',
            batch_size: 8192,
            comparison_years: Vec::new(),
            comparison_states: Vec::new(),
        }
    }
}

impl PanelConfig {
    /// Load a configuration from a JSON file. Absent fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Apply `ESTATAIS_DATA` and `ESTATAIS_BATCH_SIZE` when set
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var(DATA_PATH_ENV) {
            if !path.trim().is_empty() {
                self.data_path = PathBuf::from(path);
            }
        }
        if let Some(size) = std::env::var(BATCH_SIZE_ENV)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            self.batch_size = size;
        }
        self
    }

    /// Years of the analysed period, in ascending order
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        (self.first_year..=self.last_year).collect()
    }

    /// The delimiter as the byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                PanelError::config(format!(
                    "delimiter must be a single ASCII character, got {:?}",
                    self.delimiter
                ))
            })
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.first_year > self.last_year {
            return Err(PanelError::config(format!(
                "first year {} is after last year {}",
                self.first_year, self.last_year
            )));
        }
        if self.state.trim().is_empty() {
            return Err(PanelError::config("state must not be empty"));
        }
        if self.batch_size == 0 {
            return Err(PanelError::config("batch size must be positive"));
        }
        self.delimiter_byte()?;
        Ok(())
    }
}
