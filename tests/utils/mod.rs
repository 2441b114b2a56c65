#![allow(dead_code)]

use std::path::{Path, PathBuf};

use estatais_panel::filter::state_year_filter;
use estatais_panel::{CompanyRecord, Dataset, PanelConfig};

/// Rows in the sample file
pub const SAMPLE_ROWS: usize = 14;

/// Path to the sample data shipped with the tests
#[must_use]
pub fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/estatais_sample.csv")
}

/// Configuration pointing at the sample, focused on DF in 2023
#[must_use]
pub fn test_config() -> PanelConfig {
    PanelConfig {
        data_path: sample_path(),
        state: "DF".to_string(),
        focus_year: 2023,
        first_year: 2021,
        last_year: 2023,
        ..Default::default()
    }
}

/// Load the sample dataset
pub fn load_sample() -> Dataset {
    Dataset::load(&test_config()).expect("sample dataset should load")
}

/// Records of one state in one year
pub fn state_year(dataset: &Dataset, state: &str, year: i32) -> Vec<CompanyRecord> {
    dataset
        .select_where(state_year_filter(state, year))
        .expect("selection should succeed")
}

/// Write `contents` to `name` inside `dir`
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("temporary file should be writable");
    path
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_close_opt(actual: Option<f64>, expected: f64) {
    match actual {
        Some(value) => assert_close(value, expected),
        None => panic!("expected {expected}, got None"),
    }
}
