//! Page reports: building, rendering and exporting
//!
//! Pages are rebuilt from the dataset on every request. Sections whose
//! columns are missing, or whose selection is empty, carry a warning
//! notice instead of failing the page.

pub mod export;
pub mod format;
pub mod model;
pub mod pages;
pub mod render;

pub use export::export_comparison;
pub use model::{
    AxisValue, Block, Cell, Chart, ChartKind, DataPoint, Metric, NoticeLevel, PageReport, Section,
    Series, Table,
};
pub use pages::{Page, build_all, build_page};
pub use render::{OutputFormat, render, render_json, render_text};
