//! Renderer-independent page content
//!
//! A page is a list of sections; a section is a list of blocks. Charts are
//! plain datasets, so any front end can draw them.

use serde::Serialize;

use crate::report::format::{format_count, format_currency, format_number, format_percent};

/// One rendered page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageReport {
    pub slug: String,
    pub title: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Section {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// A section holding only a warning
    #[must_use]
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title).with(Block::warning(message))
    }

    /// Notices of the given level in this section
    pub fn notices(&self, level: NoticeLevel) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(move |b| match b {
            Block::Notice { level: l, message } if *l == level => Some(message.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Narrative { text: String },
    Table(Table),
    Chart(Chart),
    Metrics { items: Vec<Metric> },
    Notice { level: NoticeLevel, message: String },
}

impl Block {
    #[must_use]
    pub fn narrative(text: impl Into<String>) -> Self {
        Self::Narrative { text: text.into() }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn metrics(items: Vec<Metric>) -> Self {
        Self::Metrics { items }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A table value; the variant decides how it is displayed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Count(usize),
    Year(i32),
    Money(f64),
    Percent(f64),
    Number(f64),
    Missing,
}

impl Cell {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub fn opt_text(value: Option<&str>) -> Self {
        value.map_or(Self::Missing, Self::text)
    }

    #[must_use]
    pub fn money(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Money)
    }

    #[must_use]
    pub fn percent(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Percent)
    }

    /// Display form used by the text renderer
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Count(n) => format_count(*n),
            Self::Year(year) => year.to_string(),
            Self::Money(value) => format_currency(*value),
            Self::Percent(value) => format_percent(*value),
            Self::Number(value) => format_number(*value),
            Self::Missing => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    #[must_use]
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Cells of a named column
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().filter_map(|r| r.get(idx)).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: Cell,
}

impl Metric {
    #[must_use]
    pub fn new(label: impl Into<String>, value: Cell) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    StackedBar,
    Line,
    Pie,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl Chart {
    #[must_use]
    pub fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            series: Vec::new(),
        }
    }

    #[must_use]
    pub fn axes(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<DataPoint>,
}

impl Series {
    #[must_use]
    pub fn new(name: impl Into<String>, points: Vec<DataPoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

/// A point; `x` is a category label or, for scatter charts, a number
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub x: AxisValue,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DataPoint {
    #[must_use]
    pub fn category(x: impl Into<String>, y: f64) -> Self {
        Self {
            x: AxisValue::Category(x.into()),
            y,
            label: None,
        }
    }

    #[must_use]
    pub fn xy(x: f64, y: f64, label: impl Into<String>) -> Self {
        Self {
            x: AxisValue::Value(x),
            y,
            label: Some(label.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisValue {
    Category(String),
    Value(f64),
}

impl std::fmt::Display for AxisValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Category(label) => f.write_str(label),
            Self::Value(value) => write!(f, "{value:.2}"),
        }
    }
}
