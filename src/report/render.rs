//! Text and JSON rendering of page reports

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::report::model::{Block, Chart, NoticeLevel, PageReport, Table};

/// Output format of the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render pages in the requested format
///
/// # Errors
/// Returns an error if JSON serialization fails
pub fn render(pages: &[PageReport], format: OutputFormat, source: &Path) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(pages.iter().map(render_text).collect::<Vec<_>>().join("\n")),
        OutputFormat::Json => render_json(pages, source),
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    generated_at: String,
    source: String,
    pages: &'a [PageReport],
}

/// Pages wrapped with the generation time and data source
///
/// # Errors
/// Returns an error if serialization fails
pub fn render_json(pages: &[PageReport], source: &Path) -> Result<String> {
    let envelope = Envelope {
        generated_at: chrono::Utc::now().to_rfc3339(),
        source: source.display().to_string(),
        pages,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

fn width(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, target: usize) -> String {
    let mut padded = text.to_string();
    padded.extend(std::iter::repeat_n(' ', target.saturating_sub(width(text))));
    padded
}

fn render_table(out: &mut String, table: &Table) {
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|r| r.iter().map(|c| c.display()).collect())
        .collect();
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .filter_map(|r| r.get(idx))
                .map(|c| width(c))
                .chain(std::iter::once(width(header)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };
    let _ = writeln!(out, "  {}", line(table.columns.clone()));
    let _ = writeln!(
        out,
        "  {}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-")
    );
    if rows.is_empty() {
        let _ = writeln!(out, "  (sem registros)");
    }
    for row in rows {
        let _ = writeln!(out, "  {}", line(row));
    }
}

fn render_chart(out: &mut String, chart: &Chart) {
    let _ = writeln!(out, "  [gráfico {:?}] {}", chart.kind, chart.title);
    if !chart.x_label.is_empty() || !chart.y_label.is_empty() {
        let _ = writeln!(out, "    x: {} / y: {}", chart.x_label, chart.y_label);
    }
    for series in &chart.series {
        let points = series
            .points
            .iter()
            .map(|p| match &p.label {
                Some(label) => format!("{label} ({}, {:.2})", p.x, p.y),
                None => format!("{}: {:.2}", p.x, p.y),
            })
            .collect::<Vec<_>>()
            .join("; ");
        let _ = writeln!(out, "    {}: {points}", series.name);
    }
}

/// Plain-text rendering of one page
#[must_use]
pub fn render_text(page: &PageReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", page.title);
    for section in &page.sections {
        let _ = writeln!(out, "\n-- {} --", section.title);
        for block in &section.blocks {
            match block {
                Block::Narrative { text } => {
                    let _ = writeln!(out, "  {text}");
                }
                Block::Table(table) => render_table(&mut out, table),
                Block::Chart(chart) => render_chart(&mut out, chart),
                Block::Metrics { items } => {
                    for metric in items {
                        let _ = writeln!(out, "  {}: {}", metric.label, metric.value.display());
                    }
                }
                Block::Notice { level, message } => {
                    let tag = match level {
                        NoticeLevel::Info => "INFO",
                        NoticeLevel::Warning => "AVISO",
                    };
                    let _ = writeln!(out, "  [{tag}] {message}");
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::{Cell, Section};

    fn page() -> PageReport {
        let mut table = Table::new(["Empresa", "Resultado"]);
        table.push(vec![Cell::text("Companhia Energética"), Cell::Money(-40.0)]);
        table.push(vec![Cell::text("BRB"), Cell::Missing]);
        PageReport {
            slug: "results".into(),
            title: "Resultado".into(),
            sections: vec![
                Section::new("Tabela").with(Block::Table(table)),
                Section::warning("Setores", "Coluna 'setor' não encontrada nos dados."),
            ],
        }
    }

    #[test]
    fn text_aligns_columns_and_shows_notices() {
        let text = render_text(&page());
        assert!(text.contains("== Resultado =="));
        assert!(text.contains("Companhia Energética | R$ -40.00"));
        assert!(text.contains("BRB                  | N/A"));
        assert!(text.contains("[AVISO] Coluna 'setor'"));
    }

    #[test]
    fn json_has_envelope() {
        let json = render_json(&[page()], Path::new("dados.csv")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["source"], "dados.csv");
        assert!(value["generated_at"].is_string());
        let blocks = &value["pages"][0]["sections"][0]["blocks"];
        assert_eq!(blocks[0]["type"], "table");
        assert_eq!(blocks[0]["rows"][1][1], serde_json::Value::Null);
        assert_eq!(value["pages"][0]["sections"][1]["blocks"][0]["level"], "warning");
    }
}
