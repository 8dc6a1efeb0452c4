pub mod dashboard;

use serde::Serialize;

use crate::columns::ColumnDef;
use crate::grid::DataGrid;
use crate::model::{Record, ThingType};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" | "tsv" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".txt") || lower.ends_with(".tsv") {
        return Some(OutputFormat::Text);
    }
    None
}

/// Tab-separated projection of the visible rows, header first.
pub fn render_text(columns: &[ColumnDef], rows: &[&Record]) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(
        &columns
            .iter()
            .map(|c| c.field)
            .collect::<Vec<_>>()
            .join("\t"),
    );
    out.push('\n');
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| row.cell(c.field).replace(['\t', '\n'], " "))
            .collect();
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
    out.into_bytes()
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, String> {
    let mut out =
        serde_json::to_vec_pretty(value).map_err(|e| format!("failed to encode JSON: {e}"))?;
    out.push(b'\n');
    Ok(out)
}

pub fn export_rows<G: DataGrid>(grid: &G, format: OutputFormat) -> Result<Vec<u8>, String> {
    let rows = grid.visible_rows();
    match format {
        OutputFormat::Text => Ok(render_text(grid.columns(), &rows)),
        OutputFormat::Json => render_json(&rows),
    }
}

pub fn render_types(types: &[ThingType]) -> String {
    let width = types
        .iter()
        .map(|t| t.item_type.chars().count())
        .max()
        .unwrap_or(0)
        .max("Item Types".len());
    let mut out = format!("{:<width$}  {:>8}\n", "Item Types", "Count");
    if types.is_empty() {
        out.push_str("No data available\n");
        return out;
    }
    for t in types {
        out.push_str(&format!("{:<width$}  {:>8}\n", t.item_type, t.count));
    }
    out
}
