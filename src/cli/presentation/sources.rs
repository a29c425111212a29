//! Source list presentation.

use crate::cli::presentation::shared::{format_section_heading, to_pretty_json};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde::Serialize;
use serde_json::json;

/// One configured source as shown by `geoctx sources`
#[derive(Debug, Clone, Serialize)]
pub struct SourceRow {
    pub name: String,
    pub source_type: String,
    pub endpoint: Option<String>,
    pub enabled: bool,
}

pub fn format_sources_text(rows: &[SourceRow]) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Sources"));
    if rows.is_empty() {
        out.push_str("No sources configured.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Source", "Type", "Endpoint", "Enabled"]);
    for row in rows {
        table.add_row(vec![
            row.name.clone(),
            row.source_type.clone(),
            row.endpoint.clone().unwrap_or_else(|| "-".to_string()),
            if row.enabled { "yes" } else { "no" }.to_string(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn format_sources_json(rows: &[SourceRow]) -> String {
    to_pretty_json(&json!({ "sources": rows, "total": rows.len() }))
}
