//! Aggregate presentation: per-source summary table plus records.

use crate::aggregate::ContextAggregate;
use crate::cli::presentation::shared::{format_section_heading, to_pretty_json};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

pub fn format_aggregate_json(aggregate: &ContextAggregate) -> String {
    to_pretty_json(aggregate)
}

pub fn format_aggregate_text(aggregate: &ContextAggregate) -> String {
    let query = aggregate.query();
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!(
            "Context around {} (radius {} km)",
            query.center(),
            query.radius_km()
        ))
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Source", "Status", "Items", "Time", "Error"]);
    for (source, entry) in aggregate.entries() {
        let status = if aggregate.is_failed(source) {
            format!("{}", "failed".red())
        } else {
            format!("{}", "ok".green())
        };
        table.add_row(vec![
            source.to_string(),
            status,
            entry.items.len().to_string(),
            format!("{} ms", entry.duration_ms),
            entry.error.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    out.push_str(&format!("{}\n", table));

    for (source, entry) in aggregate.entries() {
        if entry.items.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{}\n", format_section_heading(source.as_str())));
        for record in &entry.items {
            let label = record.name.as_deref().unwrap_or(&record.id);
            match record.distance_km {
                Some(distance) => out.push_str(&format!(
                    "  - [{}] {} ({:.2} km)\n",
                    record.kind, label, distance
                )),
                None => out.push_str(&format!("  - [{}] {}\n", record.kind, label)),
            }
        }
    }

    out.push_str(&format!(
        "\n{} of {} sources answered; {} records; session {}",
        aggregate.present_count(),
        aggregate.source_count(),
        aggregate.total_items(),
        aggregate.session_id()
    ));
    out
}
