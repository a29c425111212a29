//! CLI presentation: text and json formatters per command.

mod aggregate;
mod shared;
mod sources;

pub use aggregate::{format_aggregate_json, format_aggregate_text};
pub use sources::{format_sources_json, format_sources_text, SourceRow};
