//! CLI domain: parse, route, output, and presentation only.
//! No aggregation logic; the route table dispatches to `ContextAggregator`.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::{exit_code, map_error};
pub use parse::{Cli, Commands};
pub use presentation::{
    format_aggregate_json, format_aggregate_text, format_sources_json, format_sources_text,
};
pub use route::RunContext;
