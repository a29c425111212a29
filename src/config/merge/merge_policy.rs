//! Merge rules: defaults, override order, conflict handling.

use crate::config::{
    default_cancel_grace_ms, default_session_timeout_ms, default_source_timeout_ms,
};
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources replace individual keys; a source table defined in two files
/// is merged field by field with the later file winning.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default(
            "aggregation.source_timeout_ms",
            default_source_timeout_ms() as i64,
        )?
        .set_default(
            "aggregation.session_timeout_ms",
            default_session_timeout_ms() as i64,
        )?
        .set_default("aggregation.cancel_grace_ms", default_cancel_grace_ms() as i64)
}
