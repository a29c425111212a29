//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::AggregateError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &AggregateError) -> String {
    match e {
        AggregateError::NoProviders => {
            format!("{}. Add a [sources.<name>] table to config/config.toml.", e)
        }
        _ => e.to_string(),
    }
}

/// Process exit code for a failed command. Cancellation follows the shell
/// convention for SIGINT.
pub fn exit_code(e: &AggregateError) -> i32 {
    match e {
        AggregateError::Cancelled(_) => 130,
        AggregateError::Validation(_) | AggregateError::ConfigError(_) => 2,
        _ => 1,
    }
}
