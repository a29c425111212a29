//! Config loading entry point.

use crate::config::merge::builder_with_defaults;
use crate::config::sources::{environment, global_file, workspace_file};
use crate::config::GeoctxConfig;
use crate::error::AggregateError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`GeoctxConfig`] from the layered sources
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence, lowest first: defaults, global file, `config/config.toml`,
    /// `config/{GEOCTX_ENV}.toml`, `GEOCTX__*` environment variables.
    pub fn load(workspace_root: &Path) -> Result<GeoctxConfig, AggregateError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: GeoctxConfig = builder.build()?.try_deserialize()?;
        Self::checked(config)
    }

    /// Load a single file on top of the defaults, ignoring every other source
    pub fn load_from_file(path: &Path) -> Result<GeoctxConfig, AggregateError> {
        let config: GeoctxConfig = builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()))
            .build()?
            .try_deserialize()?;
        Self::checked(config)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    fn checked(config: GeoctxConfig) -> Result<GeoctxConfig, AggregateError> {
        if let Err(errors) = config.validate() {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AggregateError::ConfigError(joined));
        }
        debug!(sources = config.sources.len(), "Configuration loaded");
        Ok(config)
    }
}
