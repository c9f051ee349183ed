mod build;
mod list;

pub use build::*;
pub use list::*;

use std::env;

use crate::{data::AtlasConfig, options::AtlasOptions};

/// Reads the config file the options point to (or the one in the current
/// directory) and applies any overrides given on the command line.
///
/// The result is not validated here. Each command validates the config
/// before it touches the filesystem.
fn load_config(options: AtlasOptions) -> anyhow::Result<AtlasConfig> {
    let current_dir = env::current_dir()?;
    let config = AtlasConfig::read_or_default(options.config.as_deref(), &current_dir)?;

    if let Some(file_path) = &config.file_path {
        log::debug!("Using config from {}", file_path.display());
    }

    Ok(apply_overrides(config, options))
}

/// Replaces every field of `config` that was also given on the command line.
fn apply_overrides(mut config: AtlasConfig, options: AtlasOptions) -> AtlasConfig {
    if let Some(source_dir) = options.source_dir {
        config.source_dir = source_dir;
    }

    if let Some(cell_size) = options.cell_size {
        config.cell_size = cell_size;
    }

    if let Some(columns) = options.columns {
        config.columns = columns;
    }

    if let Some(extension) = options.extension {
        config.extension = extension;
    }

    if let Some(input_order) = options.input_order {
        config.input_order = input_order;
    }

    config
}
