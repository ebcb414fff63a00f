//! CLI subcommand implementations.

pub mod batch;
pub mod config;
pub mod extract;
pub mod render;
pub mod validate;

use std::path::Path;

use recondoc_core::RecondocConfig;

/// Load the pipeline configuration from an explicit path, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RecondocConfig> {
    match config_path {
        Some(path) => Ok(RecondocConfig::from_file(Path::new(path))?),
        None => Ok(RecondocConfig::default()),
    }
}
