//! Configuration file loading for forecast-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `FORECAST_`-prefixed environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./forecast.toml` or `./.forecast.toml`
//! 4. Global: `$XDG_CONFIG_HOME/forecast-quorum/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{FileConfig, FileForecastConfig, FileOutputConfig, FileOutputFormat};
pub use loader::ConfigLoader;
