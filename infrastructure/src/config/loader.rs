//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order
const PROJECT_CONFIG_FILES: [&str; 2] = ["forecast.toml", ".forecast.toml"];

/// Prefix for environment overrides, e.g. `FORECAST_FORECAST__RUNS_PER_QUESTION=3`
const ENV_PREFIX: &str = "FORECAST_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `FORECAST_`-prefixed environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./forecast.toml` or `./.forecast.toml`
    /// 4. Global config: `$XDG_CONFIG_HOME/forecast-quorum/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let project = Self::project_config_path();
        Self::figment(
            Self::global_config_path().as_deref(),
            project.as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Layer the given sources over the defaults
    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(path) = global
            && path.exists()
        {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = project {
            figment = figment.merge(Toml::file(path));
        }

        // Explicit path is highest priority for files; a missing file is an error
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/forecast-quorum/config.toml` if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("forecast-quorum").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Config file locations in priority order, with whether each was found
    pub fn config_sources() -> Vec<(String, Option<PathBuf>)> {
        let mut sources = vec![(
            "Project".to_string(),
            Self::project_config_path(),
        )];
        if let Some(path) = Self::global_config_path() {
            let found = path.exists().then_some(path);
            sources.push(("Global".to_string(), found));
        }
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.forecast.runs_per_question, 5);
        assert!(config.output.color);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("forecast-quorum"));
    }

    #[test]
    fn test_layer_priority() {
        let dir = tempfile::tempdir().unwrap();
        let global = write(
            dir.path(),
            "global.toml",
            "[forecast]\nruns_per_question = 3\nrun_concurrency = 1\n",
        );
        let project = write(dir.path(), "project.toml", "[forecast]\nruns_per_question = 4\n");
        let explicit = write(dir.path(), "explicit.toml", "[output]\ncolor = false\n");

        let config: FileConfig =
            ConfigLoader::figment(Some(&global), Some(&project), Some(&explicit))
                .extract()
                .unwrap();
        assert_eq!(config.forecast.runs_per_question, 4);
        assert_eq!(config.forecast.run_concurrency, 1);
        assert_eq!(config.forecast.question_concurrency, 2);
        assert!(!config.output.color);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let result: Result<FileConfig, _> = ConfigLoader::figment(None, None, Some(&missing)).extract();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_value_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = write(dir.path(), "bad.toml", "[forecast]\nruns_per_question = \"many\"\n");
        let result: Result<FileConfig, _> = ConfigLoader::figment(None, None, Some(&explicit)).extract();
        assert!(result.is_err());
    }
}
