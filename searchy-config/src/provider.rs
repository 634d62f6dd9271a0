//! Configuration provider using Figment

use crate::error::{ConfigError, ConfigResult};
use crate::types::SearchySettings;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "SEARCHY_";

/// Base name of the project-level config file (`.searchy.toml` etc.)
const PROJECT_FILE_STEM: &str = ".searchy";

/// Base name of the user-level config file inside `<config dir>/searchy/`
const USER_FILE_STEM: &str = "config";

const EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Loads [`SearchySettings`] from all configured sources.
///
/// No caching is performed; every call to [`ConfigProvider::load`] reads the
/// files again.
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    user_dir: Option<PathBuf>,
    project_dir: Option<PathBuf>,
    explicit_file: Option<PathBuf>,
}

impl ConfigProvider {
    /// Provider reading the user config dir and the current working directory
    pub fn new() -> Self {
        Self {
            user_dir: dirs::config_dir().map(|dir| dir.join("searchy")),
            project_dir: std::env::current_dir().ok(),
            explicit_file: None,
        }
    }

    /// Look for the project file in `dir` instead of the working directory
    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = Some(dir.into());
        self
    }

    /// Skip the user-level config file
    pub fn without_user_config(mut self) -> Self {
        self.user_dir = None;
        self
    }

    /// Also merge this file, above the discovered ones
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Load and validate settings
    pub fn load(&self) -> ConfigResult<SearchySettings> {
        let settings: SearchySettings = self.build_figment()?.extract()?;
        settings.validate()?;
        debug!(
            engine = %settings.search.engine,
            max_results = settings.search.max_results,
            "Loaded configuration"
        );
        Ok(settings)
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(SearchySettings::default()));

        if let Some(path) = self
            .user_dir
            .as_deref()
            .and_then(|dir| discover(dir, USER_FILE_STEM))
        {
            figment = merge_file(figment, &path)?;
        }

        if let Some(path) = self
            .project_dir
            .as_deref()
            .and_then(|dir| discover(dir, PROJECT_FILE_STEM))
        {
            figment = merge_file(figment, &path)?;
        }

        if let Some(path) = &self.explicit_file {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound { path: path.clone() });
            }
            figment = merge_file(figment, path)?;
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }
}

impl Default for ConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// First existing `<dir>/<stem>.<ext>` in extension priority order
fn discover(dir: &Path, stem: &str) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|path| path.is_file())
}

fn merge_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    trace!("Loading config file: {}", path.display());
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("toml") => Ok(figment.merge(Toml::file(path))),
        Some("yaml") | Some("yml") => Ok(figment.merge(Yaml::file(path))),
        Some("json") => Ok(figment.merge(Json::file(path))),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchy_common::SearchEngine;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn isolated(dir: &TempDir) -> ConfigProvider {
        ConfigProvider::new()
            .without_user_config()
            .with_project_dir(dir.path())
    }

    #[test]
    #[serial]
    fn test_defaults_without_files() {
        let dir = TempDir::new().unwrap();
        let settings = isolated(&dir).load().unwrap();
        assert_eq!(settings, SearchySettings::default());
    }

    #[test]
    #[serial]
    fn test_project_toml_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".searchy.toml"),
            "[search]\nengine = \"bing\"\nmax_results = 25\n\n[fetch]\nmax_rate_limit_retries = 4\n",
        )
        .unwrap();

        let settings = isolated(&dir).load().unwrap();
        assert_eq!(settings.search.engine, SearchEngine::Bing);
        assert_eq!(settings.search.max_results, 25);
        assert_eq!(settings.fetch.max_rate_limit_retries, Some(4));
        // untouched sections keep their defaults
        assert_eq!(settings.fetch.max_retries, 3);
    }

    #[test]
    #[serial]
    fn test_project_yaml_is_discovered() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".searchy.yaml"),
            "browser:\n  headful: true\n  window_width: 800\n",
        )
        .unwrap();

        let settings = isolated(&dir).load().unwrap();
        assert!(settings.browser.headful);
        assert_eq!(settings.browser.window_width, 800);
        assert_eq!(settings.browser.window_height, 768);
    }

    #[test]
    #[serial]
    fn test_explicit_file_beats_project_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".searchy.toml"), "run_timeout_secs = 30\n").unwrap();
        let explicit = dir.path().join("ci.json");
        fs::write(&explicit, r#"{"run_timeout_secs": 90}"#).unwrap();

        let settings = isolated(&dir).with_file(&explicit).load().unwrap();
        assert_eq!(settings.run_timeout_secs, Some(90));
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = isolated(&dir)
            .with_file(dir.path().join("nope.toml"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    #[serial]
    fn test_unsupported_explicit_format() {
        let dir = TempDir::new().unwrap();
        let ini = dir.path().join("settings.ini");
        fs::write(&ini, "engine=bing").unwrap();
        let err = isolated(&dir).with_file(&ini).load().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    #[serial]
    fn test_env_vars_override_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".searchy.toml"), "[fetch]\nmax_retries = 7\n").unwrap();

        std::env::set_var("SEARCHY_FETCH__MAX_RETRIES", "5");
        std::env::set_var("SEARCHY_SEARCH__ENGINE", "bing");
        let result = isolated(&dir).load();
        std::env::remove_var("SEARCHY_FETCH__MAX_RETRIES");
        std::env::remove_var("SEARCHY_SEARCH__ENGINE");

        let settings = result.unwrap();
        assert_eq!(settings.fetch.max_retries, 5);
        assert_eq!(settings.search.engine, SearchEngine::Bing);
    }

    #[test]
    #[serial]
    fn test_invalid_values_fail_validation() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".searchy.toml"), "[search]\nmax_results = 0\n").unwrap();
        let err = isolated(&dir).load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
