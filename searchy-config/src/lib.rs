//! # Searchy Configuration
//!
//! Settings for the browser, the content fetcher and the search defaults,
//! loaded through [`figment`] with this precedence (later wins):
//!
//! 1. Built-in defaults
//! 2. User config file: `<config dir>/searchy/config.{toml,yaml,yml,json}`
//! 3. Project config file: `.searchy.{toml,yaml,yml,json}` in the working directory
//! 4. An explicit file passed with `--config`
//! 5. Environment variables prefixed `SEARCHY_`, nested with `__`
//!    (`SEARCHY_FETCH__MAX_RETRIES=5`)
//!
//! Command-line flags are applied by the CLI on top of the loaded value.

pub mod error;
pub mod provider;
pub mod types;

pub use error::{ConfigError, ConfigResult};
pub use provider::ConfigProvider;
pub use types::{BrowserSettings, FetchSettings, SearchSettings, SearchySettings};

/// Load settings from all standard sources
pub fn load_settings() -> ConfigResult<SearchySettings> {
    ConfigProvider::new().load()
}
