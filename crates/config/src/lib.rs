//! Configuration for the Lantern shell.
//!
//! Configuration is a single TOML file. Every section is optional and every
//! key inside a section falls back to its default, so a file only needs to
//! name what it changes. Unknown keys are rejected.
//!
//! ```toml
//! [search]
//! extensions = [".py", ".md"]
//! debounce_ms = 300
//!
//! [theme]
//! base = "monokai"
//!
//! [theme.rules]
//! "keyword" = "#ff5f87"
//! "comment" = { fg = "#6c6c6c", italic = true }
//!
//! [python]
//! interpreter = "/usr/bin/python3.12"
//! lint_timeout_secs = 30
//! ```
//!
//! # Lookup
//!
//! 1. An explicit path (the `--config` flag).
//! 2. `$LANTERN_CONFIG`.
//! 3. `<config dir>/lantern/config.toml` (`~/.config` on Linux), if present.
//!
//! Explicit and environment paths must exist; the default location is
//! optional and its absence yields [`Config::default`].

pub mod error;
pub mod theme;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use error::{ConfigError, Result};
use lantern_process::PythonOptions;
use lantern_search::{NameFilter, SearchOptions};
use serde::Deserialize;
pub use theme::{RuleConfig, ThemeBase, ThemeConfig};
use tracing::debug;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "LANTERN_CONFIG";

/// Parsed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub search: SearchOptions,
	pub theme: ThemeConfig,
	pub python: PythonOptions,
}

impl Config {
	/// Parse a TOML string into a [`Config`] and validate derived values.
	pub fn parse(input: &str) -> Result<Self> {
		let config: Config = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		let config = Self::parse(&content)?;
		debug!(path = %path.display(), "config.load");
		Ok(config)
	}

	/// Resolves the config file per the lookup order and loads it, or
	/// returns the defaults when no file applies.
	pub fn discover(explicit: Option<&Path>) -> Result<Self> {
		match resolve_path(explicit, std::env::var_os(CONFIG_ENV), dirs::config_dir()) {
			Some(path) => Self::load(path),
			None => {
				debug!("config.defaults");
				Ok(Self::default())
			}
		}
	}

	/// Checks values that only fail once used: theme colors and filter globs.
	pub fn validate(&self) -> Result<()> {
		self.theme.style_table()?;
		self.name_filter()?;
		Ok(())
	}

	pub fn name_filter(&self) -> Result<NameFilter> {
		Ok(NameFilter::new(self.search.default_filters.as_slice())?)
	}
}

/// Picks the config file to load. `config_dir` candidates are only used when
/// the file exists.
fn resolve_path(explicit: Option<&Path>, env: Option<OsString>, config_dir: Option<PathBuf>) -> Option<PathBuf> {
	if let Some(path) = explicit {
		return Some(path.to_path_buf());
	}
	if let Some(path) = env.filter(|value| !value.is_empty()) {
		return Some(PathBuf::from(path));
	}
	config_dir
		.map(|dir| dir.join("lantern").join("config.toml"))
		.filter(|path| path.is_file())
}
