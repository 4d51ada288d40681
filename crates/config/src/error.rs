//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or an unknown/mistyped key.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {}: {error}", path.display())]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A theme rule carries a color that is not `#RRGGBB` or `#RGB`.
	#[error("invalid color for {category}: {source}")]
	InvalidColor {
		category: String,
		#[source]
		source: lantern_syntax::ColorParseError,
	},

	/// A default name filter is not a valid glob.
	#[error(transparent)]
	InvalidFilter(#[from] lantern_search::SearchError),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
