use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by search operations.
///
/// Per-file read failures are not represented here: the worker skips them.
#[derive(Debug, Error)]
pub enum SearchError {
	/// The search root does not exist or is not a directory.
	#[error("search root {} is unavailable: {reason}", root.display())]
	RootUnavailable { root: PathBuf, reason: String },

	/// A default name-filter pattern is not a valid glob.
	#[error("invalid name filter pattern {pattern:?}: {source}")]
	Pattern {
		pattern: String,
		#[source]
		source: globset::Error,
	},
}
