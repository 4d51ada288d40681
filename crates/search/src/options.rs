use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

/// Search configuration: tracked extensions, debounce delay and walk options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchOptions {
	/// Extensions whose files are opened and scanned, with or without the dot.
	pub extensions: Vec<String>,
	/// Quiet period after the last edit before a search starts.
	pub debounce_ms: u64,
	/// Patterns the listing shows when no search filter is active.
	pub default_filters: Vec<String>,
	pub include_hidden: bool,
	pub respect_ignore_files: bool,
	pub follow_symlinks: bool,
	pub max_depth: Option<usize>,
}

impl Default for SearchOptions {
	fn default() -> Self {
		Self {
			extensions: [".py", ".txt", ".md", ".markdown", ".ini", ".json"].map(String::from).to_vec(),
			debounce_ms: 500,
			default_filters: ["*.py", "*.txt", "*.md", "*.markdown", "*.ini", "*.json", "*.zip", "requirements.txt"].map(String::from).to_vec(),
			include_hidden: true,
			respect_ignore_files: false,
			follow_symlinks: false,
			max_depth: None,
		}
	}
}

impl SearchOptions {
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	/// Normalized extension set: lowercase, without leading dot.
	pub fn extension_set(&self) -> HashSet<String> {
		self.extensions
			.iter()
			.map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
			.filter(|ext| !ext.is_empty())
			.collect()
	}
}
