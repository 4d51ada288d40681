use std::collections::HashSet;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::SearchError;
use crate::types::FilterUpdate;

/// File-name predicate for the project listing.
///
/// Starts on the default glob patterns; [`FilterUpdate`]s switch it to an
/// exact name set and back. Directories are not subject to the filter.
#[derive(Debug, Clone)]
pub struct NameFilter {
	defaults: GlobSet,
	active: Option<HashSet<String>>,
}

impl NameFilter {
	/// Builds a filter from default glob patterns, matched case-insensitively.
	pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, SearchError> {
		let mut builder = GlobSetBuilder::new();
		for pattern in patterns {
			let pattern = pattern.as_ref();
			let glob = GlobBuilder::new(pattern)
				.case_insensitive(true)
				.literal_separator(true)
				.build()
				.map_err(|source| SearchError::Pattern {
					pattern: pattern.to_string(),
					source,
				})?;
			builder.add(glob);
		}
		let defaults = builder.build().map_err(|source| SearchError::Pattern {
			pattern: patterns.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" "),
			source,
		})?;
		Ok(Self { defaults, active: None })
	}

	pub fn apply(&mut self, update: &FilterUpdate) {
		self.active = match update {
			FilterUpdate::Reset => None,
			FilterUpdate::Show(names) => Some(names.iter().cloned().collect()),
		};
	}

	pub fn is_default(&self) -> bool {
		self.active.is_none()
	}

	pub fn matches(&self, file_name: &str) -> bool {
		match &self.active {
			Some(names) => names.contains(file_name),
			None => self.defaults.is_match(file_name),
		}
	}
}
