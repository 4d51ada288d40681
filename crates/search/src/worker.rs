use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use ignore::WalkBuilder;
use tracing::{debug, trace};

use crate::error::SearchError;
use crate::options::SearchOptions;
use crate::types::SearchRequest;

/// Runs one search. Called on the blocking pool.
pub trait SearchBackend: Send + Sync + 'static {
	fn search(&self, request: &SearchRequest) -> Result<Vec<String>, SearchError>;
}

/// Filesystem backend driven by [`search_files`].
#[derive(Debug, Clone, Default)]
pub struct FsSearchBackend {
	options: SearchOptions,
}

impl FsSearchBackend {
	pub fn new(options: SearchOptions) -> Self {
		Self { options }
	}
}

impl SearchBackend for FsSearchBackend {
	fn search(&self, request: &SearchRequest) -> Result<Vec<String>, SearchError> {
		search_files(&request.root, &request.query, &self.options)
	}
}

/// Returns the distinct base names of files under `root` whose content
/// contains `query`, ignoring case.
///
/// Only files with a tracked extension are opened. Unreadable files are
/// skipped. Names are reported once, at their first occurrence in
/// file-name-sorted walk order.
pub fn search_files(root: &Path, query: &str, options: &SearchOptions) -> Result<Vec<String>, SearchError> {
	let meta = std::fs::metadata(root).map_err(|err| SearchError::RootUnavailable {
		root: root.to_path_buf(),
		reason: err.to_string(),
	})?;
	if !meta.is_dir() {
		return Err(SearchError::RootUnavailable {
			root: root.to_path_buf(),
			reason: "not a directory".to_string(),
		});
	}

	let started = Instant::now();
	let needle = query.to_lowercase();
	let extensions = options.extension_set();
	let mut seen = HashSet::new();
	let mut matches = Vec::new();
	let mut scanned = 0usize;

	for entry in build_walker(root, options).build() {
		let entry = match entry {
			Ok(entry) => entry,
			Err(err) => {
				trace!(error = %err, "search.walk.skip");
				continue;
			}
		};
		if !entry.file_type().is_some_and(|ft| ft.is_file()) {
			continue;
		}

		let path = entry.path();
		if !has_tracked_extension(path, &extensions) {
			continue;
		}
		let Some(name) = path.file_name().map(|name| name.to_string_lossy().into_owned()) else {
			continue;
		};
		if seen.contains(&name) {
			continue;
		}

		scanned += 1;
		match file_contains(path, &needle) {
			Ok(true) => {
				seen.insert(name.clone());
				matches.push(name);
			}
			Ok(false) => {}
			Err(err) => trace!(path = %path.display(), error = %err, "search.read.skip"),
		}
	}

	debug!(
		root = %root.display(),
		scanned,
		matches = matches.len(),
		elapsed_ms = started.elapsed().as_millis() as u64,
		"search.worker.done"
	);
	Ok(matches)
}

fn build_walker(root: &Path, options: &SearchOptions) -> WalkBuilder {
	let mut builder = WalkBuilder::new(root);
	builder
		.standard_filters(false)
		.hidden(!options.include_hidden)
		.follow_links(options.follow_symlinks)
		.git_ignore(options.respect_ignore_files)
		.git_global(options.respect_ignore_files)
		.git_exclude(options.respect_ignore_files)
		.ignore(options.respect_ignore_files)
		.parents(options.respect_ignore_files)
		.max_depth(options.max_depth)
		.sort_by_file_name(|a, b| a.cmp(b));
	builder
}

fn has_tracked_extension(path: &Path, extensions: &HashSet<String>) -> bool {
	path.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| extensions.contains(&ext.to_ascii_lowercase()))
}

/// Invalid UTF-8 bytes are dropped before matching.
fn file_contains(path: &Path, needle: &str) -> std::io::Result<bool> {
	let bytes = std::fs::read(path)?;
	let text: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();
	Ok(text.to_lowercase().contains(needle))
}
