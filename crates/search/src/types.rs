use std::path::PathBuf;
use std::sync::Arc;

/// One search dispatched to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
	pub root: PathBuf,
	/// Trimmed, lowercased query. Never empty.
	pub query: String,
	pub generation: u64,
}

/// Matches produced by one worker run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
	pub generation: u64,
	/// Distinct base names, in walk order.
	pub matches: Vec<String>,
}

/// Change to the listing's name filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
	/// Restore the default name filters.
	Reset,
	/// Show exactly these base names. Empty hides every file.
	Show(Arc<[String]>),
}

/// Events emitted by the coordinator, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
	Started { generation: u64, query: String },
	Filter { generation: u64, update: FilterUpdate },
	Failed { generation: u64, message: String },
}

impl SearchEvent {
	pub fn generation(&self) -> u64 {
		match self {
			Self::Started { generation, .. } | Self::Filter { generation, .. } | Self::Failed { generation, .. } => *generation,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
	#[default]
	Idle,
	Debouncing,
	/// The newest generation's worker is running.
	Searching,
}

/// Point-in-time view of coordinator state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoordinatorSnapshot {
	pub phase: SearchPhase,
	pub generation: u64,
	pub root: PathBuf,
	pub last_query: String,
	pub searches_started: u64,
	pub stale_discarded: u64,
	pub workers_in_flight: usize,
}
