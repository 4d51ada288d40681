use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lantern_worker::{DebounceStamp, Debouncer, TaskClass, join_error_panic_message};
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::options::SearchOptions;
use crate::types::{CoordinatorSnapshot, FilterUpdate, SearchEvent, SearchPhase, SearchRequest, SearchResult};
use crate::worker::{FsSearchBackend, SearchBackend};

/// Command protocol for the coordinator actor.
#[derive(Debug)]
enum CoordinatorCmd {
	QueryChanged(String),
	SetRoot(PathBuf),
	DebounceFired(DebounceStamp),
	Worker(WorkerOutcome),
	Shutdown,
}

#[derive(Debug)]
enum WorkerOutcome {
	Completed(SearchResult),
	Failed { generation: u64, message: String },
}

impl WorkerOutcome {
	fn generation(&self) -> u64 {
		match self {
			Self::Completed(result) => result.generation,
			Self::Failed { generation, .. } => *generation,
		}
	}
}

/// Handle to the search coordinator.
///
/// All state lives in one actor task; handle methods only enqueue commands,
/// so they never block on a running search. Dropping every handle stops the
/// actor once outstanding timers and workers have drained.
#[derive(Clone)]
pub struct SearchCoordinator {
	tx: mpsc::UnboundedSender<CoordinatorCmd>,
	shared: Arc<RwLock<CoordinatorSnapshot>>,
}

impl SearchCoordinator {
	/// Starts a coordinator searching `root` through the filesystem backend.
	pub fn spawn(root: PathBuf, options: SearchOptions) -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
		let debounce = options.debounce();
		Self::with_backend(root, debounce, Arc::new(FsSearchBackend::new(options)))
	}

	pub fn with_backend(
		root: PathBuf,
		debounce: Duration,
		backend: Arc<dyn SearchBackend>,
	) -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
		let (tx, rx) = mpsc::unbounded_channel();
		let (event_tx, event_rx) = mpsc::unbounded_channel();
		let shared = Arc::new(RwLock::new(CoordinatorSnapshot {
			root: root.clone(),
			..CoordinatorSnapshot::default()
		}));

		let actor = CoordinatorActor {
			root,
			backend,
			debouncer: Debouncer::new(debounce),
			latest_query: String::new(),
			generation: 0,
			searching: false,
			workers_in_flight: 0,
			searches_started: 0,
			stale_discarded: 0,
			self_tx: tx.downgrade(),
			events: event_tx,
			shared: Arc::clone(&shared),
		};
		lantern_worker::spawn(TaskClass::Interactive, actor.run(rx));

		(Self { tx, shared }, event_rx)
	}

	/// Records the latest query text and restarts the debounce window.
	pub fn on_query_changed(&self, text: impl Into<String>) {
		self.send(CoordinatorCmd::QueryChanged(text.into()));
	}

	/// Switches the search root. Results from the previous root are discarded.
	pub fn set_root(&self, root: impl Into<PathBuf>) {
		self.send(CoordinatorCmd::SetRoot(root.into()));
	}

	/// Stops the actor. Pending debounce timers are cancelled and in-flight
	/// results are dropped.
	pub fn shutdown(&self) {
		self.send(CoordinatorCmd::Shutdown);
	}

	pub fn snapshot(&self) -> CoordinatorSnapshot {
		self.shared.read().clone()
	}

	pub fn phase(&self) -> SearchPhase {
		self.shared.read().phase
	}

	pub fn generation(&self) -> u64 {
		self.shared.read().generation
	}

	pub fn is_running(&self) -> bool {
		!self.tx.is_closed()
	}

	fn send(&self, cmd: CoordinatorCmd) {
		if self.tx.send(cmd).is_err() {
			debug!("search.coordinator.closed");
		}
	}
}

struct CoordinatorActor {
	root: PathBuf,
	backend: Arc<dyn SearchBackend>,
	debouncer: Debouncer,
	latest_query: String,
	generation: u64,
	/// Whether the worker for `generation` is still running.
	searching: bool,
	workers_in_flight: usize,
	searches_started: u64,
	stale_discarded: u64,
	self_tx: mpsc::WeakUnboundedSender<CoordinatorCmd>,
	events: mpsc::UnboundedSender<SearchEvent>,
	shared: Arc<RwLock<CoordinatorSnapshot>>,
}

impl CoordinatorActor {
	async fn run(mut self, mut rx: mpsc::UnboundedReceiver<CoordinatorCmd>) {
		debug!(root = %self.root.display(), debounce_ms = self.debouncer.delay().as_millis() as u64, "search.coordinator.start");
		while let Some(cmd) = rx.recv().await {
			match cmd {
				CoordinatorCmd::QueryChanged(text) => self.handle_query_changed(text),
				CoordinatorCmd::SetRoot(root) => self.handle_set_root(root),
				CoordinatorCmd::DebounceFired(stamp) => self.handle_debounce_fired(stamp),
				CoordinatorCmd::Worker(outcome) => self.handle_worker(outcome),
				CoordinatorCmd::Shutdown => break,
			}
			self.publish();
		}

		self.debouncer.cancel();
		self.searching = false;
		self.publish();
		debug!(generation = self.generation, "search.coordinator.stop");
	}

	fn handle_query_changed(&mut self, text: String) {
		self.latest_query = text;
		let Some(tx) = self.self_tx.upgrade() else {
			return;
		};
		let stamp = self.debouncer.schedule(move |stamp| {
			let _ = tx.send(CoordinatorCmd::DebounceFired(stamp));
		});
		trace!(stamp = stamp.get(), "search.debounce.schedule");
	}

	fn handle_set_root(&mut self, root: PathBuf) {
		if root == self.root {
			return;
		}
		info!(from = %self.root.display(), to = %root.display(), "search.root.change");
		self.root = root;
		self.generation += 1;
		self.searching = false;
		self.emit(SearchEvent::Filter {
			generation: self.generation,
			update: FilterUpdate::Reset,
		});
	}

	fn handle_debounce_fired(&mut self, stamp: DebounceStamp) {
		if !self.debouncer.accept(stamp) {
			trace!(stamp = stamp.get(), "search.debounce.superseded");
			return;
		}

		let query = self.latest_query.trim().to_lowercase();
		self.generation += 1;
		let generation = self.generation;

		if query.is_empty() {
			self.searching = false;
			debug!(generation, "search.filter.reset");
			self.emit(SearchEvent::Filter {
				generation,
				update: FilterUpdate::Reset,
			});
			return;
		}

		let Some(tx) = self.self_tx.upgrade() else {
			return;
		};
		self.searching = true;
		self.workers_in_flight += 1;
		self.searches_started += 1;
		debug!(generation, query = %query, in_flight = self.workers_in_flight, "search.dispatch");
		self.emit(SearchEvent::Started {
			generation,
			query: query.clone(),
		});

		let request = SearchRequest {
			root: self.root.clone(),
			query,
			generation,
		};
		let backend = Arc::clone(&self.backend);
		lantern_worker::spawn(TaskClass::Background, async move {
			let joined = lantern_worker::spawn_blocking(TaskClass::IoBlocking, move || backend.search(&request)).await;
			let outcome = match joined {
				Ok(Ok(matches)) => WorkerOutcome::Completed(SearchResult { generation, matches }),
				Ok(Err(err)) => WorkerOutcome::Failed {
					generation,
					message: err.to_string(),
				},
				Err(err) => WorkerOutcome::Failed {
					generation,
					message: join_error_panic_message(err).map_or_else(|| "search worker was cancelled".to_string(), |msg| format!("search worker panicked: {msg}")),
				},
			};
			let _ = tx.send(CoordinatorCmd::Worker(outcome));
		});
	}

	fn handle_worker(&mut self, outcome: WorkerOutcome) {
		self.workers_in_flight = self.workers_in_flight.saturating_sub(1);

		let generation = outcome.generation();
		if generation != self.generation {
			self.stale_discarded += 1;
			debug!(generation, current = self.generation, "search.result.stale");
			return;
		}
		self.searching = false;

		match outcome {
			WorkerOutcome::Completed(result) => {
				debug!(generation, matches = result.matches.len(), "search.result.apply");
				self.emit(SearchEvent::Filter {
					generation,
					update: FilterUpdate::Show(Arc::from(result.matches)),
				});
			}
			WorkerOutcome::Failed { generation, message } => {
				warn!(generation, error = %message, "search.result.failed");
				self.emit(SearchEvent::Failed { generation, message });
			}
		}
	}

	fn phase(&self) -> SearchPhase {
		if self.debouncer.is_pending() {
			SearchPhase::Debouncing
		} else if self.searching {
			SearchPhase::Searching
		} else {
			SearchPhase::Idle
		}
	}

	fn emit(&self, event: SearchEvent) {
		if self.events.send(event).is_err() {
			trace!("search.event.dropped");
		}
	}

	fn publish(&self) {
		let mut shared = self.shared.write();
		shared.phase = self.phase();
		shared.generation = self.generation;
		shared.root.clone_from(&self.root);
		shared.last_query.clone_from(&self.latest_query);
		shared.searches_started = self.searches_started;
		shared.stale_discarded = self.stale_discarded;
		shared.workers_in_flight = self.workers_in_flight;
	}
}

#[cfg(test)]
mod tests;
