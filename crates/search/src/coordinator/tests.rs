use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;

use super::*;
use crate::error::SearchError;

const DEBOUNCE: Duration = Duration::from_millis(40);

/// Returns canned matches per query and records every request.
#[derive(Default)]
struct RecordingBackend {
	answers: HashMap<String, Vec<String>>,
	requests: Mutex<Vec<SearchRequest>>,
}

impl RecordingBackend {
	fn with(mut self, query: &str, matches: &[&str]) -> Self {
		self.answers.insert(query.to_string(), matches.iter().map(|m| m.to_string()).collect());
		self
	}

	fn queries(&self) -> Vec<String> {
		self.requests.lock().iter().map(|r| r.query.clone()).collect()
	}
}

impl SearchBackend for RecordingBackend {
	fn search(&self, request: &SearchRequest) -> Result<Vec<String>, SearchError> {
		self.requests.lock().push(request.clone());
		Ok(self.answers.get(&request.query).cloned().unwrap_or_default())
	}
}

/// Blocks each query until the test releases it.
#[derive(Default)]
struct GatedBackend {
	gates: Mutex<HashMap<String, std::sync::mpsc::Receiver<Vec<String>>>>,
}

impl GatedBackend {
	fn gate(&self, query: &str) -> std::sync::mpsc::Sender<Vec<String>> {
		let (tx, rx) = std::sync::mpsc::channel();
		self.gates.lock().insert(query.to_string(), rx);
		tx
	}
}

impl SearchBackend for GatedBackend {
	fn search(&self, request: &SearchRequest) -> Result<Vec<String>, SearchError> {
		let rx = self.gates.lock().remove(&request.query).expect("query was gated");
		Ok(rx.recv().unwrap_or_default())
	}
}

struct FailingBackend;

impl SearchBackend for FailingBackend {
	fn search(&self, request: &SearchRequest) -> Result<Vec<String>, SearchError> {
		Err(SearchError::RootUnavailable {
			root: request.root.clone(),
			reason: "gone".to_string(),
		})
	}
}

struct PanickingBackend;

impl SearchBackend for PanickingBackend {
	fn search(&self, _request: &SearchRequest) -> Result<Vec<String>, SearchError> {
		panic!("index corrupted");
	}
}

fn root() -> PathBuf {
	PathBuf::from("/proj")
}

async fn next_event(rx: &mut UnboundedReceiver<SearchEvent>) -> SearchEvent {
	tokio::time::timeout(Duration::from_secs(5), rx.recv())
		.await
		.expect("timed out waiting for search event")
		.expect("event channel closed")
}

async fn wait_until(coordinator: &SearchCoordinator, what: &str, cond: impl Fn(&CoordinatorSnapshot) -> bool) {
	let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
	loop {
		if cond(&coordinator.snapshot()) {
			return;
		}
		assert!(tokio::time::Instant::now() < deadline, "timed out waiting for {what}: {:?}", coordinator.snapshot());
		tokio::time::sleep(Duration::from_millis(5)).await;
	}
}

fn shown(names: &[&str]) -> FilterUpdate {
	FilterUpdate::Show(names.iter().map(|n| n.to_string()).collect::<Vec<_>>().into())
}

#[tokio::test]
async fn burst_of_edits_runs_one_search_for_latest_text() {
	let debounce = Duration::from_millis(150);
	let backend = Arc::new(RecordingBackend::default().with("import os", &["a.py"]));
	let (coordinator, mut events) = SearchCoordinator::with_backend(root(), debounce, backend.clone());

	for text in ["i", "im", "imp", "import", "import o", "import os"] {
		coordinator.on_query_changed(text);
		tokio::time::sleep(Duration::from_millis(5)).await;
	}

	assert_eq!(
		next_event(&mut events).await,
		SearchEvent::Started {
			generation: 1,
			query: "import os".to_string(),
		}
	);
	assert_eq!(
		next_event(&mut events).await,
		SearchEvent::Filter {
			generation: 1,
			update: shown(&["a.py"]),
		}
	);

	tokio::time::sleep(debounce * 2).await;
	assert_eq!(backend.queries(), vec!["import os".to_string()]);
	let snapshot = coordinator.snapshot();
	assert_eq!(snapshot.searches_started, 1);
	assert_eq!(snapshot.last_query, "import os");
	assert_eq!(snapshot.phase, SearchPhase::Idle);
}

#[tokio::test]
async fn query_is_trimmed_and_lowercased() {
	let backend = Arc::new(RecordingBackend::default());
	let (coordinator, mut events) = SearchCoordinator::with_backend(root(), DEBOUNCE, backend.clone());

	coordinator.on_query_changed("  Import OS ");
	assert!(matches!(next_event(&mut events).await, SearchEvent::Started { ref query, .. } if query == "import os"));
	next_event(&mut events).await;

	let requests = backend.requests.lock().clone();
	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].query, "import os");
	assert_eq!(requests[0].root, root());
	assert_eq!(requests[0].generation, 1);
}

#[tokio::test]
async fn stale_result_is_discarded_when_it_finishes_last() {
	let backend = Arc::new(GatedBackend::default());
	let old_gate = backend.gate("old");
	let new_gate = backend.gate("new");
	let (coordinator, mut events) = SearchCoordinator::with_backend(root(), DEBOUNCE, backend.clone());

	coordinator.on_query_changed("old");
	assert_eq!(next_event(&mut events).await.generation(), 1);
	coordinator.on_query_changed("new");
	assert_eq!(next_event(&mut events).await.generation(), 2);
	wait_until(&coordinator, "two workers", |s| s.workers_in_flight == 2).await;

	new_gate.send(vec!["b.py".to_string()]).unwrap();
	assert_eq!(
		next_event(&mut events).await,
		SearchEvent::Filter {
			generation: 2,
			update: shown(&["b.py"]),
		}
	);

	old_gate.send(vec!["a.py".to_string()]).unwrap();
	wait_until(&coordinator, "stale discard", |s| s.stale_discarded == 1).await;
	assert_eq!(events.try_recv(), Err(TryRecvError::Empty));

	let snapshot = coordinator.snapshot();
	assert_eq!(snapshot.generation, 2);
	assert_eq!(snapshot.workers_in_flight, 0);
	assert_eq!(snapshot.phase, SearchPhase::Idle);
}

#[tokio::test]
async fn phase_tracks_debounce_and_search() {
	let backend = Arc::new(GatedBackend::default());
	let gate = backend.gate("slow");
	let (coordinator, mut events) = SearchCoordinator::with_backend(root(), DEBOUNCE, backend.clone());
	assert_eq!(coordinator.phase(), SearchPhase::Idle);

	coordinator.on_query_changed("slow");
	wait_until(&coordinator, "debouncing", |s| s.phase == SearchPhase::Debouncing).await;

	next_event(&mut events).await;
	wait_until(&coordinator, "searching", |s| s.phase == SearchPhase::Searching).await;

	gate.send(Vec::new()).unwrap();
	next_event(&mut events).await;
	wait_until(&coordinator, "idle", |s| s.phase == SearchPhase::Idle).await;
}

#[tokio::test]
async fn empty_query_resets_without_searching() {
	let backend = Arc::new(RecordingBackend::default().with("x", &["x.py"]));
	let (coordinator, mut events) = SearchCoordinator::with_backend(root(), DEBOUNCE, backend.clone());

	coordinator.on_query_changed("x");
	next_event(&mut events).await;
	assert_eq!(
		next_event(&mut events).await,
		SearchEvent::Filter {
			generation: 1,
			update: shown(&["x.py"]),
		}
	);

	coordinator.on_query_changed("   ");
	assert_eq!(
		next_event(&mut events).await,
		SearchEvent::Filter {
			generation: 2,
			update: FilterUpdate::Reset,
		}
	);
	assert_eq!(backend.queries().len(), 1);
	assert_eq!(coordinator.snapshot().searches_started, 1);
}

#[tokio::test]
async fn clearing_the_query_drops_an_in_flight_search() {
	let backend = Arc::new(GatedBackend::default());
	let gate = backend.gate("slow");
	let (coordinator, mut events) = SearchCoordinator::with_backend(root(), DEBOUNCE, backend.clone());

	coordinator.on_query_changed("slow");
	assert!(matches!(next_event(&mut events).await, SearchEvent::Started { generation: 1, .. }));

	coordinator.on_query_changed("");
	assert_eq!(
		next_event(&mut events).await,
		SearchEvent::Filter {
			generation: 2,
			update: FilterUpdate::Reset,
		}
	);

	gate.send(vec!["slow.py".to_string()]).unwrap();
	wait_until(&coordinator, "stale discard", |s| s.stale_discarded == 1).await;
	assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn no_matches_is_distinct_from_reset() {
	let backend = Arc::new(RecordingBackend::default());
	let (coordinator, mut events) = SearchCoordinator::with_backend(root(), DEBOUNCE, backend);

	coordinator.on_query_changed("absent");
	next_event(&mut events).await;
	assert_eq!(
		next_event(&mut events).await,
		SearchEvent::Filter {
			generation: 1,
			update: shown(&[]),
		}
	);
}

#[tokio::test]
async fn backend_error_becomes_failed_event() {
	let (coordinator, mut events) = SearchCoordinator::with_backend(root(), DEBOUNCE, Arc::new(FailingBackend));

	coordinator.on_query_changed("anything");
	next_event(&mut events).await;
	let event = next_event(&mut events).await;
	assert!(matches!(event, SearchEvent::Failed { generation: 1, ref message } if message.contains("gone")), "{event:?}");
	wait_until(&coordinator, "idle", |s| s.phase == SearchPhase::Idle).await;
}

#[tokio::test]
async fn worker_panic_becomes_failed_event() {
	let (coordinator, mut events) = SearchCoordinator::with_backend(root(), DEBOUNCE, Arc::new(PanickingBackend));

	coordinator.on_query_changed("anything");
	next_event(&mut events).await;
	let event = next_event(&mut events).await;
	assert!(matches!(event, SearchEvent::Failed { generation: 1, ref message } if message.contains("index corrupted")), "{event:?}");

	coordinator.on_query_changed("again");
	assert!(matches!(next_event(&mut events).await, SearchEvent::Started { generation: 2, .. }));
}

#[tokio::test]
async fn root_change_invalidates_in_flight_search() {
	let backend = Arc::new(GatedBackend::default());
	let gate = backend.gate("q");
	let (coordinator, mut events) = SearchCoordinator::with_backend(root(), DEBOUNCE, backend.clone());

	coordinator.on_query_changed("q");
	next_event(&mut events).await;
	coordinator.set_root("/other");
	assert_eq!(
		next_event(&mut events).await,
		SearchEvent::Filter {
			generation: 2,
			update: FilterUpdate::Reset,
		}
	);
	assert_eq!(coordinator.snapshot().root, Path::new("/other"));

	gate.send(vec!["q.py".to_string()]).unwrap();
	wait_until(&coordinator, "stale discard", |s| s.stale_discarded == 1).await;
	assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn shutdown_cancels_pending_debounce() {
	let backend = Arc::new(RecordingBackend::default());
	let (coordinator, mut events) = SearchCoordinator::with_backend(root(), DEBOUNCE, backend.clone());

	coordinator.on_query_changed("never");
	coordinator.shutdown();
	tokio::time::timeout(Duration::from_secs(5), async {
		while coordinator.is_running() {
			tokio::time::sleep(Duration::from_millis(5)).await;
		}
	})
	.await
	.expect("coordinator stopped");

	tokio::time::sleep(DEBOUNCE * 3).await;
	assert!(backend.queries().is_empty());
	assert!(events.recv().await.is_none());
}

#[tokio::test]
async fn filesystem_search_end_to_end() {
	let dir = tempfile::tempdir().unwrap();
	std::fs::write(dir.path().join("a.py"), "import os\n").unwrap();
	std::fs::write(dir.path().join("b.md"), "# readme\n").unwrap();

	let options = SearchOptions {
		debounce_ms: 20,
		..SearchOptions::default()
	};
	let (coordinator, mut events) = SearchCoordinator::spawn(dir.path().to_path_buf(), options);
	coordinator.on_query_changed("import os");

	assert!(matches!(next_event(&mut events).await, SearchEvent::Started { generation: 1, .. }));
	assert_eq!(
		next_event(&mut events).await,
		SearchEvent::Filter {
			generation: 1,
			update: shown(&["a.py"]),
		}
	);
}
