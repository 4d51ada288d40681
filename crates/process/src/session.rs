use std::sync::Arc;
use std::time::Duration;

use lantern_worker::{GenerationClock, TaskClass, join_error_panic_message};
use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::CommandSpec;
use crate::decode::Utf8Chunker;
use crate::error::{ProcessError, Result};
use crate::event::{ExitSummary, OutputEvent, OutputStream};

const READ_CHUNK: usize = 8 * 1024;

/// How long readers may keep draining once the child has exited or been
/// killed. Grandchildren can hold the pipes open past the child's exit.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Identifies one process session. Ids increase monotonically per manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
	pub const fn from_raw(raw: u64) -> Self {
		Self(raw)
	}

	pub const fn get(self) -> u64 {
		self.0
	}
}

impl std::fmt::Display for SessionId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// The live session, as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
	pub id: SessionId,
	pub command: String,
	pub args: Vec<String>,
}

struct ActiveSession {
	info: SessionInfo,
	cancel: CancellationToken,
}

struct Inner {
	slot: Mutex<Option<ActiveSession>>,
	ids: GenerationClock,
	events: mpsc::UnboundedSender<OutputEvent>,
}

impl Inner {
	fn emit(&self, event: OutputEvent) {
		if self.events.send(event).is_err() {
			debug!("process.event.dropped");
		}
	}
}

/// Single-flight owner of the child process slot.
///
/// Cloning shares the slot. Output is delivered through the receiver
/// returned by [`ProcessManager::new`].
#[derive(Clone)]
pub struct ProcessManager {
	inner: Arc<Inner>,
}

impl ProcessManager {
	pub fn new() -> (Self, mpsc::UnboundedReceiver<OutputEvent>) {
		let (events, rx) = mpsc::unbounded_channel();
		let inner = Arc::new(Inner {
			slot: Mutex::new(None),
			ids: GenerationClock::new(),
			events,
		});
		(Self { inner }, rx)
	}

	/// Launches `spec` in the slot.
	///
	/// Fails with [`ProcessError::AlreadyRunning`] while a session is live and
	/// with [`ProcessError::Spawn`] when the program cannot be started; in both
	/// cases no event is emitted and the slot is unchanged.
	pub fn start(&self, spec: CommandSpec) -> Result<SessionId> {
		let mut slot = self.inner.slot.lock();
		if let Some(active) = slot.as_ref() {
			info!(session = %active.info.id, requested = %spec, "process.start.rejected");
			return Err(ProcessError::AlreadyRunning {
				command: active.info.command.clone(),
			});
		}

		let mut child = {
			let runtime = lantern_worker::runtime_handle();
			let _enter = runtime.enter();
			spec.to_command().spawn().map_err(|source| ProcessError::Spawn {
				program: spec.program_name(),
				source,
			})?
		};

		let id = SessionId(self.inner.ids.next());
		let info = SessionInfo {
			id,
			command: spec.program_name(),
			args: spec.display_args(),
		};
		let cancel = CancellationToken::new();
		info!(session = %id, pid = ?child.id(), command = %spec, "process.start");

		self.inner.emit(OutputEvent::Started {
			session: id,
			command: info.command.clone(),
			args: info.args.clone(),
		});

		let readers = [
			child.stdout.take().map(|out| spawn_reader(&self.inner, id, OutputStream::Stdout, out)),
			child.stderr.take().map(|err| spawn_reader(&self.inner, id, OutputStream::Stderr, err)),
		];
		*slot = Some(ActiveSession {
			info,
			cancel: cancel.clone(),
		});
		drop(slot);

		lantern_worker::spawn(TaskClass::Background, supervise(Arc::clone(&self.inner), id, child, readers, cancel));
		Ok(id)
	}

	/// Kills the live child, if any. Its completion is still reported once,
	/// with `cancelled` set. Returns whether a session was live.
	pub fn cancel(&self) -> bool {
		let slot = self.inner.slot.lock();
		let Some(active) = slot.as_ref() else {
			return false;
		};
		if !active.cancel.is_cancelled() {
			info!(session = %active.info.id, "process.cancel");
			active.cancel.cancel();
		}
		true
	}

	pub fn is_running(&self) -> bool {
		self.inner.slot.lock().is_some()
	}

	pub fn current(&self) -> Option<SessionInfo> {
		self.inner.slot.lock().as_ref().map(|active| active.info.clone())
	}
}

fn spawn_reader<R>(inner: &Arc<Inner>, session: SessionId, stream: OutputStream, reader: R) -> JoinHandle<()>
where
	R: AsyncRead + Unpin + Send + 'static,
{
	let inner = Arc::clone(inner);
	lantern_worker::spawn(TaskClass::Background, async move {
		pump(reader, |text| {
			inner.emit(OutputEvent::Chunk { session, stream, text });
		})
		.await;
		debug!(session = %session, stream = stream.as_str(), "process.stream.eof");
	})
}

/// Forwards decoded chunks from `reader` until end of stream or read error.
pub(crate) async fn pump<R, F>(mut reader: R, mut sink: F)
where
	R: AsyncRead + Unpin,
	F: FnMut(String),
{
	let mut buf = vec![0u8; READ_CHUNK];
	let mut decoder = Utf8Chunker::new();
	loop {
		match reader.read(&mut buf).await {
			Ok(0) => break,
			Ok(n) => {
				let text = decoder.push(&buf[..n]);
				if !text.is_empty() {
					sink(text);
				}
			}
			Err(err) => {
				debug!(error = %err, "process.stream.read_error");
				break;
			}
		}
	}
	let tail = decoder.finish();
	if !tail.is_empty() {
		sink(tail);
	}
}

async fn supervise(inner: Arc<Inner>, id: SessionId, mut child: Child, readers: [Option<JoinHandle<()>>; 2], cancel: CancellationToken) {
	let (status, cancelled) = tokio::select! {
		status = child.wait() => (status, false),
		() = cancel.cancelled() => {
			if let Err(err) = child.start_kill() {
				debug!(session = %id, error = %err, "process.kill.failed");
			}
			(child.wait().await, true)
		}
	};

	let deadline = Instant::now() + DRAIN_GRACE;
	for mut reader in readers.into_iter().flatten() {
		let drained = match tokio::time::timeout_at(deadline, &mut reader).await {
			Ok(joined) => joined,
			Err(_) => {
				debug!(session = %id, "process.stream.abandoned");
				reader.abort();
				continue;
			}
		};
		if let Err(err) = drained
			&& let Some(msg) = join_error_panic_message(err)
		{
			warn!(session = %id, panic = %msg, "process.stream.panicked");
		}
	}

	let code = match status {
		Ok(status) => status.code(),
		Err(err) => {
			warn!(session = %id, error = %err, "process.wait.failed");
			None
		}
	};

	{
		let mut slot = inner.slot.lock();
		if slot.as_ref().is_some_and(|active| active.info.id == id) {
			*slot = None;
		}
	}

	info!(session = %id, code = ?code, cancelled, "process.exit");
	inner.emit(OutputEvent::Completed {
		session: id,
		exit: ExitSummary { code, cancelled },
	});
}
