use std::future::Future;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

use crate::TaskClass;

/// Returns the ambient runtime handle, building a small global runtime when
/// the caller is not inside one (CLI helpers and plain `#[test]` functions).
pub fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(2)
			.thread_name("lantern-worker-global")
			.build()
			.expect("failed to build lantern-worker global tokio runtime")
	});
	runtime.handle().clone()
}

/// Spawns an async task tagged with `class`.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	runtime_handle().spawn(fut)
}

/// Runs `f` on the blocking pool tagged with `class`.
pub fn spawn_blocking<F, R>(class: TaskClass, f: F) -> JoinHandle<R>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn_blocking");
	runtime_handle().spawn_blocking(f)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn spawn_outside_runtime_uses_global_runtime() {
		let (tx, rx) = std::sync::mpsc::channel();
		let _handle = spawn(TaskClass::Background, async move {
			let _ = tx.send(7u32);
		});
		let value = rx.recv_timeout(std::time::Duration::from_secs(2)).expect("task must run");
		assert_eq!(value, 7);
	}

	#[tokio::test]
	async fn spawn_blocking_returns_value() {
		let value = spawn_blocking(TaskClass::IoBlocking, || 40 + 2).await.expect("join");
		assert_eq!(value, 42);
	}
}
