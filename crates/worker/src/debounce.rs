use std::time::Duration;

use tokio::task::JoinHandle;

use crate::TaskClass;

/// Identifies one scheduled debounce fire.
///
/// A fire is only honoured by [`Debouncer::accept`] when its stamp is the most
/// recently scheduled one; aborting the timer task is best-effort and a fire
/// may already be in flight when it is superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceStamp(u64);

impl DebounceStamp {
	pub const fn get(self) -> u64 {
		self.0
	}
}

struct PendingFire {
	stamp: DebounceStamp,
	handle: JoinHandle<()>,
}

/// Cancel-and-reschedule timer owned by a single coordinator.
///
/// Every [`schedule`](Self::schedule) replaces the previous timer, so only the
/// last call within the delay window ever fires.
pub struct Debouncer {
	delay: Duration,
	seq: u64,
	pending: Option<PendingFire>,
}

impl Debouncer {
	pub fn new(delay: Duration) -> Self {
		Self { delay, seq: 0, pending: None }
	}

	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Returns true while a scheduled fire has not been accepted or cancelled.
	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Restarts the timer. `fire` runs after the delay with the new stamp
	/// unless another `schedule` or `cancel` happens first.
	pub fn schedule<F>(&mut self, fire: F) -> DebounceStamp
	where
		F: FnOnce(DebounceStamp) + Send + 'static,
	{
		self.cancel();
		self.seq = self.seq.wrapping_add(1);
		let stamp = DebounceStamp(self.seq);
		let delay = self.delay;
		let handle = crate::spawn(TaskClass::Interactive, async move {
			tokio::time::sleep(delay).await;
			fire(stamp);
		});
		self.pending = Some(PendingFire { stamp, handle });
		stamp
	}

	/// Consumes a delivered fire. Returns false for superseded stamps.
	pub fn accept(&mut self, stamp: DebounceStamp) -> bool {
		match &self.pending {
			Some(pending) if pending.stamp == stamp => {
				self.pending = None;
				true
			}
			_ => false,
		}
	}

	/// Drops the pending fire, if any. Returns true if one was pending.
	pub fn cancel(&mut self) -> bool {
		match self.pending.take() {
			Some(pending) => {
				pending.handle.abort();
				true
			}
			None => false,
		}
	}
}

impl Drop for Debouncer {
	fn drop(&mut self) {
		self.cancel();
	}
}
