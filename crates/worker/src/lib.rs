//! Shared worker primitives for the shell's background work.
//!
//! Everything that leaves the interactive path goes through this crate:
//!
//! * [`spawn`] / [`spawn_blocking`] route work onto the current Tokio runtime
//!   (or a lazily built global one) and tag it with a [`TaskClass`] for
//!   tracing.
//! * [`GenerationClock`] hands out monotonic stamps, such as process
//!   session ids.
//! * [`Debouncer`] implements cancel-and-reschedule timers that deliver a
//!   stamped message once input goes quiet.
//! * [`join_error_panic_message`] turns a panicked task into a reportable string.

mod class;
mod debounce;
mod panic;
mod spawn;
mod token;

pub use class::TaskClass;
pub use debounce::{DebounceStamp, Debouncer};
pub use panic::join_error_panic_message;
pub use spawn::{runtime_handle, spawn, spawn_blocking};
pub use token::GenerationClock;
