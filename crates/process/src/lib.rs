//! External process execution for the shell.
//!
//! [`ProcessManager`] owns a single child-process slot: it refuses a second
//! `start` while a session is live, streams stdout and stderr as
//! [`OutputEvent`]s while the child runs, and emits exactly one completion
//! marker per session. [`run_captured`] covers one-shot tools that only need
//! their collected output, and [`PythonEnv`] builds the interpreter commands
//! both paths run.

mod capture;
mod command;
mod decode;
mod error;
mod event;
mod python;
mod session;

pub use capture::{CapturedOutput, run_captured};
pub use command::CommandSpec;
pub use decode::Utf8Chunker;
pub use error::{ProcessError, Result};
pub use event::{ExitSummary, OutputEvent, OutputStream};
pub use python::{PythonEnv, PythonOptions};
pub use session::{ProcessManager, SessionId, SessionInfo};
