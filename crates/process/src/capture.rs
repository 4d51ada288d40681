use std::time::Duration;

use tracing::{debug, warn};

use crate::command::CommandSpec;
use crate::error::{ProcessError, Result};

/// Collected output of a one-shot run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
	pub code: Option<i32>,
	pub stdout: String,
	pub stderr: String,
}

impl CapturedOutput {
	pub fn success(&self) -> bool {
		self.code == Some(0)
	}
}

/// Runs `spec` to completion and returns both streams, decoded lossily.
///
/// The child is killed if it outlives `timeout`. This path does not touch the
/// [`ProcessManager`](crate::ProcessManager) slot.
pub async fn run_captured(spec: &CommandSpec, timeout: Duration) -> Result<CapturedOutput> {
	let child = spec.to_command().spawn().map_err(|source| ProcessError::Spawn {
		program: spec.program_name(),
		source,
	})?;
	debug!(command = %spec, timeout_ms = timeout.as_millis() as u64, "process.capture.start");

	// Dropping the wait future on timeout drops the child, which kills it.
	let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
		Ok(Ok(output)) => output,
		Ok(Err(source)) => {
			return Err(ProcessError::Io {
				program: spec.program_name(),
				source,
			});
		}
		Err(_) => {
			warn!(command = %spec, timeout_ms = timeout.as_millis() as u64, "process.capture.timeout");
			return Err(ProcessError::Timeout {
				program: spec.program_name(),
				timeout,
			});
		}
	};

	let captured = CapturedOutput {
		code: output.status.code(),
		stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
		stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
	};
	debug!(command = %spec, code = ?captured.code, stdout_len = captured.stdout.len(), "process.capture.done");
	Ok(captured)
}
