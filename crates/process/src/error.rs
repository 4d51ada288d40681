use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T, E = ProcessError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ProcessError {
	/// A session is live; the new request was rejected and the live one left untouched.
	#[error("a process is already running: {command}")]
	AlreadyRunning { command: String },

	#[error("failed to start {program}: {source}")]
	Spawn {
		program: String,
		#[source]
		source: std::io::Error,
	},

	#[error("{program} did not finish within {}s", timeout.as_secs_f64())]
	Timeout { program: String, timeout: Duration },

	#[error("i/o error while running {program}: {source}")]
	Io {
		program: String,
		#[source]
		source: std::io::Error,
	},

	#[error("no virtual environment found under {}", root.display())]
	NoVirtualEnv { root: PathBuf },

	#[error("a virtual environment already exists at {}", path.display())]
	VirtualEnvExists { path: PathBuf },

	#[error("{} is not a Python source file", path.display())]
	NotPythonSource { path: PathBuf },
}
