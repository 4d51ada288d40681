use crate::session::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputStream {
	Stdout,
	Stderr,
}

impl OutputStream {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Stdout => "stdout",
			Self::Stderr => "stderr",
		}
	}
}

/// How a session ended. `code` is `None` when the child was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitSummary {
	pub code: Option<i32>,
	pub cancelled: bool,
}

impl ExitSummary {
	pub fn success(&self) -> bool {
		!self.cancelled && self.code == Some(0)
	}
}

/// Events streamed to the output sink, in order per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
	Started {
		session: SessionId,
		command: String,
		args: Vec<String>,
	},
	Chunk {
		session: SessionId,
		stream: OutputStream,
		text: String,
	},
	/// Emitted exactly once per session, after the slot is free again.
	Completed { session: SessionId, exit: ExitSummary },
}

impl OutputEvent {
	pub fn session(&self) -> SessionId {
		match self {
			Self::Started { session, .. } | Self::Chunk { session, .. } | Self::Completed { session, .. } => *session,
		}
	}

	/// Text appended to the output pane for this event.
	pub fn render(&self) -> String {
		match self {
			Self::Started { command, args, .. } => {
				let script = args
					.last()
					.map(std::path::Path::new)
					.filter(|path| path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("py")));
				let name = script
					.unwrap_or_else(|| std::path::Path::new(command))
					.file_name()
					.map_or_else(|| command.clone(), |name| name.to_string_lossy().into_owned());
				format!("--- Running {name} ---\n")
			}
			Self::Chunk {
				stream: OutputStream::Stdout,
				text,
				..
			} => text.clone(),
			Self::Chunk {
				stream: OutputStream::Stderr,
				text,
				..
			} => format!("ERROR: {text}"),
			Self::Completed { exit, .. } if exit.cancelled => "\n--- Process cancelled ---\n".to_string(),
			Self::Completed { exit, .. } => match exit.code {
				Some(code) if code != 0 => format!("\n--- Script finished (exit code {code}) ---\n"),
				_ => "\n--- Script finished ---\n".to_string(),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn session() -> SessionId {
		SessionId::from_raw(1)
	}

	#[test]
	fn stderr_chunks_render_with_error_prefix() {
		let event = OutputEvent::Chunk {
			session: session(),
			stream: OutputStream::Stderr,
			text: "boom\n".to_string(),
		};
		assert_eq!(event.render(), "ERROR: boom\n");

		let event = OutputEvent::Chunk {
			session: session(),
			stream: OutputStream::Stdout,
			text: "ok\n".to_string(),
		};
		assert_eq!(event.render(), "ok\n");
	}

	#[test]
	fn started_names_the_script() {
		let event = OutputEvent::Started {
			session: session(),
			command: "/proj/venv/bin/python".to_string(),
			args: vec!["/proj/main.py".to_string()],
		};
		assert_eq!(event.render(), "--- Running main.py ---\n");
	}

	#[test]
	fn started_without_script_names_the_program() {
		let event = OutputEvent::Started {
			session: session(),
			command: "sh".to_string(),
			args: vec!["-c".to_string(), "sleep 4 & echo done".to_string()],
		};
		assert_eq!(event.render(), "--- Running sh ---\n");

		let event = OutputEvent::Started {
			session: session(),
			command: "/usr/bin/python3".to_string(),
			args: vec!["-V".to_string()],
		};
		assert_eq!(event.render(), "--- Running python3 ---\n");
	}

	#[test]
	fn completion_marker_reflects_exit() {
		let done = |code, cancelled| OutputEvent::Completed {
			session: session(),
			exit: ExitSummary { code, cancelled },
		};
		assert_eq!(done(Some(0), false).render(), "\n--- Script finished ---\n");
		assert_eq!(done(Some(2), false).render(), "\n--- Script finished (exit code 2) ---\n");
		assert_eq!(done(None, true).render(), "\n--- Process cancelled ---\n");
		assert!(ExitSummary { code: Some(0), cancelled: false }.success());
		assert!(!ExitSummary { code: Some(0), cancelled: true }.success());
	}
}
