use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;

/// A ready-to-launch command: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
	pub program: PathBuf,
	pub args: Vec<OsString>,
	pub cwd: Option<PathBuf>,
}

impl CommandSpec {
	pub fn new(program: impl Into<PathBuf>) -> Self {
		Self {
			program: program.into(),
			args: Vec::new(),
			cwd: None,
		}
	}

	pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
		self.args.push(arg.into());
		self
	}

	pub fn args<I, S>(mut self, args: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<OsString>,
	{
		self.args.extend(args.into_iter().map(Into::into));
		self
	}

	pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.cwd = Some(dir.into());
		self
	}

	pub fn program_name(&self) -> String {
		self.program.display().to_string()
	}

	/// Arguments rendered lossily for display and events.
	pub fn display_args(&self) -> Vec<String> {
		self.args.iter().map(|arg| arg.to_string_lossy().into_owned()).collect()
	}

	/// Builds a child command with stdin closed and both output streams piped.
	pub(crate) fn to_command(&self) -> tokio::process::Command {
		let mut cmd = tokio::process::Command::new(&self.program);
		cmd.args(&self.args).stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true);
		if let Some(cwd) = &self.cwd {
			cmd.current_dir(cwd);
		}
		cmd
	}
}

impl std::fmt::Display for CommandSpec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.program.display())?;
		for arg in &self.args {
			write!(f, " {}", arg.to_string_lossy())?;
		}
		Ok(())
	}
}
