use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::command::CommandSpec;
use crate::error::{ProcessError, Result};

/// Interpreter and tooling settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PythonOptions {
	/// Interpreter used when the project has no virtual environment.
	pub interpreter: PathBuf,
	/// Directory names checked, in order, for a virtual environment.
	pub venv_dirs: Vec<String>,
	pub lint_module: String,
	pub lint_timeout_secs: u64,
}

impl Default for PythonOptions {
	fn default() -> Self {
		Self {
			interpreter: PathBuf::from(if cfg!(windows) { "python" } else { "python3" }),
			venv_dirs: vec!["venv".to_string(), ".venv".to_string()],
			lint_module: "flake8".to_string(),
			lint_timeout_secs: 15,
		}
	}
}

impl PythonOptions {
	pub fn lint_timeout(&self) -> Duration {
		Duration::from_secs(self.lint_timeout_secs)
	}
}

/// Interpreter resolution for one project root.
#[derive(Debug, Clone)]
pub struct PythonEnv {
	root: PathBuf,
	venv: Option<PathBuf>,
	options: PythonOptions,
}

impl PythonEnv {
	/// Searches `root` for the first configured virtual environment directory.
	pub fn detect(root: impl Into<PathBuf>, options: &PythonOptions) -> Self {
		let root = root.into();
		let venv = options.venv_dirs.iter().map(|dir| root.join(dir)).find(|path| path.is_dir());
		match &venv {
			Some(path) => debug!(root = %root.display(), venv = %path.display(), "python.venv.found"),
			None => debug!(root = %root.display(), "python.venv.missing"),
		}
		Self {
			root,
			venv,
			options: options.clone(),
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn venv(&self) -> Option<&Path> {
		self.venv.as_deref()
	}

	/// The venv interpreter when one was found, else the configured fallback.
	pub fn interpreter(&self) -> PathBuf {
		match &self.venv {
			Some(venv) => venv_tool(venv, "python"),
			None => self.options.interpreter.clone(),
		}
	}

	pub fn pip(&self) -> Option<PathBuf> {
		self.venv.as_deref().map(|venv| venv_tool(venv, "pip"))
	}

	/// `<python> <script>`, run from the project root.
	pub fn run_command(&self, script: &Path) -> Result<CommandSpec> {
		ensure_python_source(script)?;
		Ok(CommandSpec::new(self.interpreter()).arg(script).current_dir(&self.root))
	}

	/// `<python> -m <lint module> <script>`.
	pub fn lint_command(&self, script: &Path) -> Result<CommandSpec> {
		ensure_python_source(script)?;
		Ok(CommandSpec::new(self.interpreter())
			.args(["-m", self.options.lint_module.as_str()])
			.arg(script)
			.current_dir(&self.root))
	}

	/// `<venv pip> install -r <requirements>`. Requires a virtual environment.
	pub fn install_command(&self, requirements: &Path) -> Result<CommandSpec> {
		let pip = self.pip().ok_or_else(|| ProcessError::NoVirtualEnv { root: self.root.clone() })?;
		Ok(CommandSpec::new(pip)
			.args(["install", "-r"])
			.arg(requirements)
			.current_dir(&self.root))
	}

	/// `<fallback python> -m venv <root>/<first venv dir>`. Refuses to
	/// overwrite an existing directory.
	pub fn create_venv_command(&self) -> Result<CommandSpec> {
		let name = self.options.venv_dirs.first().map_or("venv", String::as_str);
		let target = self.root.join(name);
		if target.exists() {
			return Err(ProcessError::VirtualEnvExists { path: target });
		}
		Ok(CommandSpec::new(&self.options.interpreter)
			.args(["-m", "venv"])
			.arg(target)
			.current_dir(&self.root))
	}
}

fn venv_tool(venv: &Path, name: &str) -> PathBuf {
	let bin = if cfg!(windows) { "Scripts" } else { "bin" };
	venv.join(bin).join(format!("{name}{}", std::env::consts::EXE_SUFFIX))
}

fn ensure_python_source(path: &Path) -> Result<()> {
	let is_python = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("py"));
	if is_python {
		Ok(())
	} else {
		Err(ProcessError::NotPythonSource { path: path.to_path_buf() })
	}
}
