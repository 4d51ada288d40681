use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lantern")]
#[command(about = "Project search, script runner and highlighter for Python projects")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Config file (overrides $LANTERN_CONFIG and the default location)
	#[arg(long, short = 'c', global = true, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// List files whose content contains QUERY (case-insensitive)
	Search {
		query: String,
		/// Project root
		#[arg(long, short = 'r', default_value = ".")]
		root: PathBuf,
	},
	/// Read queries from stdin, one per line, and print debounced results
	Watch {
		/// Project root
		#[arg(long, short = 'r', default_value = ".")]
		root: PathBuf,
	},
	/// Run a Python script with the project's interpreter
	Run {
		script: PathBuf,
		/// Project root used for virtual environment detection
		#[arg(long, short = 'r', default_value = ".")]
		root: PathBuf,
	},
	/// Run an arbitrary program and stream its output
	Exec {
		program: PathBuf,
		#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
		args: Vec<String>,
		/// Working directory
		#[arg(long)]
		cwd: Option<PathBuf>,
	},
	/// Lint a Python script with the configured lint module
	Lint {
		script: PathBuf,
		/// Project root used for virtual environment detection
		#[arg(long, short = 'r', default_value = ".")]
		root: PathBuf,
	},
	/// Install a requirements file into the project's virtual environment
	Install {
		requirements: PathBuf,
		/// Project root used for virtual environment detection
		#[arg(long, short = 'r', default_value = ".")]
		root: PathBuf,
	},
	/// Create a virtual environment in the project root
	Venv {
		/// Project root
		#[arg(long, short = 'r', default_value = ".")]
		root: PathBuf,
	},
	/// Print a file with syntax highlighting
	Highlight {
		file: PathBuf,
		/// Print style spans instead of colored text
		#[arg(long)]
		spans: bool,
	},
}
