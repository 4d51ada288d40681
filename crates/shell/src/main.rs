//! Lantern shell binary.
//!
//! Drives the shell core from the command line:
//! - content search, one-shot or debounced from stdin
//! - script, lint and install runs with streamed output
//! - ANSI syntax highlighting of source files

mod cli;
mod commands;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use lantern_config::Config;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let config = Config::discover(cli.config.as_deref()).context("failed to load configuration")?;
	tracing::debug!(?config, "config.resolved");

	match cli.command {
		Command::Search { query, root } => commands::search(&config, root, query).await,
		Command::Watch { root } => commands::watch(&config, root).await,
		Command::Run { script, root } => commands::run(&config, root, script).await,
		Command::Exec { program, args, cwd } => commands::exec(program, args, cwd).await,
		Command::Lint { script, root } => commands::lint(&config, root, script).await,
		Command::Install { requirements, root } => commands::install(&config, root, requirements).await,
		Command::Venv { root } => commands::venv(&config, root).await,
		Command::Highlight { file, spans } => commands::highlight(&config, &file, spans),
	}
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("lantern=debug,lantern_search=debug,lantern_process=debug,lantern_syntax=debug,lantern_config=debug,info")
			} else {
				EnvFilter::new("lantern=info,warn")
			}
		})
	};

	// LANTERN_LOG_DIR keeps logs out of the streamed output.
	if let Some(log_dir) = std::env::var("LANTERN_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("lantern.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer().with_writer(file).with_ansi(false).with_target(true);

			tracing_subscriber::registry().with(filter()).with(file_layer).init();

			tracing::info!(path = ?log_path, "lantern.tracing.init");
			return;
		}
	}

	tracing_subscriber::fmt().with_env_filter(filter()).with_writer(std::io::stderr).init();
}
