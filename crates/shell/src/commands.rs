use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use lantern_config::Config;
use lantern_process::{CommandSpec, ExitSummary, OutputEvent, ProcessManager, PythonEnv, run_captured};
use lantern_search::{FilterUpdate, SearchCoordinator, SearchEvent, SearchPhase, search_files};
use lantern_syntax::{BlockHighlighter, Language};
use lantern_worker::TaskClass;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::render::{describe_spans, paint_block};

pub async fn search(config: &Config, root: PathBuf, query: String) -> Result<ExitCode> {
	let needle = query.trim().to_lowercase();
	if needle.is_empty() {
		bail!("query is empty");
	}

	let options = config.search.clone();
	let matches = lantern_worker::spawn_blocking(TaskClass::IoBlocking, move || search_files(&root, &needle, &options))
		.await
		.context("search worker failed")??;

	for name in &matches {
		println!("{name}");
	}
	Ok(if matches.is_empty() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// Feeds stdin lines to a coordinator as query edits and prints every event.
pub async fn watch(config: &Config, root: PathBuf) -> Result<ExitCode> {
	let (coordinator, mut events) = SearchCoordinator::spawn(root, config.search.clone());
	let mut lines = BufReader::new(tokio::io::stdin()).lines();
	let mut stdin_open = true;

	loop {
		tokio::select! {
			line = lines.next_line(), if stdin_open => match line.context("failed to read stdin")? {
				Some(text) => coordinator.on_query_changed(text),
				None => stdin_open = false,
			},
			event = events.recv() => match event {
				Some(event) => print_search_event(&event),
				None => break,
			},
			() = tokio::time::sleep(Duration::from_millis(50)), if !stdin_open => {
				if coordinator.phase() == SearchPhase::Idle {
					break;
				}
			}
		}
	}

	while let Ok(event) = events.try_recv() {
		print_search_event(&event);
	}
	coordinator.shutdown();
	Ok(ExitCode::SUCCESS)
}

fn print_search_event(event: &SearchEvent) {
	match event {
		SearchEvent::Started { generation, query } => println!("[{generation}] searching for {query:?}"),
		SearchEvent::Filter {
			generation,
			update: FilterUpdate::Reset,
		} => println!("[{generation}] filter reset"),
		SearchEvent::Filter {
			generation,
			update: FilterUpdate::Show(names),
		} => {
			if names.is_empty() {
				println!("[{generation}] no matches");
			}
			for name in names.iter() {
				println!("[{generation}] {name}");
			}
		}
		SearchEvent::Failed { generation, message } => eprintln!("[{generation}] search failed: {message}"),
	}
}

pub async fn run(config: &Config, root: PathBuf, script: PathBuf) -> Result<ExitCode> {
	let env = PythonEnv::detect(root, &config.python);
	Ok(exit_code(stream_session(env.run_command(&script)?).await?))
}

pub async fn exec(program: PathBuf, args: Vec<String>, cwd: Option<PathBuf>) -> Result<ExitCode> {
	let mut spec = CommandSpec::new(program).args(args);
	spec.cwd = cwd;
	Ok(exit_code(stream_session(spec).await?))
}

pub async fn install(config: &Config, root: PathBuf, requirements: PathBuf) -> Result<ExitCode> {
	let env = PythonEnv::detect(root, &config.python);
	Ok(exit_code(stream_session(env.install_command(&requirements)?).await?))
}

pub async fn venv(config: &Config, root: PathBuf) -> Result<ExitCode> {
	let env = PythonEnv::detect(root, &config.python);
	let exit = stream_session(env.create_venv_command()?).await?;
	let created = PythonEnv::detect(env.root(), &config.python);
	if exit.success()
		&& let Some(venv) = created.venv()
	{
		println!("Virtual environment created at: {}", venv.display());
	}
	Ok(exit_code(exit))
}

pub async fn lint(config: &Config, root: PathBuf, script: PathBuf) -> Result<ExitCode> {
	let env = PythonEnv::detect(root, &config.python);
	let spec = env.lint_command(&script)?;

	println!("--- Running {} ---", config.python.lint_module);
	let output = run_captured(&spec, config.python.lint_timeout())
		.await
		.with_context(|| format!("error running {}", config.python.lint_module))?;

	if output.stdout.is_empty() {
		println!("No issues found.");
	} else {
		print!("{}", output.stdout);
	}
	if !output.stderr.is_empty() {
		eprint!("{}", output.stderr);
	}
	Ok(if output.success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

pub fn highlight(config: &Config, file: &Path, spans: bool) -> Result<ExitCode> {
	let bytes = std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
	let text = String::from_utf8_lossy(&bytes);
	let table = Arc::new(config.theme.style_table()?);
	let mut highlighter = BlockHighlighter::new(Language::for_path(file), table);

	for (index, line) in text.lines().enumerate() {
		let block_spans = highlighter.highlight_block(line);
		if spans {
			print!("{}", describe_spans(index + 1, line, block_spans));
		} else {
			println!("{}", paint_block(line, block_spans));
		}
	}
	Ok(ExitCode::SUCCESS)
}

/// Runs `spec` in a fresh session, printing rendered output until the
/// completion marker. Ctrl-C cancels the child.
async fn stream_session(spec: CommandSpec) -> Result<ExitSummary> {
	let (manager, mut events) = ProcessManager::new();
	let session = manager.start(spec)?;
	info!(session = %session, "lantern.session.start");

	let ctrl_c = tokio::signal::ctrl_c();
	tokio::pin!(ctrl_c);
	let mut signals = true;
	loop {
		tokio::select! {
			event = events.recv() => {
				let Some(event) = event else {
					bail!("output stream closed before completion");
				};
				let mut stdout = std::io::stdout().lock();
				stdout.write_all(event.render().as_bytes()).context("failed to write output")?;
				stdout.flush().context("failed to write output")?;
				if let OutputEvent::Completed { exit, .. } = event {
					return Ok(exit);
				}
			}
			signal = &mut ctrl_c, if signals => {
				match signal {
					Ok(()) => {
						manager.cancel();
						ctrl_c.set(tokio::signal::ctrl_c());
					}
					Err(err) => {
						warn!(error = %err, "lantern.signal.failed");
						signals = false;
					}
				}
			}
		}
	}
}

fn exit_code(exit: ExitSummary) -> ExitCode {
	if exit.success() {
		return ExitCode::SUCCESS;
	}
	match exit.code.and_then(|code| u8::try_from(code).ok()) {
		Some(code) if code != 0 => ExitCode::from(code),
		_ => ExitCode::FAILURE,
	}
}
