//! Erebor CLI
//!
//! Runs the ledger demonstration, an interactive shell, or a command
//! script.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use erebor::config::{HISTORY_ENV, STATE_ENV};
use erebor::session::DEMO_SCRIPT;
use erebor::{snapshot, AccountManager, Outcome, Session, Settings};

/// Erebor account and loan ledger
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Snapshot file loaded at startup and saved on exit
    #[arg(long, env = STATE_ENV, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run the built-in walkthrough (the default)
    Demo,

    /// Start an interactive shell
    Shell {
        /// Line history file
        #[arg(long, env = HISTORY_ENV)]
        history: Option<PathBuf>,
    },

    /// Execute commands from a file
    Run {
        /// Script to execute
        file: PathBuf,

        /// Continue past failing lines
        #[arg(long)]
        keep_going: bool,
    },
}

fn settings_from(args: &Args) -> Settings {
    let mut settings = Settings::new().with_verbosity(args.verbose);
    if let Some(state) = &args.state {
        settings = settings.with_state_path(state);
    }
    match &args.command {
        Some(Cmd::Shell {
            history: Some(history),
        }) => settings.with_history_path(history),
        Some(Cmd::Run { keep_going, .. }) => settings.with_keep_going(*keep_going),
        _ => settings,
    }
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn open_session(settings: &Settings) -> Result<Session> {
    let manager = match settings.state_path() {
        Some(path) if path.exists() => snapshot::load(path)
            .with_context(|| format!("failed to load state from {}", path.display()))?,
        Some(path) => {
            info!(path = %path.display(), "no state file yet, starting empty");
            AccountManager::new()
        }
        None => AccountManager::new(),
    };
    Ok(Session::with_manager(manager))
}

fn close_session(session: &Session, settings: &Settings) -> Result<()> {
    if let Some(path) = settings.state_path() {
        snapshot::save(session.manager(), path)
            .with_context(|| format!("failed to save state to {}", path.display()))?;
    }
    Ok(())
}

fn run_demo() -> Result<()> {
    let mut session = Session::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "=== Erebor demo ===")?;
    let summary = session.run_script(DEMO_SCRIPT.as_bytes(), &mut out, true)?;
    writeln!(
        out,
        "=== {} command(s), {} rejected ===",
        summary.executed, summary.failed
    )?;
    Ok(())
}

fn run_file(file: &Path, settings: &Settings) -> Result<()> {
    let stdout = io::stdout();
    run_file_into(file, settings, &mut stdout.lock())
}

/// Lines that succeeded before a failing line are still saved to the state
/// file.
fn run_file_into<W: Write>(file: &Path, settings: &Settings, out: &mut W) -> Result<()> {
    let mut session = open_session(settings)?;
    let reader = BufReader::new(
        File::open(file).with_context(|| format!("failed to open {}", file.display()))?,
    );
    let result = session.run_script(reader, out, settings.keep_going);
    close_session(&session, settings)?;
    let summary = result.with_context(|| format!("script {} failed", file.display()))?;
    info!(
        executed = summary.executed,
        failed = summary.failed,
        "script finished"
    );
    Ok(())
}

fn run_shell(settings: &Settings) -> Result<()> {
    let mut session = open_session(settings)?;
    let mut editor = DefaultEditor::new().context("failed to start line editor")?;
    if editor.load_history(&settings.history_path).is_err() {
        info!(path = %settings.history_path.display(), "no shell history yet");
    }

    println!("Erebor {} (type 'help' for commands)", erebor::VERSION);
    loop {
        match editor.readline("erebor> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = editor.add_history_entry(line.as_str()) {
                        debug!(error = %err, "failed to record history entry");
                    }
                }
                match session.execute(&line) {
                    Ok(Outcome::Message(text)) => println!("{}", text),
                    Ok(Outcome::Silent) => {}
                    Ok(Outcome::Quit) => break,
                    Err(err) => eprintln!("error: {}", err),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("failed to read input"),
        }
    }

    if let Err(err) = editor.save_history(&settings.history_path) {
        warn!(error = %err, "failed to save shell history");
    }
    close_session(&session, settings)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = settings_from(&args);
    init_tracing(&settings);

    match &args.command {
        None | Some(Cmd::Demo) => run_demo(),
        Some(Cmd::Shell { .. }) => run_shell(&settings),
        Some(Cmd::Run { file, .. }) => run_file(file, &settings),
    }
}
