//! Command-line interface for the cmdtree demo shell
//!
//! The shell dispatches lines against the sample tree in [`crate::demo`]
//! as a [`ConsoleActor`]. Lines come from the trailing arguments or, when
//! there are none, from stdin.

use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use cmdtree_config::DispatcherConfig;
use cmdtree_utils::error::{CmdtreeError, ConfigError, UserFriendlyError};
use cmdtree_utils::exit_codes::ExitCode;
use cmdtree_utils::logging::init_tracing;
use tracing::{debug, warn};

use crate::demo::{self, ConsoleActor};

/// cmdtree - dispatch and complete commands against a sample command tree
#[derive(Parser, Debug)]
#[command(name = "cmdtree")]
#[command(about = "Dispatch and complete commands against a sample command tree")]
#[command(long_about = r#"
Runs each line through the cmdtree dispatcher as the console actor.

EXAMPLES:
  # Run one command
  cmdtree base create Alpha

  # Run commands from stdin
  printf 'base create Alpha\nbase set mode creative\n' | cmdtree

  # Suggest completions for a partial line (a trailing space starts a new token)
  cmdtree --complete "base set "

  # Grant permissions to the console actor ("*" grants all)
  cmdtree --permission base.delete base del Alpha

CONFIGURATION:
  Configuration is loaded from --config, then CMDTREE_CONFIG, then the first
  cmdtree.toml or .cmdtree/config.toml found searching upward from the CWD.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print completions for a partial line instead of executing
    #[arg(long, value_name = "LINE")]
    pub complete: Option<String>,

    /// Run as a privileged actor
    #[arg(long)]
    pub privileged: bool,

    /// Grant a permission to the console actor (repeatable)
    #[arg(long = "permission", value_name = "TOKEN")]
    pub permissions: Vec<String>,

    /// A single command line to execute
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub line: Vec<String>,
}

/// Parse the process arguments and run the shell.
///
/// # Errors
///
/// Returns the exit code the process should terminate with.
pub fn run() -> Result<(), ExitCode> {
    run_with(Cli::parse())
}

/// Run the shell for already parsed arguments.
///
/// # Errors
///
/// Returns [`ExitCode::CLI_ARGS`] for configuration errors,
/// [`ExitCode::INTERNAL`] when the sample tree fails to build and
/// [`ExitCode::COMMAND_FAILED`] when any line did not execute.
pub fn run_with(cli: Cli) -> Result<(), ExitCode> {
    let config = load_config(&cli).map_err(|error| report(&CmdtreeError::from(error)))?;

    let verbose = cli.verbose || config.logging.verbose;
    if let Err(error) = init_tracing(verbose, config.logging.filter.as_deref()) {
        eprintln!("warning: logging disabled: {error}");
    }

    let dispatcher = demo::dispatcher(config).map_err(|error| report(&CmdtreeError::from(error)))?;
    let actor = ConsoleActor::new(cli.permissions.iter().cloned(), cli.privileged);

    if let Some(line) = &cli.complete {
        for suggestion in dispatcher.complete_line(&actor, line) {
            println!("{suggestion}");
        }
        return Ok(());
    }

    let mut failures = 0_usize;
    if cli.line.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.map_err(|error| report(&CmdtreeError::Io(error)))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if !dispatcher.execute_line(&actor, trimmed).is_executed() {
                failures += 1;
            }
        }
    } else {
        let line = cli.line.join(" ");
        if !dispatcher.execute_line(&actor, &line).is_executed() {
            failures += 1;
        }
    }

    if failures > 0 {
        debug!(failures, "Some lines did not execute");
        return Err(ExitCode::COMMAND_FAILED);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<DispatcherConfig, ConfigError> {
    match &cli.config {
        Some(path) => DispatcherConfig::load(path),
        None => DispatcherConfig::discover(),
    }
}

fn report(error: &CmdtreeError) -> ExitCode {
    match error {
        CmdtreeError::Config(config) => {
            eprintln!("Error: {}", config.user_message());
            if let Some(suggestion) = config.suggestion() {
                eprintln!("  {suggestion}");
            }
        }
        other => eprintln!("Error: {other}"),
    }
    let code = error.to_exit_code();
    warn!(code = code.as_i32(), "Shell aborted");
    code
}
