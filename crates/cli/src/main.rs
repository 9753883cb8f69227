mod cmd;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stagbuild_lib::execute::BuildError;

use cmd::{BuildArgs, cmd_build, cmd_fetch, cmd_info, cmd_plan};
use output::{OutputFormat, print_error};

/// Build the STag extension together with its OpenCV dependency
#[derive(Parser)]
#[command(name = "stagbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Fetch, configure and build the dependency, then the extension
  Build {
    #[command(flatten)]
    args: BuildArgs,

    /// Capture tool output and only show it when a stage fails
    #[arg(long)]
    capture: bool,
  },

  /// Show every command a build would run, without running anything
  Plan {
    #[command(flatten)]
    args: BuildArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// Download and extract the dependency sources only
  Fetch {
    #[command(flatten)]
    args: BuildArgs,
  },

  /// Display host platform and tool information
  Info,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match &cli.command {
    Commands::Build { args, capture } => cmd_build(args, *capture),
    Commands::Plan { args, output } => cmd_plan(args, *output),
    Commands::Fetch { args } => cmd_fetch(args),
    Commands::Info => {
      cmd_info();
      Ok(())
    }
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => report_failure(&e),
  }
}

/// Print the error chain and pick the process exit code.
fn report_failure(error: &anyhow::Error) -> ExitCode {
  print_error(&format!("{:#}", error));

  let Some(build_error) = error.downcast_ref::<BuildError>() else {
    return ExitCode::FAILURE;
  };

  if let BuildError::ToolFailed {
    output: Some(output), ..
  } = build_error
  {
    eprintln!();
    eprintln!("{}", output.trim_end());
  }

  ExitCode::from(u8::try_from(build_error.exit_code()).unwrap_or(1))
}
