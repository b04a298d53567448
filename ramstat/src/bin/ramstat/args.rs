//! Arguments

// Imports
use std::path::PathBuf;

/// Arguments
#[derive(Debug)]
#[derive(clap::Parser)]
pub struct Args {
	/// Log file
	///
	/// Specifies a file to perform verbose logging to.
	/// You can use `RUST_LOG_FILE` to set filtering options
	#[clap(long = "log-file")]
	pub log_file: Option<PathBuf>,

	/// Whether to append to the log file
	#[clap(long = "log-file-append")]
	pub log_file_append: bool,

	/// Sub-command
	#[command(subcommand)]
	pub sub_cmd: SubCmd,
}

/// Sub-command
#[derive(Debug, clap::Subcommand)]
pub enum SubCmd {
	/// Runs test groups together and aggregates per-application results
	#[clap(name = "tests")]
	Tests(Tests),

	/// Runs each trace alone and aggregates its hit/miss stats
	#[clap(name = "traces")]
	Traces(Traces),
}

/// Test groups
#[derive(Debug, clap::Args)]
pub struct Tests {
	/// Common
	#[clap(flatten)]
	pub common: Common,

	/// Scheduler label for the output files.
	///
	/// Defaults to the config's `tests.no_scheduler`.
	#[clap(long = "scheduler")]
	pub scheduler: Option<String>,

	/// Metric to additionally output with one column per core.
	///
	/// May be given multiple times.
	#[clap(long = "pivot")]
	pub pivot: Vec<String>,
}

/// Individual traces
#[derive(Debug, clap::Args)]
pub struct Traces {
	/// Common
	#[clap(flatten)]
	pub common: Common,
}

/// Arguments common to all sub-commands
#[derive(Debug, clap::Args)]
pub struct Common {
	/// Config file
	#[clap(long = "config")]
	pub config_file: Option<PathBuf>,

	/// Stats directory
	#[clap(long = "stats-dir")]
	pub stats_dir: Option<PathBuf>,

	/// Output file
	#[clap(short = 'o', long = "output")]
	pub output_file: Option<PathBuf>,

	/// Skips the simulations and only processes existing stats
	#[clap(long = "existing")]
	pub existing: bool,

	/// Exits successfully even if some stats files couldn't be processed
	#[clap(long = "allow-failures")]
	pub allow_failures: bool,
}
