//! Memory simulator stats aggregation (`ramstat`)

// Modules
mod args;

// Imports
use {
	self::args::Args,
	anyhow::Context,
	clap::Parser,
	ramstat::{
		export,
		launch::{self, BatchOutcome},
		pipeline::FileFailure,
		Config,
	},
	ramstat_util::logger,
	std::{
		fs,
		path::{Path, PathBuf},
	},
};

/// Rows shown in the results preview
const PREVIEW_ROWS: usize = 200;

fn main() -> Result<(), anyhow::Error> {
	// Get arguments
	let args = Args::parse();
	logger::pre_init::debug(format!("Args: {args:?}"));

	// Initialize logging
	logger::init(args.log_file.as_deref(), args.log_file_append);

	// Then check the sub-command
	match args.sub_cmd {
		args::SubCmd::Tests(cmd) => self::run_tests(cmd),
		args::SubCmd::Traces(cmd) => self::run_traces(cmd),
	}
}

/// Runs the test groups and aggregates their stats
fn run_tests(cmd: args::Tests) -> Result<(), anyhow::Error> {
	let config = self::load_config(&cmd.common)?;
	let stats_dir = cmd.common.stats_dir.clone().unwrap_or_else(|| PathBuf::from("./test_stats"));

	if !cmd.common.existing {
		self::create_stats_dir(&stats_dir)?;
		let jobs = launch::tests_jobs(&config, cmd.scheduler.as_deref(), &stats_dir)
			.context("Unable to create simulator jobs")?;
		let outcome = launch::run_batch(&jobs).context("Unable to run simulations")?;
		self::report_batch(&outcome);
	}

	// Aggregate and save all results
	let aggregation = ramstat::pipeline::aggregate_tests(&stats_dir, &config).context("Unable to aggregate stats")?;
	tracing::info!("Results:\n{}", aggregation.table.preview(PREVIEW_ROWS));

	let output_path = cmd
		.common
		.output_file
		.clone()
		.unwrap_or_else(|| stats_dir.join("test_stats.csv"));
	export::write_table_to_path(&aggregation.table, &output_path)?;
	tracing::info!(?output_path, "Saved results");

	// Then save any pivots
	let mut pivot_failures = 0;
	for metric in &cmd.pivot {
		let pivot_path = stats_dir.join(format!("test_stats_{}.csv", self::sanitize_file_name(metric)));
		let res = aggregation
			.table
			.pivot(metric)
			.with_context(|| format!("Unable to pivot results on {metric:?}"))
			.and_then(|pivot| export::write_table_to_path(&pivot, &pivot_path));
		match res {
			Ok(()) => tracing::info!(?pivot_path, %metric, "Saved pivoted results"),
			Err(err) => {
				tracing::error!("{err:?}");
				pivot_failures += 1;
			},
		}
	}

	self::check_failures(&aggregation.failures, cmd.common.allow_failures)?;
	anyhow::ensure!(pivot_failures == 0, "Unable to save {pivot_failures} pivoted result(s)");

	Ok(())
}

/// Runs every trace alone and aggregates their stats
fn run_traces(cmd: args::Traces) -> Result<(), anyhow::Error> {
	let config = self::load_config(&cmd.common)?;
	let stats_dir = cmd.common.stats_dir.clone().unwrap_or_else(|| PathBuf::from("./base_stats"));

	if !cmd.common.existing {
		self::create_stats_dir(&stats_dir)?;
		let jobs = launch::traces_jobs(&config, &stats_dir).context("Unable to create simulator jobs")?;
		let outcome = launch::run_batch(&jobs).context("Unable to run simulations")?;
		self::report_batch(&outcome);
	}

	let aggregation = ramstat::pipeline::aggregate_traces(&stats_dir, &config).context("Unable to aggregate stats")?;
	tracing::info!("Results:\n{}", aggregation.table.preview(PREVIEW_ROWS));

	let output_path = cmd
		.common
		.output_file
		.clone()
		.unwrap_or_else(|| stats_dir.join("hit_stats.csv"));
	export::write_table_to_path(&aggregation.table, &output_path)?;
	tracing::info!(?output_path, "Saved results");

	self::check_failures(&aggregation.failures, cmd.common.allow_failures)
}

/// Loads the config, or the default one if none was given
fn load_config(common: &args::Common) -> Result<Config, anyhow::Error> {
	let config = match &common.config_file {
		Some(path) => Config::from_path(path)?,
		None => Config::default(),
	};
	tracing::debug!(?config, "Loaded config");

	Ok(config)
}

/// Creates the stats directory, if it doesn't exist
fn create_stats_dir(stats_dir: &Path) -> Result<(), anyhow::Error> {
	if stats_dir.is_dir() {
		tracing::info!(?stats_dir, "Stats directory already exists, skipping creation");
		return Ok(());
	}

	fs::create_dir_all(stats_dir).with_context(|| format!("Unable to create stats directory {stats_dir:?}"))
}

/// Reports all simulations that exited unsuccessfully.
///
/// Their stats files are still aggregated, if they're not empty.
fn report_batch(outcome: &BatchOutcome) {
	if outcome.failed.is_empty() {
		return;
	}

	for (job, status) in &outcome.failed {
		tracing::warn!(stats_path = ?job.stats_path, %status, "Simulation failed, its stats may be incomplete");
	}
	tracing::warn!("{} simulation(s) exited unsuccessfully", outcome.failed.len());
}

/// Reports all stats files that couldn't be processed
fn check_failures(failures: &[FileFailure], allow_failures: bool) -> Result<(), anyhow::Error> {
	if failures.is_empty() {
		return Ok(());
	}

	for failure in failures {
		tracing::warn!(path = ?failure.path, "Stats file was not included: {:#}", failure.err);
	}

	match allow_failures {
		true => Ok(()),
		false => anyhow::bail!("Unable to process {} stats file(s)", failures.len()),
	}
}

/// Replaces all characters unsuitable for a file name with `_`
fn sanitize_file_name(name: &str) -> String {
	name.chars()
		.map(|ch| match ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
			true => ch,
			false => '_',
		})
		.collect()
}
