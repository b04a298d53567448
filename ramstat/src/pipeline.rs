//! Aggregation pipeline.
//!
//! Drives parsing, remapping and metric derivation over every stats file in
//! a directory, one file at a time, in file name order.

// Imports
use {
	crate::{
		descriptor::{ExperimentDescriptor, TraceDescriptor},
		discover::{self, StatsFile},
		metrics,
		remap,
		stats,
		table::{AppKey, Row, Table, TraceKey},
		Config,
	},
	anyhow::Context,
	std::{
		fs,
		path::{Path, PathBuf},
	},
};

/// Aggregation output
#[derive(Debug)]
pub struct Aggregation<K> {
	/// Rows of all files processed successfully
	pub table: Table<K>,

	/// Files that couldn't be processed
	pub failures: Vec<FileFailure>,
}

/// A file that couldn't be processed
#[derive(Debug)]
pub struct FileFailure {
	/// Path
	pub path: PathBuf,

	/// Error
	pub err: anyhow::Error,
}

/// Aggregates per-core stats files in `dir` into per-application rows.
///
/// Each file must be named after its experiment (see [`ExperimentDescriptor`]).
pub fn aggregate_tests(dir: &Path, config: &Config) -> Result<Aggregation<AppKey>, anyhow::Error> {
	let allow_list = config.tests_allow_list();
	let files = discover::stats_files(dir, ExperimentDescriptor::parse)?;

	let aggregation = self::aggregate(files, |path, descriptor| {
		tracing::trace!(?path, ?descriptor, "Processing experiment");

		let content = self::read(path)?;
		let record = stats::parse(content.lines(), &allow_list, &config.stat_prefixes).context("Unable to parse stats")?;
		let mut rows = remap::remap(&descriptor, record, config.duplicate_stats).context("Unable to remap stats")?;
		for row in &mut rows {
			metrics::derive(row, &config.tests.metrics, config.instruction_budget)
				.with_context(|| format!("Unable to derive metrics for {:?} ({})", row.key.app, row.key.core))?;
		}

		Ok(rows)
	});

	Ok(aggregation)
}

/// Aggregates single-run-per-trace stats files in `dir`, one row per file.
pub fn aggregate_traces(dir: &Path, config: &Config) -> Result<Aggregation<TraceKey>, anyhow::Error> {
	let allow_list = config.traces_allow_list();
	let files = discover::stats_files(dir, |stem| Ok(TraceDescriptor::from_file_name(stem)))?;

	let aggregation = self::aggregate(files, |path, descriptor| {
		let content = self::read(path)?;
		let record = stats::parse(content.lines(), &allow_list, &config.stat_prefixes).context("Unable to parse stats")?;
		let mut row = Row {
			key:    TraceKey {
				trace: descriptor.trace,
			},
			values: record.into_values(),
		};
		metrics::derive(&mut row, &config.traces.metrics, config.instruction_budget)
			.context("Unable to derive metrics")?;

		Ok(vec![row])
	});

	Ok(aggregation)
}

/// Processes all `files`, collecting their rows into a single table.
///
/// Files whose descriptor failed to parse are reported without being processed.
fn aggregate<D, K>(
	files: Vec<StatsFile<D>>,
	mut process: impl FnMut(&Path, D) -> Result<Vec<Row<K>>, anyhow::Error>,
) -> Aggregation<K> {
	let mut table = Table::new();
	let mut failures = vec![];
	for file in files {
		let res = file
			.descriptor
			.context("Unable to parse file name")
			.and_then(|descriptor| process(&file.path, descriptor));
		match res {
			Ok(rows) => {
				tracing::debug!(path = ?file.path, rows = rows.len(), "Processed stats file");
				table.extend(rows);
			},
			Err(err) => {
				tracing::error!(path = ?file.path, "Unable to process stats file: {err:?}");
				failures.push(FileFailure { path: file.path, err });
			},
		}
	}

	Aggregation { table, failures }
}

/// Reads a stats file's contents
fn read(path: &Path) -> Result<String, anyhow::Error> {
	fs::read_to_string(path).with_context(|| format!("Unable to read stats file {path:?}"))
}
