//! Simulator batch launching

// Imports
use {
	crate::{
		descriptor::{ExperimentDescriptor, TraceDescriptor, EXTENSION},
		Config,
	},
	anyhow::Context,
	itertools::Itertools,
	ramstat_util::PathFileStem,
	std::{
		collections::BTreeMap,
		fmt,
		fs,
		path::{Path, PathBuf},
		process::{Child, Command, ExitStatus},
	},
};

/// A single simulator invocation
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Job {
	/// Program
	pub program: String,

	/// Arguments
	pub args: Vec<String>,

	/// Stats file the simulator writes to
	pub stats_path: PathBuf,
}

impl Job {
	/// Creates a simulator job writing stats to `stats_path` from `traces`
	fn new(config: &Config, stats_path: PathBuf, traces: impl IntoIterator<Item = PathBuf>) -> Self {
		let simulator = &config.simulator;
		let args = [
			simulator.config_file.clone(),
			format!("--mode={}", simulator.mode),
			"--stats".to_owned(),
			stats_path.display().to_string(),
		]
		.into_iter()
		.chain(traces.into_iter().map(|trace| trace.display().to_string()))
		.collect();

		Self {
			program: simulator.program.clone(),
			args,
			stats_path,
		}
	}
}

impl fmt::Display for Job {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.program)?;
		for arg in &self.args {
			write!(f, " {arg}")?;
		}
		Ok(())
	}
}

/// Creates one job per test group, each running all of the group's traces together.
///
/// `scheduler` labels the output files, defaulting to the configured sentinel.
pub fn tests_jobs(config: &Config, scheduler: Option<&str>, stats_dir: &Path) -> Result<Vec<Job>, anyhow::Error> {
	let trace_dir = Path::new(&config.simulator.tests_trace_dir);
	let trace_files = self::trace_files(trace_dir)?
		.into_iter()
		.map(|path| {
			let name = path.file_name_str().unwrap_or_default();
			(TraceDescriptor::from_file_name(name).trace, path)
		})
		.collect::<BTreeMap<_, _>>();

	config
		.tests
		.groups
		.iter()
		.enumerate()
		.map(|(test_idx, apps)| -> Result<Job, anyhow::Error> {
			let descriptor = ExperimentDescriptor {
				scheduler: scheduler.unwrap_or(&config.tests.no_scheduler).to_owned(),
				test_idx:  test_idx.to_string(),
				apps:      apps.clone(),
			};
			let traces = apps
				.iter()
				.map(|app| {
					trace_files
						.get(app)
						.cloned()
						.with_context(|| format!("No trace file for application {app:?} in {trace_dir:?}"))
				})
				.collect::<Result<Vec<_>, _>>()
				.with_context(|| format!("Unable to build test group {test_idx}: {}", apps.iter().join(", ")))?;

			Ok(Job::new(config, stats_dir.join(descriptor.file_name()), traces))
		})
		.collect()
}

/// Creates one job per trace file
pub fn traces_jobs(config: &Config, stats_dir: &Path) -> Result<Vec<Job>, anyhow::Error> {
	let trace_files = self::trace_files(Path::new(&config.simulator.traces_trace_dir))?;
	let jobs = trace_files
		.into_iter()
		.map(|trace| {
			let name = trace.file_name_str().unwrap_or_default();
			let stats_path = stats_dir.join(format!("{name}.{EXTENSION}"));
			Job::new(config, stats_path, [trace])
		})
		.collect();

	Ok(jobs)
}

/// Returns all files in `dir`, sorted
fn trace_files(dir: &Path) -> Result<Vec<PathBuf>, anyhow::Error> {
	let mut files = vec![];
	for entry in fs::read_dir(dir).with_context(|| format!("Unable to read trace directory {dir:?}"))? {
		let entry = entry.with_context(|| format!("Unable to read entry of {dir:?}"))?;
		let path = entry.path();
		if path.is_file() && path.file_name_str().is_some() {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}

/// Batch output
#[derive(Debug, Default)]
pub struct BatchOutcome {
	/// Jobs that exited unsuccessfully
	pub failed: Vec<(Job, ExitStatus)>,
}

/// Runs all `jobs`.
///
/// Every job is started before any is waited on, so they all run concurrently.
pub fn run_batch(jobs: &[Job]) -> Result<BatchOutcome, anyhow::Error> {
	// Start all the simulations
	// Note: If we fail to start one, we still wait on those already started.
	let mut children = Vec::<(&Job, Child)>::with_capacity(jobs.len());
	let mut first_err = None;
	for job in jobs {
		tracing::info!(%job, "Starting simulation");
		match Command::new(&job.program).args(&job.args).spawn() {
			Ok(child) => children.push((job, child)),
			Err(err) => {
				first_err = Some(anyhow::Error::new(err).context(format!("Unable to start simulation: {job}")));
				break;
			},
		}
	}

	// Then wait for all of them to finish, even if waiting on one fails
	let mut outcome = BatchOutcome::default();
	for (job, mut child) in children {
		let status = match child.wait() {
			Ok(status) => status,
			Err(err) => {
				let err = anyhow::Error::new(err).context(format!("Unable to wait for simulation: {job}"));
				tracing::error!(%job, "Unable to wait for simulation: {err:?}");
				first_err.get_or_insert(err);
				continue;
			},
		};
		if !status.success() {
			tracing::warn!(%job, %status, "Simulation exited unsuccessfully");
			outcome.failed.push((job.clone(), status));
		}
	}

	match first_err {
		Some(err) => Err(err),
		None => {
			tracing::info!(jobs = jobs.len(), failed = outcome.failed.len(), "All simulations finished");
			Ok(outcome)
		},
	}
}
