//! Configuration

// Imports
use {
	crate::{metrics::Metric, stats::AllowList},
	anyhow::Context,
	std::{fs, path::Path},
};

/// Configuration
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Prefixes stripped from retained stat names, in order
	pub stat_prefixes: Vec<String>,

	/// Instructions each simulation is configured to run for.
	///
	/// Used as the denominator of all `MPKI` metrics.
	pub instruction_budget: u64,

	/// What to do when a per-core stat shows up twice in one experiment
	pub duplicate_stats: DuplicatePolicy,

	/// Per-core (test group) mode
	pub tests: TestsConfig,

	/// Single-run-per-trace mode
	pub traces: TracesConfig,

	/// Simulator invocation
	pub simulator: SimulatorConfig,
}

impl Config {
	/// Loads a config from a json file
	pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
		let config_file = fs::File::open(path).with_context(|| format!("Unable to open config file {path:?}"))?;
		serde_json::from_reader(config_file).with_context(|| format!("Unable to parse config file {path:?}"))
	}

	/// Returns the allow-list for per-core mode
	pub fn tests_allow_list(&self) -> AllowList {
		AllowList::per_core(&self.tests.per_core_stats, self.tests.cores)
	}

	/// Returns the allow-list for single-run-per-trace mode
	pub fn traces_allow_list(&self) -> AllowList {
		AllowList::new(self.traces.stats.iter().cloned())
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			stat_prefixes:      vec!["ramulator.".to_owned(), "record_".to_owned()],
			instruction_budget: 200_000_000,
			duplicate_stats:    DuplicatePolicy::Overwrite,
			tests:              TestsConfig::default(),
			traces:             TracesConfig::default(),
			simulator:          SimulatorConfig::default(),
		}
	}
}

/// Duplicate stat policy
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
	/// The later value silently replaces the earlier one
	Overwrite,

	/// Duplicates are an error
	Reject,
}

/// Per-core mode config
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestsConfig {
	/// Maximum number of simulated cores
	pub cores: usize,

	/// Per-core stat names, without the `_<core>` suffix
	pub per_core_stats: Vec<String>,

	/// Metrics to derive for each application
	pub metrics: Vec<Metric>,

	/// Test groups, each a list of applications, one per core
	pub groups: Vec<Vec<String>>,

	/// Scheduler label used when none is given
	pub no_scheduler: String,
}

impl Default for TestsConfig {
	fn default() -> Self {
		let groups: [&[&str]; 4] = [
			&["libquantum", "leslie3d", "milc", "cactusADM", "GemsFDTD", "lbm", "astar", "zeusmp"],
			&["libquantum", "leslie3d", "milc", "cactusADM", "GemsFDTD", "lbm", "soplex", "xalancbmk"],
			&["libquantum", "leslie3d", "milc", "cactusADM", "wrf", "bzip2", "gcc", "namd"],
			&["GemsFDTD", "lbm", "astar", "milc", "wrf", "bzip2", "gcc", "gobmk"],
		];

		Self {
			cores:          8,
			per_core_stats: vec![
				"ramulator.record_insts_core".to_owned(),
				"ramulator.record_cycs_core".to_owned(),
			],
			metrics:        vec![Metric::Ipc],
			groups:         groups
				.iter()
				.map(|group| group.iter().map(|&app| app.to_owned()).collect())
				.collect(),
			no_scheduler:   "NONE".to_owned(),
		}
	}
}

/// Single-run-per-trace mode config
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TracesConfig {
	/// Stat names to retain
	pub stats: Vec<String>,

	/// Metrics to derive for each trace, in order
	pub metrics: Vec<Metric>,
}

impl Default for TracesConfig {
	fn default() -> Self {
		let stats = ["read", "write"]
			.into_iter()
			.flat_map(|kind| {
				["hits", "misses", "conflicts"]
					.into_iter()
					.map(move |outcome| format!("ramulator.record_{kind}_{outcome}"))
			})
			.collect();

		Self {
			stats,
			metrics: vec![
				Metric::TotalMisses,
				Metric::TotalHits,
				Metric::TotalConflicts,
				Metric::Mpki,
				Metric::MpkiWithConflicts,
			],
		}
	}
}

/// Simulator config
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
	/// Simulator executable
	pub program: String,

	/// Simulator configuration file, passed through as-is
	pub config_file: String,

	/// Simulation mode
	pub mode: String,

	/// Directory with the (unpacked) traces for per-core mode
	pub tests_trace_dir: String,

	/// Directory with the traces for single-run-per-trace mode
	pub traces_trace_dir: String,
}

impl Default for SimulatorConfig {
	fn default() -> Self {
		Self {
			program:          "./ramulator".to_owned(),
			config_file:      "configs/DDR3-config.cfg".to_owned(),
			mode:             "cpu".to_owned(),
			tests_trace_dir:  "./cputraces_unpacked".to_owned(),
			traces_trace_dir: "./cputraces".to_owned(),
		}
	}
}
