//! Experiment descriptors.
//!
//! Stats files are named after the experiment that produced them:
//! `<scheduler>_<test-idx>_<app0>_..._<appN-1>.txt`, where `app_i` ran on core `i`.

// Imports
use {
	crate::Error,
	itertools::Itertools,
	std::fmt,
};

/// Field delimiter in stats file names
pub const DELIMITER: char = '_';

/// Stats file extension
pub const EXTENSION: &str = "txt";

/// Experiment descriptor
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ExperimentDescriptor {
	/// Scheduler / policy label
	pub scheduler: String,

	/// Test index.
	///
	/// Opaque label, not necessarily numeric.
	pub test_idx: String,

	/// Applications, indexed by core
	pub apps: Vec<String>,
}

impl ExperimentDescriptor {
	/// Parses a descriptor from a stats file stem
	pub fn parse(stem: &str) -> Result<Self, Error> {
		let mut fields = stem.split(DELIMITER);
		let (Some(scheduler), Some(test_idx)) = (fields.next(), fields.next()) else {
			return Err(Error::MalformedDescriptor {
				stem:   stem.to_owned(),
				fields: stem.split(DELIMITER).count(),
			});
		};
		let apps = fields.map(str::to_owned).collect::<Vec<_>>();
		if apps.is_empty() {
			return Err(Error::MalformedDescriptor {
				stem:   stem.to_owned(),
				fields: 2,
			});
		}

		Ok(Self {
			scheduler: scheduler.to_owned(),
			test_idx: test_idx.to_owned(),
			apps,
		})
	}

	/// Returns the application running on core `core_idx`
	pub fn app(&self, core_idx: CoreIdx) -> Option<&str> {
		self.apps.get(core_idx.to_usize()).map(String::as_str)
	}

	/// Returns the number of simulated cores
	pub fn cores(&self) -> usize {
		self.apps.len()
	}

	/// Returns the stats file stem for this experiment
	pub fn file_stem(&self) -> String {
		[&self.scheduler, &self.test_idx]
			.into_iter()
			.chain(&self.apps)
			.join(&DELIMITER.to_string())
	}

	/// Returns the stats file name for this experiment
	pub fn file_name(&self) -> String {
		format!("{}.{EXTENSION}", self.file_stem())
	}
}

/// Core index
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Debug)]
pub struct CoreIdx(usize);

impl CoreIdx {
	/// Creates a new core index
	pub const fn new(idx: usize) -> Self {
		Self(idx)
	}

	/// Returns this index as a `usize`
	pub const fn to_usize(self) -> usize {
		self.0
	}
}

impl fmt::Display for CoreIdx {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Core {}", self.0)
	}
}

/// Single-run-per-trace descriptor
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct TraceDescriptor {
	/// Trace label
	pub trace: String,
}

impl TraceDescriptor {
	/// Creates a descriptor from a trace (or trace stats) file name.
	///
	/// Trace files are named `<id>.<trace>[.<ext>...]`. When there is no `.`,
	/// the whole name is used.
	pub fn from_file_name(name: &str) -> Self {
		let trace = name.split('.').nth(1).unwrap_or(name);
		Self {
			trace: trace.to_owned(),
		}
	}
}
