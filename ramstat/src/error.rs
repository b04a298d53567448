//! Errors

// Imports
use {
	crate::{descriptor::CoreIdx, metrics::Metric},
	std::path::PathBuf,
};

/// Aggregation error
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// File name did not decode to a scheduler, test index and applications
	#[error("Malformed experiment descriptor {stem:?}: expected at least 3 `_`-separated fields, found {fields}")]
	MalformedDescriptor { stem: String, fields: usize },

	/// A stat line didn't have a name and a numeric value
	#[error("Malformed stat line {line_idx}: {line:?}: {reason}")]
	MalformedStatLine {
		/// Line index, 1-based
		line_idx: usize,
		line:     String,
		reason:   &'static str,
	},

	/// A per-core stat referenced a core beyond the experiment's applications
	#[error("Stat {stat:?} references core {core_idx}, but the experiment only has {cores} applications")]
	CoreIndexOutOfRange { stat: String, core_idx: usize, cores: usize },

	/// The same per-core stat was found twice in one experiment
	#[error("Duplicate stat {stat:?} for application {app:?} ({core})")]
	DuplicateStat { stat: String, app: String, core: CoreIdx },

	/// A derived metric's inputs are absent
	#[error("Missing field {field:?} required by metric {metric}")]
	MissingRequiredField { metric: Metric, field: String },

	/// Two records share a pivot cell
	#[error("Ambiguous pivot: more than one record for scheduler {scheduler:?}, test {test_idx:?}, {core}")]
	AmbiguousPivot {
		scheduler: String,
		test_idx:  String,
		core:      CoreIdx,
	},

	/// A pivot was requested on a column the table doesn't have
	#[error("Unknown metric {metric:?}, table has columns {columns:?}")]
	UnknownMetric { metric: String, columns: Vec<String> },

	/// No non-empty stats files were found
	#[error("No non-empty stats files found in {dir:?}")]
	NoInputFound { dir: PathBuf },
}
