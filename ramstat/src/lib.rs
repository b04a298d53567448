//! Memory simulator stats aggregation (`ramstat`)
//!
//! Turns a directory of simulator stats files into per-application and per-experiment tables.

// Modules
pub mod config;
pub mod descriptor;
pub mod discover;
pub mod error;
pub mod export;
pub mod launch;
pub mod metrics;
pub mod pipeline;
pub mod remap;
pub mod stats;
pub mod table;

// Exports
pub use self::{
	config::Config,
	descriptor::{CoreIdx, ExperimentDescriptor},
	error::Error,
	metrics::Metric,
	pipeline::Aggregation,
	table::{PivotTable, ResultTable, Table, TraceTable},
};
