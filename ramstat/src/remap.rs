//! Core to application remapping.
//!
//! Per-core stats are named `<base>_<core-idx>`. Each is re-keyed as `<base>` under
//! the application the experiment ran on that core. An application that ran on
//! several cores gets a single row, labeled with the first of its cores seen.

// Imports
use {
	crate::{
		config::DuplicatePolicy,
		descriptor::{CoreIdx, ExperimentDescriptor},
		stats::RawStatRecord,
		table::{AppKey, Row},
		Error,
	},
	indexmap::IndexMap,
};

/// Remaps all per-core stats in `record` into one row per application.
///
/// Rows are returned in order of the first stat seen for each application.
/// Applications without any stats produce no row. When two stats land on the same
/// `(application, base name)`, `duplicates` decides whether the later one wins.
pub fn remap(
	descriptor: &ExperimentDescriptor,
	record: RawStatRecord,
	duplicates: DuplicatePolicy,
) -> Result<Vec<Row<AppKey>>, Error> {
	let mut rows = IndexMap::<&str, Row<AppKey>>::new();
	for stat in record {
		let Some((base_name, core)) = self::split_core_suffix(&stat.name) else {
			tracing::warn!(stat = %stat.name, "Ignoring stat without a core suffix");
			continue;
		};
		let app = descriptor.app(core).ok_or_else(|| Error::CoreIndexOutOfRange {
			stat:     stat.name.clone(),
			core_idx: core.to_usize(),
			cores:    descriptor.cores(),
		})?;

		let row = rows.entry(app).or_insert_with(|| {
			Row::new(AppKey {
				scheduler: descriptor.scheduler.clone(),
				test_idx: descriptor.test_idx.clone(),
				app: app.to_owned(),
				core,
			})
		});

		if let Some(prev_value) = row.values.insert(base_name.to_owned(), stat.value) {
			match duplicates {
				DuplicatePolicy::Overwrite => tracing::debug!(
					stat = %stat.name,
					app,
					prev_value,
					value = stat.value,
					"Overwriting duplicate stat"
				),
				DuplicatePolicy::Reject =>
					return Err(Error::DuplicateStat {
						stat: stat.name,
						app: app.to_owned(),
						core: row.key.core,
					}),
			}
		}
	}

	Ok(rows.into_values().collect())
}

/// Splits a stat name into its base name and core index
fn split_core_suffix(name: &str) -> Option<(&str, CoreIdx)> {
	let (base_name, core_idx) = name.rsplit_once('_')?;
	if base_name.is_empty() || core_idx.is_empty() || !core_idx.bytes().all(|ch| ch.is_ascii_digit()) {
		return None;
	}

	let core_idx = core_idx.parse().ok()?;
	Some((base_name, CoreIdx::new(core_idx)))
}
