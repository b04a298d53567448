//! Result tables.
//!
//! A [`Table`] is an ordered collection of rows, each identified by a key and
//! holding named numeric values. Columns are the union of all row values, in the
//! order they were first seen.

// Imports
use {
	crate::{descriptor::CoreIdx, Error},
	indexmap::{IndexMap, IndexSet},
	ramstat_util::display_fn,
	std::{
		collections::{BTreeMap, BTreeSet},
		fmt,
	},
};

/// Row key
pub trait RowKey {
	/// Names of the key columns
	const COLUMNS: &'static [&'static str];

	/// Returns the key cells, one per each of [`Self::COLUMNS`]
	fn cells(&self) -> Vec<String>;
}

/// Table row
#[derive(PartialEq, Clone, Debug)]
pub struct Row<K> {
	/// Key
	pub key: K,

	/// Values, by column
	pub values: IndexMap<String, f64>,
}

impl<K> Row<K> {
	/// Creates a new row without any values
	pub fn new(key: K) -> Self {
		Self {
			key,
			values: IndexMap::new(),
		}
	}

	/// Returns the value at `column`
	pub fn get(&self, column: &str) -> Option<f64> {
		self.values.get(column).copied()
	}
}

/// Table
#[derive(PartialEq, Clone, Debug)]
pub struct Table<K> {
	/// Columns, in order
	columns: IndexSet<String>,

	/// Rows, in insertion order
	rows: Vec<Row<K>>,
}

impl<K> Table<K> {
	/// Creates an empty table
	pub fn new() -> Self {
		Self {
			columns: IndexSet::new(),
			rows:    vec![],
		}
	}

	/// Creates an empty table with pre-declared columns
	pub fn with_columns(columns: impl IntoIterator<Item = String>) -> Self {
		Self {
			columns: columns.into_iter().collect(),
			rows:    vec![],
		}
	}

	/// Appends a row
	pub fn push(&mut self, row: Row<K>) {
		for column in row.values.keys() {
			if !self.columns.contains(column) {
				self.columns.insert(column.clone());
			}
		}
		self.rows.push(row);
	}

	/// Returns all columns, in order
	pub fn columns(&self) -> impl ExactSizeIterator<Item = &str> {
		self.columns.iter().map(String::as_str)
	}

	/// Returns if this table has column `column`
	pub fn has_column(&self, column: &str) -> bool {
		self.columns.contains(column)
	}

	/// Returns all rows, in order
	pub fn rows(&self) -> &[Row<K>] {
		&self.rows
	}

	/// Returns the number of rows
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	/// Returns if this table has no rows
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}
}

impl<K: RowKey> Table<K> {
	/// Returns a display of the first `max_rows` rows, tab-separated
	pub fn preview(&self, max_rows: usize) -> impl fmt::Display + '_ {
		display_fn(move |f| {
			let header = K::COLUMNS.iter().copied().chain(self.columns());
			writeln!(f, "{}", itertools::join(header, "\t"))?;

			for row in self.rows.iter().take(max_rows) {
				let values = self
					.columns
					.iter()
					.map(|column| row.get(column).map_or_else(String::new, |value| value.to_string()));
				writeln!(f, "{}", itertools::join(row.key.cells().into_iter().chain(values), "\t"))?;
			}

			if self.rows.len() > max_rows {
				writeln!(f, "... ({} more rows)", self.rows.len() - max_rows)?;
			}

			Ok(())
		})
	}
}

impl<K> Default for Table<K> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K> Extend<Row<K>> for Table<K> {
	fn extend<I: IntoIterator<Item = Row<K>>>(&mut self, rows: I) {
		for row in rows {
			self.push(row);
		}
	}
}

/// Key of a per-application row
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct AppKey {
	pub scheduler: String,
	pub test_idx:  String,
	pub app:       String,
	pub core:      CoreIdx,
}

impl RowKey for AppKey {
	const COLUMNS: &'static [&'static str] = &["scheduler", "test_idx", "app", "core"];

	fn cells(&self) -> Vec<String> {
		vec![
			self.scheduler.clone(),
			self.test_idx.clone(),
			self.app.clone(),
			self.core.to_string(),
		]
	}
}

/// Key of a per-experiment row
#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub struct ExperimentKey {
	pub scheduler: String,
	pub test_idx:  String,
}

impl RowKey for ExperimentKey {
	const COLUMNS: &'static [&'static str] = &["scheduler", "test_idx"];

	fn cells(&self) -> Vec<String> {
		vec![self.scheduler.clone(), self.test_idx.clone()]
	}
}

/// Key of a per-trace row
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct TraceKey {
	pub trace: String,
}

impl RowKey for TraceKey {
	const COLUMNS: &'static [&'static str] = &["trace"];

	fn cells(&self) -> Vec<String> {
		vec![self.trace.clone()]
	}
}

/// Per-application results, across all experiments
pub type ResultTable = Table<AppKey>;

/// Per-experiment results, with one column per core
pub type PivotTable = Table<ExperimentKey>;

/// Per-trace results
pub type TraceTable = Table<TraceKey>;

impl ResultTable {
	/// Returns the row for `app` in experiment `(scheduler, test_idx)`
	pub fn get(&self, scheduler: &str, test_idx: &str, app: &str) -> Option<&Row<AppKey>> {
		self.rows
			.iter()
			.find(|row| row.key.scheduler == scheduler && row.key.test_idx == test_idx && row.key.app == app)
	}

	/// Pivots this table on `metric`.
	///
	/// Each `(scheduler, test_idx)` becomes a row, in order of first appearance, and each
	/// core label becomes a column, in core order, holding the `metric` of the application
	/// labeled with that core.
	pub fn pivot(&self, metric: &str) -> Result<PivotTable, Error> {
		if !self.has_column(metric) {
			return Err(Error::UnknownMetric {
				metric:  metric.to_owned(),
				columns: self.columns().map(str::to_owned).collect(),
			});
		}

		// Group all cells by experiment
		let mut experiments = IndexMap::<ExperimentKey, BTreeMap<CoreIdx, Option<f64>>>::new();
		let mut cores = BTreeSet::new();
		for row in &self.rows {
			let key = ExperimentKey {
				scheduler: row.key.scheduler.clone(),
				test_idx:  row.key.test_idx.clone(),
			};
			let cells = experiments.entry(key).or_default();
			if cells.insert(row.key.core, row.get(metric)).is_some() {
				return Err(Error::AmbiguousPivot {
					scheduler: row.key.scheduler.clone(),
					test_idx:  row.key.test_idx.clone(),
					core:      row.key.core,
				});
			}
			cores.insert(row.key.core);
		}

		// Then project them into the columns
		let column_name = |core: CoreIdx| format!("{metric} ({core})");
		let mut table = PivotTable::with_columns(cores.iter().map(|&core| column_name(core)));
		for (key, cells) in experiments {
			let mut row = Row::new(key);
			for (core, value) in cells {
				if let Some(value) = value {
					row.values.insert(column_name(core), value);
				}
			}
			table.push(row);
		}

		Ok(table)
	}
}

#[cfg(test)]
mod tests {
	use {
		super::{AppKey, ExperimentKey, ResultTable, Row},
		crate::{descriptor::CoreIdx, Error},
	};

	fn row(scheduler: &str, test_idx: &str, app: &str, core: usize, values: &[(&str, f64)]) -> Row<AppKey> {
		Row {
			key:    AppKey {
				scheduler: scheduler.to_owned(),
				test_idx:  test_idx.to_owned(),
				app:       app.to_owned(),
				core:      CoreIdx::new(core),
			},
			values: values.iter().map(|&(name, value)| (name.to_owned(), value)).collect(),
		}
	}

	#[test]
	fn columns_in_first_seen_order() {
		let mut table = ResultTable::new();
		table.push(row("A", "0", "mcf", 0, &[("insts_core", 1.0), ("IPC", 2.0)]));
		table.push(row("A", "0", "lbm", 1, &[("cycs_core", 1.0), ("insts_core", 3.0)]));

		assert_eq!(table.columns().collect::<Vec<_>>(), ["insts_core", "IPC", "cycs_core"]);
		assert_eq!(table.len(), 2);
		assert_eq!(table.get("A", "0", "lbm").and_then(|row| row.get("cycs_core")), Some(1.0));
		assert!(table.get("A", "1", "lbm").is_none());
	}

	#[test]
	fn pivot() {
		let mut table = ResultTable::new();
		table.extend([
			row("NONE", "0", "mcf", 0, &[("IPC", 1.0)]),
			row("NONE", "0", "lbm", 1, &[("IPC", 2.0)]),
			row("FCFS", "0", "mcf", 1, &[("IPC", 3.0)]),
			row("FCFS", "0", "lbm", 0, &[("insts_core", 4.0)]),
		]);

		let pivot = table.pivot("IPC").expect("Unable to pivot");
		assert_eq!(pivot.columns().collect::<Vec<_>>(), ["IPC (Core 0)", "IPC (Core 1)"]);
		assert_eq!(pivot.len(), 2);

		let rows = pivot.rows();
		assert_eq!(rows[0].key, ExperimentKey {
			scheduler: "NONE".to_owned(),
			test_idx:  "0".to_owned(),
		});
		assert_eq!(rows[0].get("IPC (Core 0)"), Some(1.0));
		assert_eq!(rows[0].get("IPC (Core 1)"), Some(2.0));
		assert_eq!(rows[1].key.scheduler, "FCFS");
		assert_eq!(rows[1].get("IPC (Core 0)"), None);
		assert_eq!(rows[1].get("IPC (Core 1)"), Some(3.0));
	}

	#[test]
	fn pivot_orders_cores_numerically() {
		let mut table = ResultTable::new();
		table.extend([
			row("NONE", "0", "mcf", 10, &[("IPC", 1.0)]),
			row("NONE", "0", "lbm", 2, &[("IPC", 2.0)]),
		]);

		let pivot = table.pivot("IPC").expect("Unable to pivot");
		assert_eq!(pivot.columns().collect::<Vec<_>>(), ["IPC (Core 2)", "IPC (Core 10)"]);
	}

	#[test]
	fn pivot_ambiguous() {
		let mut table = ResultTable::new();
		table.extend([
			row("NONE", "0", "mcf", 0, &[("IPC", 1.0)]),
			row("NONE", "0", "lbm", 1, &[("IPC", 2.0)]),
			row("NONE", "0", "milc", 1, &[("IPC", 3.0)]),
		]);

		let err = table.pivot("IPC").expect_err("Pivoted duplicate cells");
		assert!(
			matches!(&err, Error::AmbiguousPivot { scheduler, test_idx, core } if scheduler == "NONE" && test_idx == "0" && *core == CoreIdx::new(1)),
			"Unexpected error: {err}"
		);
	}

	#[test]
	fn pivot_unknown_metric() {
		let mut table = ResultTable::new();
		table.push(row("NONE", "0", "mcf", 0, &[("IPC", 1.0)]));

		let err = table.pivot("MPKI").expect_err("Pivoted on a missing column");
		assert!(matches!(err, Error::UnknownMetric { .. }), "Unexpected error: {err}");
	}

	#[test]
	fn preview() {
		let mut table = ResultTable::new();
		table.extend([
			row("NONE", "0", "mcf", 0, &[("IPC", 1.5)]),
			row("NONE", "0", "lbm", 1, &[]),
		]);

		assert_eq!(
			table.preview(1).to_string(),
			"scheduler\ttest_idx\tapp\tcore\tIPC\nNONE\t0\tmcf\tCore 0\t1.5\n... (1 more rows)\n"
		);
	}
}
