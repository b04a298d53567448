//! Table export.
//!
//! Tables are written as csv: a header row with the key columns followed by the value
//! columns, then one line per row. Missing values are left empty.

// Imports
use {
	crate::table::{RowKey, Table},
	anyhow::Context,
	std::{fs, io, path::Path},
};

/// Writes `table` as csv to `writer`
pub fn write_table<K: RowKey>(table: &Table<K>, writer: impl io::Write) -> Result<(), anyhow::Error> {
	let mut writer = csv::Writer::from_writer(writer);

	let header = K::COLUMNS.iter().copied().chain(table.columns());
	writer.write_record(header).context("Unable to write header")?;

	for row in table.rows() {
		let values = table
			.columns()
			.map(|column| row.get(column).map_or_else(String::new, |value| value.to_string()));
		writer
			.write_record(row.key.cells().into_iter().chain(values))
			.context("Unable to write row")?;
	}

	writer.flush().context("Unable to flush output")?;
	Ok(())
}

/// Writes `table` as csv to the file at `path`, replacing it
pub fn write_table_to_path<K: RowKey>(table: &Table<K>, path: &Path) -> Result<(), anyhow::Error> {
	let file = fs::File::create(path).with_context(|| format!("Unable to create output file {path:?}"))?;
	self::write_table(table, io::BufWriter::new(file)).with_context(|| format!("Unable to write table to {path:?}"))
}

/// A table read back from csv, as strings
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ImportedTable {
	/// Header
	pub header: Vec<String>,

	/// Rows
	pub rows: Vec<Vec<String>>,
}

impl ImportedTable {
	/// Returns the cell at row `row_idx` and column `column`
	pub fn cell(&self, row_idx: usize, column: &str) -> Option<&str> {
		let column_idx = self.header.iter().position(|name| name == column)?;
		self.rows.get(row_idx)?.get(column_idx).map(String::as_str)
	}
}

/// Reads a table written by [`write_table`]
pub fn read_table(reader: impl io::Read) -> Result<ImportedTable, anyhow::Error> {
	let mut reader = csv::Reader::from_reader(reader);
	let header = reader
		.headers()
		.context("Unable to read header")?
		.iter()
		.map(str::to_owned)
		.collect();

	let rows = reader
		.records()
		.map(|record| -> Result<Vec<String>, anyhow::Error> {
			let record = record.context("Unable to read row")?;
			Ok(record.iter().map(str::to_owned).collect())
		})
		.collect::<Result<_, _>>()?;

	Ok(ImportedTable { header, rows })
}
