//! Simulator stats parsing.
//!
//! The simulator writes one stat per line, as `<name> <value> [comment...]`.

// Imports
use {
	crate::Error,
	indexmap::IndexMap,
	std::collections::HashSet,
};

/// Set of stat names to retain
#[derive(Clone, Debug, Default)]
pub struct AllowList {
	names: HashSet<String>,
}

impl AllowList {
	/// Creates an allow-list from the given names
	pub fn new(names: impl IntoIterator<Item = String>) -> Self {
		Self {
			names: names.into_iter().collect(),
		}
	}

	/// Creates an allow-list of per-core stats.
	///
	/// Each base name `name` is expanded into `name_0`, `name_1`, ..., `name_{cores - 1}`.
	pub fn per_core(base_names: &[String], cores: usize) -> Self {
		let names = (0..cores).flat_map(|core_idx| base_names.iter().map(move |name| format!("{name}_{core_idx}")));
		Self::new(names)
	}

	/// Returns if `name` is allowed
	pub fn contains(&self, name: &str) -> bool {
		self.names.contains(name)
	}
}

/// A single retained stat
#[derive(PartialEq, Clone, Debug)]
pub struct RawStat {
	/// Name, with the configured prefixes stripped
	pub name: String,

	/// Value
	pub value: f64,
}

/// All retained stats of a single simulator run, in file order.
///
/// Names may repeat. Lookups return the last value.
#[derive(PartialEq, Clone, Debug, Default)]
pub struct RawStatRecord {
	stats: Vec<RawStat>,
}

impl RawStatRecord {
	/// Returns the value of stat `name`
	pub fn get(&self, name: &str) -> Option<f64> {
		self.stats.iter().rev().find(|stat| stat.name == name).map(|stat| stat.value)
	}

	/// Returns all stats, in file order
	pub fn iter(&self) -> impl Iterator<Item = &RawStat> {
		self.stats.iter()
	}

	/// Returns the number of stats retained
	pub fn len(&self) -> usize {
		self.stats.len()
	}

	/// Returns if no stats were retained
	pub fn is_empty(&self) -> bool {
		self.stats.is_empty()
	}

	/// Collapses this record into a map.
	///
	/// Keeps the position of the first occurrence of each name and the value of the last.
	pub fn into_values(self) -> IndexMap<String, f64> {
		let mut values = IndexMap::with_capacity(self.stats.len());
		for stat in self.stats {
			values.insert(stat.name, stat.value);
		}
		values
	}
}

impl IntoIterator for RawStatRecord {
	type IntoIter = std::vec::IntoIter<RawStat>;
	type Item = RawStat;

	fn into_iter(self) -> Self::IntoIter {
		self.stats.into_iter()
	}
}

/// Parses all stats from `lines`, retaining only those in `allow_list`.
///
/// Every non-blank line must have a name and a numeric value, even if it isn't retained.
/// Retained names have each of `prefixes` stripped, in order.
pub fn parse<'a>(
	lines: impl IntoIterator<Item = &'a str>,
	allow_list: &AllowList,
	prefixes: &[String],
) -> Result<RawStatRecord, Error> {
	let mut stats = vec![];
	for (line_idx, line) in lines.into_iter().enumerate() {
		let mut fields = line.split_whitespace();
		let Some(name) = fields.next() else {
			continue;
		};

		let malformed = |reason| Error::MalformedStatLine {
			line_idx: line_idx + 1,
			line: line.to_owned(),
			reason,
		};
		let value = fields.next().ok_or_else(|| malformed("missing value"))?;
		let value = value.parse::<f64>().map_err(|_| malformed("value is not a number"))?;

		if allow_list.contains(name) {
			stats.push(RawStat {
				name: self::strip_prefixes(name, prefixes).to_owned(),
				value,
			});
		}
	}

	Ok(RawStatRecord { stats })
}

/// Strips each of `prefixes` from `name`, in order
fn strip_prefixes<'a>(mut name: &'a str, prefixes: &[String]) -> &'a str {
	for prefix in prefixes {
		if let Some(rest) = name.strip_prefix(prefix.as_str()) {
			name = rest;
		}
	}
	name
}

#[cfg(test)]
mod tests {
	use {
		super::{AllowList, RawStat},
		crate::Error,
	};

	fn prefixes() -> Vec<String> {
		vec!["ramulator.".to_owned(), "record_".to_owned()]
	}

	#[test]
	fn retains_only_allowed() {
		let allow_list = AllowList::per_core(&["ramulator.record_insts_core".to_owned()], 2);
		let content = "\
ramulator.record_insts_core_0   1000   # Number of instructions recorded
ramulator.record_cycs_core_0    500    # Number of cycles recorded
ramulator.active_cycles_0       12
ramulator.record_insts_core_1   800
";
		let record = super::parse(content.lines(), &allow_list, &prefixes()).expect("Unable to parse");

		assert_eq!(record.iter().cloned().collect::<Vec<_>>(), [
			RawStat {
				name:  "insts_core_0".to_owned(),
				value: 1000.0,
			},
			RawStat {
				name:  "insts_core_1".to_owned(),
				value: 800.0,
			},
		]);
		assert_eq!(record.get("insts_core_1"), Some(800.0));
		assert_eq!(record.get("cycs_core_0"), None);
	}

	#[test]
	fn unprefixed_names() {
		let allow_list = AllowList::new(["insts_core_0".to_owned()]);
		let record = super::parse(["insts_core_0 1e3", "", "   "], &allow_list, &prefixes()).expect("Unable to parse");
		assert_eq!(record.len(), 1);
		assert_eq!(record.get("insts_core_0"), Some(1000.0));
	}

	#[test]
	fn malformed_line_rejects_file() {
		let allow_list = AllowList::new(["a".to_owned()]);

		// Note: Even lines that wouldn't be retained must be well-formed.
		let err = super::parse(["a 1", "b"], &allow_list, &[]).expect_err("Parsed a line without a value");
		assert!(matches!(err, Error::MalformedStatLine { line_idx: 2, .. }), "Unexpected error: {err}");

		let err = super::parse(["a one"], &allow_list, &[]).expect_err("Parsed a non-numeric value");
		assert!(matches!(err, Error::MalformedStatLine { line_idx: 1, .. }), "Unexpected error: {err}");
	}

	#[test]
	fn duplicates_are_kept_in_order() {
		let allow_list = AllowList::new(["a".to_owned(), "b".to_owned()]);
		let record = super::parse(["a 1", "b 2", "a 3"], &allow_list, &[]).expect("Unable to parse");
		assert_eq!(record.len(), 3);
		assert_eq!(record.get("a"), Some(3.0));

		let values = record.into_values();
		assert_eq!(values.into_iter().collect::<Vec<_>>(), [
			("a".to_owned(), 3.0),
			("b".to_owned(), 2.0)
		]);
	}
}
