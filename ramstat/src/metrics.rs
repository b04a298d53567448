//! Derived metrics

// Imports
use {
	crate::{table::Row, Error},
	std::fmt,
};

/// Derived metric
#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Metric {
	/// Instructions per cycle
	#[serde(rename = "IPC")]
	Ipc,

	/// Read + write misses
	#[serde(rename = "total_misses")]
	TotalMisses,

	/// Read + write hits
	#[serde(rename = "total_hits")]
	TotalHits,

	/// Read + write conflicts
	#[serde(rename = "total_conflicts")]
	TotalConflicts,

	/// Misses per kilo-instruction
	#[serde(rename = "MPKI")]
	Mpki,

	/// Misses and conflicts per kilo-instruction
	#[serde(rename = "MPKI w/ Conflict")]
	MpkiWithConflicts,
}

impl Metric {
	/// Returns the column name of this metric
	pub const fn name(self) -> &'static str {
		match self {
			Self::Ipc => "IPC",
			Self::TotalMisses => "total_misses",
			Self::TotalHits => "total_hits",
			Self::TotalConflicts => "total_conflicts",
			Self::Mpki => "MPKI",
			Self::MpkiWithConflicts => "MPKI w/ Conflict",
		}
	}

	/// Returns the columns this metric is computed from
	pub const fn inputs(self) -> &'static [&'static str] {
		match self {
			Self::Ipc => &["insts_core", "cycs_core"],
			Self::TotalMisses | Self::Mpki => &["read_misses", "write_misses"],
			Self::TotalHits => &["read_hits", "write_hits"],
			Self::TotalConflicts => &["read_conflicts", "write_conflicts"],
			Self::MpkiWithConflicts => &["read_misses", "write_misses", "read_conflicts", "write_conflicts"],
		}
	}

	/// Computes this metric from its `inputs`, in the order of [`Self::inputs`].
	///
	/// Division by zero is not special-cased, yielding `inf` or `NaN`.
	fn compute(self, inputs: &[f64], instruction_budget: u64) -> f64 {
		let kilo_insts = instruction_budget as f64 / 1000.0;
		match self {
			Self::Ipc => inputs[0] / inputs[1],
			Self::TotalMisses | Self::TotalHits | Self::TotalConflicts => inputs.iter().sum(),
			Self::Mpki | Self::MpkiWithConflicts => inputs.iter().sum::<f64>() / kilo_insts,
		}
	}
}

impl fmt::Display for Metric {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Derives all `metrics` for `row`, appending them after its existing values.
///
/// Fails if any of a metric's inputs is missing. Non-finite results are kept.
pub fn derive<K: fmt::Debug>(row: &mut Row<K>, metrics: &[Metric], instruction_budget: u64) -> Result<(), Error> {
	for &metric in metrics {
		let inputs = metric
			.inputs()
			.iter()
			.map(|&field| {
				row.get(field).ok_or_else(|| Error::MissingRequiredField {
					metric,
					field: field.to_owned(),
				})
			})
			.collect::<Result<Vec<_>, _>>()?;

		let value = metric.compute(&inputs, instruction_budget);
		if !value.is_finite() {
			tracing::warn!(key = ?row.key, %metric, ?inputs, value, "Derived metric is not finite");
		}

		row.values.insert(metric.name().to_owned(), value);
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use {
		super::Metric,
		crate::{table::Row, Error},
	};

	fn row(values: &[(&str, f64)]) -> Row<&'static str> {
		let mut row = Row::new("test");
		row.values
			.extend(values.iter().map(|&(name, value)| (name.to_owned(), value)));
		row
	}

	#[test]
	fn ipc() {
		let mut row = self::row(&[("insts_core", 1000.0), ("cycs_core", 500.0)]);
		super::derive(&mut row, &[Metric::Ipc], 0).expect("Unable to derive");
		assert_eq!(row.get("IPC"), Some(2.0));
		assert_eq!(row.values.keys().last().map(String::as_str), Some("IPC"));
	}

	#[test]
	fn ipc_zero_cycles_is_not_finite() {
		let mut row = self::row(&[("insts_core", 1000.0), ("cycs_core", 0.0)]);
		super::derive(&mut row, &[Metric::Ipc], 0).expect("Unable to derive");
		assert_eq!(row.get("IPC"), Some(f64::INFINITY));

		let mut row = self::row(&[("insts_core", 0.0), ("cycs_core", 0.0)]);
		super::derive(&mut row, &[Metric::Ipc], 0).expect("Unable to derive");
		assert!(row.get("IPC").is_some_and(f64::is_nan));
	}

	#[test]
	fn ipc_missing_cycles() {
		let mut row = self::row(&[("insts_core", 1000.0)]);
		let err = super::derive(&mut row, &[Metric::Ipc], 0).expect_err("Derived IPC without cycles");
		assert!(
			matches!(&err, Error::MissingRequiredField { metric: Metric::Ipc, field } if field == "cycs_core"),
			"Unexpected error: {err}"
		);
		assert_eq!(row.get("IPC"), None);
	}

	#[test]
	fn mpki() {
		let mut row = self::row(&[("read_misses", 10.0), ("write_misses", 5.0)]);
		super::derive(&mut row, &[Metric::TotalMisses, Metric::Mpki], 200_000_000).expect("Unable to derive");
		assert_eq!(row.get("total_misses"), Some(15.0));

		let mpki = row.get("MPKI").expect("Missing MPKI");
		assert!((mpki - 0.000075).abs() < 1e-12, "Unexpected MPKI: {mpki}");
	}

	#[test]
	fn trace_metrics() {
		let mut row = self::row(&[
			("read_hits", 100.0),
			("read_misses", 10.0),
			("read_conflicts", 2.0),
			("write_hits", 50.0),
			("write_misses", 5.0),
			("write_conflicts", 3.0),
		]);
		let metrics = [
			Metric::MpkiWithConflicts,
			Metric::TotalHits,
			Metric::TotalConflicts,
		];
		super::derive(&mut row, &metrics, 1_000_000).expect("Unable to derive");

		assert_eq!(row.get("total_hits"), Some(150.0));
		assert_eq!(row.get("total_conflicts"), Some(5.0));
		assert_eq!(row.get("MPKI w/ Conflict"), Some(0.02));
	}

	#[test]
	fn names_match_serde() {
		for metric in [
			Metric::Ipc,
			Metric::TotalMisses,
			Metric::TotalHits,
			Metric::TotalConflicts,
			Metric::Mpki,
			Metric::MpkiWithConflicts,
		] {
			let json = serde_json::to_string(&metric).expect("Unable to serialize");
			assert_eq!(json, format!("\"{}\"", metric.name()));
		}
	}
}
