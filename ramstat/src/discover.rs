//! Stats file discovery

// Imports
use {
	crate::{descriptor, Error},
	anyhow::Context,
	ramstat_util::PathFileStem,
	std::{
		fs,
		path::{Path, PathBuf},
	},
};

/// A discovered, non-empty, stats file
#[derive(Debug)]
pub struct StatsFile<D> {
	/// Path
	pub path: PathBuf,

	/// Descriptor, parsed from the file stem
	pub descriptor: Result<D, Error>,
}

/// Finds all non-empty stats files in `dir`, sorted by file name.
///
/// Each file's stem is parsed with `describe`. A file whose stem doesn't parse is still
/// returned, carrying the error, so it can be reported alongside the others.
///
/// Empty files are skipped with a warning: they come from simulations that
/// crashed or never ran. Fails with [`Error::NoInputFound`] if nothing is left.
pub fn stats_files<D>(
	dir: &Path,
	mut describe: impl FnMut(&str) -> Result<D, Error>,
) -> Result<Vec<StatsFile<D>>, anyhow::Error> {
	let mut files = vec![];
	for entry in fs::read_dir(dir).with_context(|| format!("Unable to read stats directory {dir:?}"))? {
		let entry = entry.with_context(|| format!("Unable to read entry of {dir:?}"))?;
		let path = entry.path();
		if path.extension().and_then(|ext| ext.to_str()) != Some(descriptor::EXTENSION) {
			continue;
		}

		let metadata = entry
			.metadata()
			.with_context(|| format!("Unable to get metadata of {path:?}"))?;
		if !metadata.is_file() {
			continue;
		}
		if metadata.len() == 0 {
			tracing::warn!(?path, "Skipping empty stats file");
			continue;
		}

		let Some(stem) = path.file_stem_str() else {
			tracing::warn!(?path, "Skipping stats file with non-utf-8 name");
			continue;
		};
		let descriptor = describe(stem);
		files.push(StatsFile { path, descriptor });
	}

	if files.is_empty() {
		return Err(Error::NoInputFound { dir: dir.to_owned() }.into());
	}

	files.sort_by(|lhs, rhs| lhs.path.file_name().cmp(&rhs.path.file_name()));
	tracing::debug!(files = files.len(), ?dir, "Discovered stats files");

	Ok(files)
}
