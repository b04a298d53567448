//! Utilities

// Modules
pub mod logger;

// Imports
use std::{fmt, path::Path};

/// Extension trait for `Path` to access its file stem and name as utf-8
#[extend::ext(name = PathFileStem)]
pub impl Path {
	/// Returns the file stem of this path, if it has one and it's valid utf-8.
	fn file_stem_str(&self) -> Option<&str> {
		self.file_stem()?.to_str()
	}

	/// Returns the file name of this path, if it has one and it's valid utf-8.
	fn file_name_str(&self) -> Option<&str> {
		self.file_name()?.to_str()
	}
}

/// Displays a value by calling a formatting closure.
///
/// Created with [`display_fn`]. The closure runs each time the value is formatted.
pub struct DisplayFn<F>(F);

impl<F> fmt::Display for DisplayFn<F>
where
	F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		(self.0)(f)
	}
}

/// Creates a [`fmt::Display`] value out of a formatting closure
#[must_use]
pub const fn display_fn<F>(fmt: F) -> DisplayFn<F>
where
	F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
{
	DisplayFn(fmt)
}
