use std::fmt;

/// Dot-separated token category such as `constant.builtin`.
///
/// Python categories are the highlight capture names of the grammar. The path
/// is ordered root-first in its textual form; [`ancestors`] enumerates it
/// most-specific first, which is the order style resolution walks it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category(&'static str);

impl Category {
	/// Text no capture covers.
	pub const TEXT: Self = Self("text");
	/// Text inside a node the grammar could not parse.
	pub const ERROR: Self = Self("error");

	/// Creates a category from a static dotted path.
	pub const fn new(path: &'static str) -> Self {
		Self(path)
	}

	pub const fn as_str(self) -> &'static str {
		self.0
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0)
	}
}

/// Iterates a dotted path and its ancestors, most specific first.
///
/// `ancestors("keyword.control.flow")` yields `keyword.control.flow`,
/// `keyword.control`, `keyword`. The walk is bounded by the path depth.
pub fn ancestors(path: &str) -> Ancestors<'_> {
	Ancestors {
		remaining: (!path.is_empty()).then_some(path),
	}
}

/// Iterator returned by [`ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
	remaining: Option<&'a str>,
}

impl<'a> Iterator for Ancestors<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		let current = self.remaining?;
		self.remaining = current.rfind('.').map(|idx| &current[..idx]).filter(|parent| !parent.is_empty());
		Some(current)
	}
}
