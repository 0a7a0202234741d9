//! Public types produced by extraction.

use std::fmt;

/// A normalized, markup-free run of text bounded by block structure.
///
/// The text is never empty, has no leading or trailing whitespace, and every
/// whitespace run inside it is a single ASCII space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
	text: String,
}

impl Paragraph {
	pub(crate) fn new(text: String) -> Self {
		Self { text }
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn into_text(self) -> String {
		self.text
	}
}

impl fmt::Display for Paragraph {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.text)
	}
}
