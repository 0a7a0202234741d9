//! Paragraph assembly from scanner tokens.

use memchr::memchr;
use tracing::trace;

use crate::extract::config::TagRules;
use crate::extract::scanner::{Scanner, Token};
use crate::extract::types::Paragraph;

/// Lazy paragraph stream over one fragment.
///
/// Text is collapsed as it arrives, so a paragraph is ready the moment its
/// boundary is scanned and nothing past that boundary has been read.
pub struct Paragraphs<'a> {
	tokens: Scanner<'a>,
	text: String,
	pending_space: bool,
}

impl<'a> Paragraphs<'a> {
	pub fn new(fragment: &'a [u8], rules: &'a TagRules) -> Self {
		Self {
			tokens: Scanner::new(fragment, rules),
			text: String::new(),
			pending_space: false,
		}
	}

	/// Bytes of the fragment scanned so far.
	pub fn consumed(&self) -> usize {
		self.tokens.offset()
	}

	fn push_str(&mut self, s: &str) {
		for c in s.chars() {
			self.push_char(c);
		}
	}

	fn push_char(&mut self, c: char) {
		if c.is_whitespace() {
			self.soft_break();
			return;
		}
		if self.pending_space {
			self.text.push(' ');
			self.pending_space = false;
		}
		self.text.push(c);
	}

	fn soft_break(&mut self) {
		if !self.text.is_empty() {
			self.pending_space = true;
		}
	}

	/// Finalizes the accumulator, returning it only if it is worth emitting.
	fn take(&mut self) -> Option<Paragraph> {
		self.pending_space = false;
		if self.text.is_empty() {
			return None;
		}

		let text = std::mem::take(&mut self.text);
		if is_degenerate(&text) {
			trace!(target = "zimtext", len = text.len(), "dropping degenerate paragraph");
			return None;
		}
		Some(Paragraph::new(text))
	}
}

impl Iterator for Paragraphs<'_> {
	type Item = Paragraph;

	fn next(&mut self) -> Option<Paragraph> {
		while let Some(token) = self.tokens.next() {
			match token {
				Token::Text(bytes) => self.push_str(&String::from_utf8_lossy(bytes)),
				Token::Entity(c) => self.push_char(c),
				Token::SoftBreak => self.soft_break(),
				Token::Boundary => {
					if let Some(paragraph) = self.take() {
						return Some(paragraph);
					}
				}
				Token::OpenTag { .. } | Token::CloseTag { .. } | Token::Comment | Token::Excluded { .. } => {}
			}
		}
		self.take()
	}
}

/// Collapses every whitespace run to one space and trims both ends.
pub fn normalize_whitespace(s: &str) -> String {
	s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_degenerate(text: &str) -> bool {
	!text.chars().any(char::is_alphanumeric) || contains_markup(text)
}

/// Escaped markup such as `&lt;p&gt;` decodes back into something tag-shaped.
fn contains_markup(text: &str) -> bool {
	let bytes = text.as_bytes();
	memchr(b'<', bytes).is_some_and(|open| memchr(b'>', &bytes[open..]).is_some())
}
