//! Single-pass markup scanner.
//!
//! [`Scanner`] walks a fragment once, front to back, and classifies each span
//! as a tag, comment, excluded block, character reference or text run. Block
//! structure is reported through [`Token::Boundary`] right after the tag that
//! caused it. The scanner never fails: anything it cannot make sense of is
//! either passed through as text or, inside tags and excluded elements,
//! swallowed up to the end of the fragment.

use memchr::{memchr, memchr2, memmem};

use crate::extract::config::{TagClass, TagRules};
use crate::extract::entities::decode_entity;

/// Elements whose content is raw text: the first matching close tag ends them
/// and a trailing `/>` on the open tag is ignored.
const RAW_TEXT: [&str; 4] = ["script", "style", "textarea", "title"];

/// Foreign elements, the only ones where `/>` really closes the element.
const FOREIGN: [&str; 2] = ["svg", "math"];

/// One classified span of a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
	/// `<name ...>`; the name is lowercased and attributes are dropped.
	OpenTag { name: String, self_closing: bool },
	/// `</name>`.
	CloseTag { name: String },
	/// A comment, declaration, processing instruction or bogus comment.
	Comment,
	/// An excluded element, inner content already discarded.
	Excluded { name: String },
	/// A decoded character reference.
	Entity(char),
	/// Raw bytes between markup.
	Text(&'a [u8]),
	/// Word separator that does not end the paragraph.
	SoftBreak,
	/// End of the current paragraph.
	Boundary,
}

/// Lazy token stream over one fragment.
pub struct Scanner<'a> {
	input: &'a [u8],
	pos: usize,
	rules: &'a TagRules,
	pending: Option<Token<'a>>,
	line_breaks: u8,
}

impl<'a> Scanner<'a> {
	pub fn new(input: &'a [u8], rules: &'a TagRules) -> Self {
		Self {
			input,
			pos: 0,
			rules,
			pending: None,
			line_breaks: 0,
		}
	}

	/// Bytes of the fragment consumed so far.
	pub fn offset(&self) -> usize {
		self.pos
	}

	fn scan_text(&mut self) -> Token<'a> {
		let start = self.pos;
		let end = memchr2(b'<', b'&', &self.input[start + 1..]).map_or(self.input.len(), |offset| start + 1 + offset);
		self.pos = end;
		Token::Text(&self.input[start..end])
	}

	fn scan_reference(&mut self) -> Token<'a> {
		match decode_entity(&self.input[self.pos..]) {
			Some((c, len)) => {
				self.pos += len;
				Token::Entity(c)
			}
			None => self.literal(1),
		}
	}

	fn scan_markup(&mut self) -> Token<'a> {
		let rest = &self.input[self.pos..];
		match rest.get(1) {
			Some(b) if b.is_ascii_alphabetic() => self.scan_open_tag(),
			Some(b'/') => match rest.get(2) {
				Some(b) if b.is_ascii_alphabetic() => self.scan_close_tag(),
				_ => {
					self.skip_past(2, b">");
					Token::Comment
				}
			},
			Some(b'!') => {
				if rest.starts_with(b"<!--") {
					if rest[4..].starts_with(b">") || rest[4..].starts_with(b"->") {
						self.skip_past(4, b">");
					} else {
						self.skip_past(4, b"-->");
					}
				} else if rest.starts_with(b"<![CDATA[") {
					self.skip_past(9, b"]]>");
				} else {
					self.skip_past(2, b">");
				}
				Token::Comment
			}
			Some(b'?') => {
				self.skip_past(2, b">");
				Token::Comment
			}
			_ => self.literal(1),
		}
	}

	fn scan_open_tag(&mut self) -> Token<'a> {
		let name_start = self.pos + 1;
		let (name, name_len) = self.read_name(name_start);
		let (end, self_closing) = find_tag_end(self.input, name_start + name_len);
		self.pos = end;

		let class = self.rules.classify(&name);
		if class == TagClass::Excluded && !(self_closing && FOREIGN.contains(&name.as_str())) {
			self.line_breaks = 0;
			self.skip_excluded(&name);
			return Token::Excluded { name };
		}
		self.after_tag(class);
		Token::OpenTag { name, self_closing }
	}

	fn scan_close_tag(&mut self) -> Token<'a> {
		let name_start = self.pos + 2;
		let (name, name_len) = self.read_name(name_start);
		let (end, _) = find_tag_end(self.input, name_start + name_len);
		self.pos = end;

		match self.rules.classify(&name) {
			TagClass::Excluded => self.line_breaks = 0,
			class => self.after_tag(class),
		}
		Token::CloseTag { name }
	}

	/// Queues the structural signal implied by a tag of `class`.
	fn after_tag(&mut self, class: TagClass) {
		if class == TagClass::LineBreak {
			self.line_breaks += 1;
			if self.line_breaks >= 2 {
				self.line_breaks = 0;
				self.pending = Some(Token::Boundary);
			} else {
				self.pending = Some(Token::SoftBreak);
			}
			return;
		}

		self.line_breaks = 0;
		match class {
			TagClass::Boundary => self.pending = Some(Token::Boundary),
			TagClass::Separator => self.pending = Some(Token::SoftBreak),
			_ => {}
		}
	}

	/// Reads the tag name at `start`, lowercased, with its raw byte length.
	fn read_name(&self, start: usize) -> (String, usize) {
		let len = self.input[start..].iter().take_while(|&&b| !is_name_end(b)).count();
		(String::from_utf8_lossy(&self.input[start..start + len]).to_ascii_lowercase(), len)
	}

	/// Moves past the close tag matching `name`, or to the end of input.
	///
	/// Raw text elements end at the first close tag. Others nest, so the
	/// element ends at the close tag that balances its own opening.
	fn skip_excluded(&mut self, name: &str) {
		if RAW_TEXT.contains(&name) {
			let finder = memmem::Finder::new(b"</");
			let mut cursor = self.pos;
			while let Some(offset) = finder.find(&self.input[cursor..]) {
				let name_start = cursor + offset + 2;
				if self.name_at(name_start, name) {
					self.pos = find_tag_end(self.input, name_start + name.len()).0;
					return;
				}
				cursor = name_start;
			}
			self.pos = self.input.len();
			return;
		}

		let mut depth = 1usize;
		let mut cursor = self.pos;
		while let Some(offset) = memchr(b'<', &self.input[cursor..]) {
			let at = cursor + offset;
			let closing = self.input.get(at + 1) == Some(&b'/');
			let name_start = at + 1 + usize::from(closing);
			if !self.name_at(name_start, name) {
				cursor = at + 1;
				continue;
			}

			let (end, self_closing) = find_tag_end(self.input, name_start + name.len());
			if closing {
				depth -= 1;
				if depth == 0 {
					self.pos = end;
					return;
				}
			} else if !(self_closing && FOREIGN.contains(&name)) {
				depth += 1;
			}
			cursor = end;
		}
		self.pos = self.input.len();
	}

	/// Whether `name` (ASCII case-insensitive) starts at `start` and is followed
	/// by a name delimiter or the end of input.
	fn name_at(&self, start: usize, name: &str) -> bool {
		let end = start + name.len();
		self.input.get(start..end).is_some_and(|candidate| candidate.eq_ignore_ascii_case(name.as_bytes())) && self.input.get(end).is_none_or(|&b| is_name_end(b))
	}

	/// Moves past the first `needle` found after `skip` bytes, or to the end.
	fn skip_past(&mut self, skip: usize, needle: &[u8]) {
		let from = (self.pos + skip).min(self.input.len());
		self.pos = memmem::find(&self.input[from..], needle).map_or(self.input.len(), |offset| from + offset + needle.len());
	}

	fn literal(&mut self, len: usize) -> Token<'a> {
		let start = self.pos;
		self.pos += len;
		Token::Text(&self.input[start..self.pos])
	}
}

impl<'a> Iterator for Scanner<'a> {
	type Item = Token<'a>;

	fn next(&mut self) -> Option<Token<'a>> {
		if let Some(token) = self.pending.take() {
			return Some(token);
		}

		let first = *self.input.get(self.pos)?;
		let token = match first {
			b'<' => self.scan_markup(),
			b'&' => self.scan_reference(),
			_ => self.scan_text(),
		};

		match &token {
			Token::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
			Token::Text(_) | Token::Entity(_) => self.line_breaks = 0,
			_ => {}
		}
		Some(token)
	}
}

fn is_name_end(b: u8) -> bool {
	b.is_ascii_whitespace() || b == b'/' || b == b'>'
}

/// Finds the `>` closing a tag whose attributes start at `from`.
///
/// Quotes only open after `=`, so a stray apostrophe in an unquoted attribute
/// does not swallow the rest of the document. Returns the position after `>`
/// and whether the tag was written self-closing.
fn find_tag_end(input: &[u8], from: usize) -> (usize, bool) {
	let mut quote: Option<u8> = None;
	let mut after_equals = false;
	let mut previous = 0u8;

	for (i, &b) in input.iter().enumerate().skip(from) {
		if let Some(q) = quote {
			if b == q {
				quote = None;
			}
			continue;
		}

		match b {
			b'>' => return (i + 1, previous == b'/'),
			b'"' | b'\'' if after_equals => quote = Some(b),
			b'=' => after_equals = true,
			_ if b.is_ascii_whitespace() => {}
			_ => after_equals = false,
		}
		if !b.is_ascii_whitespace() {
			previous = b;
		}
	}

	(input.len(), false)
}
