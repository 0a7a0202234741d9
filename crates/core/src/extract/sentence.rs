//! Punctuation heuristic for "this paragraph is one sentence".

/// Default number of characters allowed after the terminal mark.
pub const DEFAULT_TAIL_OFFSET: usize = 2;

/// Counts sentence-terminal punctuation to guess whether a paragraph holds
/// exactly one sentence.
///
/// A run of `.`, `!` or `?` counts as a sentence end when it is followed by
/// the end of the text or by whitespace, optionally after closing quotes or
/// brackets. Decimal points, ellipses and dots after a lone letter (initials,
/// `e.g.`) never count. The paragraph is a single sentence when exactly one
/// run counts and no more than `tail_offset` characters follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceHeuristic {
	tail_offset: usize,
}

impl Default for SentenceHeuristic {
	fn default() -> Self {
		Self {
			tail_offset: DEFAULT_TAIL_OFFSET,
		}
	}
}

impl SentenceHeuristic {
	pub fn with_tail_offset(mut self, tail_offset: usize) -> Self {
		self.tail_offset = tail_offset;
		self
	}

	pub fn tail_offset(&self) -> usize {
		self.tail_offset
	}

	pub fn is_single_sentence(&self, text: &str) -> bool {
		let chars: Vec<char> = text.chars().collect();
		let mut last_end = None;
		let mut i = 0;

		while i < chars.len() {
			if !is_terminal(chars[i]) {
				i += 1;
				continue;
			}

			let start = i;
			while i < chars.len() && is_terminal(chars[i]) {
				i += 1;
			}
			if ends_sentence(&chars, start, i) {
				if last_end.is_some() {
					return false;
				}
				last_end = Some(i);
			}
		}

		last_end.is_some_and(|end| chars.len() - end <= self.tail_offset)
	}
}

fn is_terminal(c: char) -> bool {
	matches!(c, '.' | '!' | '?')
}

fn is_closer(c: char) -> bool {
	matches!(c, '"' | '\'' | ')' | ']' | '}' | '»' | '›' | '”' | '’')
}

/// Decides whether the terminal run `chars[start..end]` ends a sentence.
fn ends_sentence(chars: &[char], start: usize, end: usize) -> bool {
	let run = &chars[start..end];
	if run.len() >= 2 && run.iter().all(|&c| c == '.') {
		return false;
	}

	if run == ['.'] {
		let before = start.checked_sub(1).map(|i| chars[i]);
		let after = chars.get(end).copied();
		if before.is_some_and(|c| c.is_ascii_digit()) && after.is_some_and(|c| c.is_ascii_digit()) {
			return false;
		}
		let before_letter = start.checked_sub(2).map(|i| chars[i]);
		if before.is_some_and(char::is_alphabetic) && !before_letter.is_some_and(char::is_alphanumeric) {
			return false;
		}
	}

	let mut next = end;
	while chars.get(next).copied().is_some_and(is_closer) {
		next += 1;
	}
	chars.get(next).is_none_or(|c| c.is_whitespace())
}
