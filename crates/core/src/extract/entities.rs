//! Character reference decoding.
//!
//! Named references come from the HTML 4 table in `entities.json`. Numeric
//! references follow the browser rules for NUL, surrogates and the C1 range.
//! Nothing here fails: an unrecognized reference is reported as `None` and the
//! caller keeps the `&` as literal text.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use memchr::memchr;

const REPLACEMENT: char = '\u{FFFD}';
const MAX_NAME_LEN: usize = 32;

static NAMED: LazyLock<HashMap<String, char>> = LazyLock::new(|| {
	let json = include_str!("entities.json");
	let raw: HashMap<String, u32> = serde_json::from_str(json).expect("Failed to parse entities.json");
	raw.into_iter().filter_map(|(name, code)| char::from_u32(code).map(|c| (name, c))).collect()
});

/// Code points browsers substitute for numeric references in 0x80..=0x9F.
const WINDOWS_1252: [char; 32] = [
	'\u{20AC}', '\u{81}', '\u{201A}', '\u{192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}', '\u{2C6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}',
	'\u{8D}', '\u{17D}', '\u{8F}', '\u{90}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{2DC}', '\u{2122}',
	'\u{161}', '\u{203A}', '\u{153}', '\u{9D}', '\u{17E}', '\u{178}',
];

/// Decodes the reference at the start of `input`, which begins with `&`.
///
/// Returns the decoded character and the number of bytes the reference spans.
pub fn decode_entity(input: &[u8]) -> Option<(char, usize)> {
	if input.first() != Some(&b'&') {
		return None;
	}
	match input.get(1)? {
		b'#' => decode_numeric(input),
		b if b.is_ascii_alphabetic() => decode_named(input),
		_ => None,
	}
}

/// Decodes every reference in `s`, borrowing when there is nothing to do.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
	let bytes = s.as_bytes();
	if memchr(b'&', bytes).is_none() {
		return Cow::Borrowed(s);
	}

	let mut out = String::with_capacity(s.len());
	let mut copied = 0;
	let mut cursor = 0;
	while let Some(offset) = memchr(b'&', &bytes[cursor..]) {
		let at = cursor + offset;
		if let Some((c, len)) = decode_entity(&bytes[at..]) {
			out.push_str(&s[copied..at]);
			out.push(c);
			copied = at + len;
			cursor = copied;
		} else {
			cursor = at + 1;
		}
	}
	out.push_str(&s[copied..]);
	Cow::Owned(out)
}

fn decode_numeric(input: &[u8]) -> Option<(char, usize)> {
	let (radix, start) = match input.get(2) {
		Some(b'x' | b'X') => (16, 3),
		_ => (10, 2),
	};
	let digits = input.get(start..)?.iter().take_while(|&&b| char::from(b).is_digit(radix)).count();
	if digits == 0 {
		return None;
	}

	let end = start + digits;
	let text = std::str::from_utf8(&input[start..end]).ok()?;
	let value = u32::from_str_radix(text, radix).unwrap_or(u32::MAX);
	let consumed = if input.get(end) == Some(&b';') { end + 1 } else { end };
	Some((numeric_char(value), consumed))
}

fn numeric_char(value: u32) -> char {
	match value {
		0 => REPLACEMENT,
		0x80..=0x9F => WINDOWS_1252[(value - 0x80) as usize],
		_ => char::from_u32(value).unwrap_or(REPLACEMENT),
	}
}

fn decode_named(input: &[u8]) -> Option<(char, usize)> {
	let name_len = input[1..].iter().take(MAX_NAME_LEN + 1).take_while(|b| b.is_ascii_alphanumeric()).count();
	if name_len > MAX_NAME_LEN || input.get(1 + name_len) != Some(&b';') {
		return None;
	}
	let name = std::str::from_utf8(&input[1..1 + name_len]).ok()?;
	NAMED.get(name).map(|&c| (c, name_len + 2))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_known_entities() {
		assert_eq!(decode_entities("&amp;"), "&");
		assert_eq!(decode_entities("&lt;"), "<");
		assert_eq!(decode_entities("Hello&nbsp;World"), "Hello\u{a0}World");
		assert_eq!(decode_entities("caf&eacute; &euro;5"), "café €5");
	}

	#[test]
	fn decodes_numeric_references() {
		assert_eq!(decode_entity(b"&#65;"), Some(('A', 5)));
		assert_eq!(decode_entity(b"&#x41;rest"), Some(('A', 6)));
		assert_eq!(decode_entity(b"&#X263a;"), Some(('\u{263A}', 8)));
		assert_eq!(decode_entity(b"&#65 and"), Some(('A', 4)));
	}

	#[test]
	fn numeric_edge_cases_follow_browsers() {
		assert_eq!(decode_entity(b"&#0;"), Some((REPLACEMENT, 4)));
		assert_eq!(decode_entity(b"&#xD800;"), Some((REPLACEMENT, 8)));
		assert_eq!(decode_entity(b"&#x110000;"), Some((REPLACEMENT, 10)));
		assert_eq!(decode_entity(b"&#99999999999999;"), Some((REPLACEMENT, 17)));
		assert_eq!(decode_entity(b"&#150;"), Some(('\u{2013}', 6)));
	}

	#[test]
	fn unknown_or_malformed_references_pass_through() {
		assert_eq!(decode_entity(b"&bogus;"), None);
		assert_eq!(decode_entity(b"&amp"), None);
		assert_eq!(decode_entity(b"&#;"), None);
		assert_eq!(decode_entity(b"&#x;"), None);
		assert_eq!(decode_entity(b"& "), None);
		assert_eq!(decode_entity(b"&"), None);
		assert_eq!(decode_entities("AT&T &bogus; &#xZZ; fish & chips"), "AT&T &bogus; &#xZZ; fish & chips");
	}

	#[test]
	fn names_are_case_sensitive() {
		assert_eq!(decode_entity(b"&Eacute;"), Some(('É', 8)));
		assert_eq!(decode_entity(b"&AMP;"), None);
	}

	#[test]
	fn borrows_when_nothing_to_decode() {
		assert!(matches!(decode_entities("plain text"), Cow::Borrowed(_)));
	}
}
