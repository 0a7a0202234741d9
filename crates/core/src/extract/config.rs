//! Element classification loaded from `tags.json`.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use serde::Deserialize;

use crate::error::{ExtractError, Result};

static DEFAULT_RULES: LazyLock<TagRules> = LazyLock::new(|| {
	let json = include_str!("tags.json");
	TagRules::from_json(json).expect("Failed to parse tags.json")
});

/// How the scanner treats an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
	/// Opening or closing the element ends the current paragraph.
	Boundary,
	/// The element and everything inside it is dropped.
	Excluded,
	/// No effect on text flow.
	Inline,
	/// The line break element; two in a row end the paragraph.
	LineBreak,
	/// Anything else separates words but keeps the paragraph open.
	Separator,
}

#[derive(Debug, Deserialize)]
struct RawRules {
	boundary: Vec<String>,
	excluded: Vec<String>,
	#[serde(default)]
	inline: Vec<String>,
	#[serde(default = "default_line_break")]
	line_break: String,
}

fn default_line_break() -> String {
	"br".to_string()
}

/// Element name sets driving paragraph segmentation.
#[derive(Debug, Clone)]
pub struct TagRules {
	boundary: HashSet<String>,
	excluded: HashSet<String>,
	inline: HashSet<String>,
	line_break: String,
}

impl TagRules {
	/// Parses rules from the JSON schema used by the embedded `tags.json`.
	///
	/// Names are matched case-insensitively. A name listed as excluded wins over
	/// any other class.
	pub fn from_json(json: &str) -> Result<Self> {
		let raw: RawRules = serde_json::from_str(json).map_err(ExtractError::Rules)?;
		let lower = |names: Vec<String>| names.into_iter().map(|n| n.trim().to_ascii_lowercase()).filter(|n| !n.is_empty()).collect();
		Ok(Self {
			boundary: lower(raw.boundary),
			excluded: lower(raw.excluded),
			inline: lower(raw.inline),
			line_break: raw.line_break.trim().to_ascii_lowercase(),
		})
	}

	/// Reads and parses a rules file.
	pub fn load(path: &Path) -> Result<Self> {
		let json = std::fs::read_to_string(path)?;
		Self::from_json(&json)
	}

	/// Classifies a lowercase element name.
	pub fn classify(&self, name: &str) -> TagClass {
		if self.excluded.contains(name) {
			TagClass::Excluded
		} else if name == self.line_break {
			TagClass::LineBreak
		} else if self.boundary.contains(name) {
			TagClass::Boundary
		} else if self.inline.contains(name) {
			TagClass::Inline
		} else {
			TagClass::Separator
		}
	}
}

impl Default for TagRules {
	fn default() -> Self {
		DEFAULT_RULES.clone()
	}
}

/// Shared instance of the embedded rules.
pub fn default_rules() -> &'static TagRules {
	&DEFAULT_RULES
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	#[test]
	fn embedded_rules_load() {
		let rules = default_rules();
		assert_eq!(rules.classify("p"), TagClass::Boundary);
		assert_eq!(rules.classify("script"), TagClass::Excluded);
		assert_eq!(rules.classify("em"), TagClass::Inline);
		assert_eq!(rules.classify("br"), TagClass::LineBreak);
		assert_eq!(rules.classify("td"), TagClass::Separator);
	}

	#[test]
	fn custom_rules_are_lowercased() {
		let rules = TagRules::from_json(r#"{"boundary": ["TD"], "excluded": ["Table"]}"#).unwrap();
		assert_eq!(rules.classify("td"), TagClass::Boundary);
		assert_eq!(rules.classify("table"), TagClass::Excluded);
		assert_eq!(rules.classify("p"), TagClass::Separator);
		assert_eq!(rules.classify("br"), TagClass::LineBreak);
	}

	#[test]
	fn excluded_wins_over_boundary() {
		let rules = TagRules::from_json(r#"{"boundary": ["aside"], "excluded": ["aside"]}"#).unwrap();
		assert_eq!(rules.classify("aside"), TagClass::Excluded);
	}

	#[test]
	fn invalid_json_is_rejected() {
		assert!(matches!(TagRules::from_json("{\"boundary\": 3}"), Err(ExtractError::Rules(_))));
	}

	#[test]
	fn loads_rules_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, r#"{{"boundary": ["p"], "excluded": ["nav"], "inline": ["b"]}}"#).unwrap();
		let rules = TagRules::load(file.path()).unwrap();
		assert_eq!(rules.classify("nav"), TagClass::Excluded);
		assert_eq!(rules.classify("b"), TagClass::Inline);
	}
}
