//! Paragraph selection predicates.

use regex::Regex;

use crate::error::Result;
use crate::extract::sentence::SentenceHeuristic;

/// Rule deciding whether a paragraph is written out.
///
/// Exactly one variant is active for a whole run.
#[derive(Debug, Clone, Default)]
pub enum Selection {
	/// Every paragraph.
	#[default]
	MatchAll,
	/// Paragraphs the heuristic judges to be a single sentence.
	SingleSentence(SentenceHeuristic),
	/// Paragraphs the pattern matches anywhere in their text.
	TextPattern(Regex),
}

impl Selection {
	/// Compiles `pattern` into a [`Selection::TextPattern`].
	pub fn pattern(pattern: &str) -> Result<Self> {
		Ok(Self::TextPattern(Regex::new(pattern)?))
	}

	/// Picks the variant for a run: a non-empty pattern wins over sentence
	/// mode, and with neither every paragraph is accepted.
	pub fn from_options(pattern: Option<&str>, sentences: bool, heuristic: SentenceHeuristic) -> Result<Self> {
		match pattern.filter(|p| !p.is_empty()) {
			Some(pattern) => Self::pattern(pattern),
			None if sentences => Ok(Self::SingleSentence(heuristic)),
			None => Ok(Self::MatchAll),
		}
	}

	pub fn matches(&self, text: &str) -> bool {
		match self {
			Self::MatchAll => true,
			Self::SingleSentence(heuristic) => heuristic.is_single_sentence(text),
			Self::TextPattern(regex) => regex.is_match(text),
		}
	}

	/// Short name used in logs and run summaries.
	pub fn mode(&self) -> &'static str {
		match self {
			Self::MatchAll => "all",
			Self::SingleSentence(_) => "sentences",
			Self::TextPattern(_) => "pattern",
		}
	}
}
