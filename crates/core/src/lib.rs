//! Clean paragraph extraction from HTML fragments.
//!
//! `zimtext` turns raw HTML into one-line paragraphs for text corpora. It does
//! not build a DOM: a streaming scanner strips markup, keeps block boundaries
//! and drops script-like content, even when the markup is broken.
//!
//! ```ignore
//! use zimtext::{Selection, run_extraction};
//!
//! let mut out = Vec::new();
//! let written = run_extraction(b"<p>Hello.</p><p>World.</p>", &mut out, &Selection::MatchAll, 10)?;
//! assert_eq!(written, 2);
//! ```

mod error;
pub mod extract;

pub use error::{ExtractError, Result};
pub use extract::{
	DEFAULT_TAIL_OFFSET, Extractor, Paragraph, Paragraphs, Scanner, Selection, SentenceHeuristic, TagClass, TagRules, Token, decode_entities, decode_entity,
	default_rules, looks_like_html, normalize_whitespace, run_extraction,
};
