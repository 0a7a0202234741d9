//! HTML-to-paragraph extraction.
//!
//! The stages run lazily front to back: the scanner classifies markup, the
//! assembler turns text into normalized paragraphs, and the emitter applies a
//! [`Selection`] and writes accepted paragraphs until the budget runs out.
//! Each stage lives in its own module so it can be tested on its own.

mod assembler;
mod config;
mod emitter;
mod entities;
mod gate;
mod scanner;
mod selection;
mod sentence;
mod types;

pub use assembler::{Paragraphs, normalize_whitespace};
pub use config::{TagClass, TagRules, default_rules};
pub use emitter::{Extractor, run_extraction};
pub use entities::{decode_entities, decode_entity};
pub use gate::looks_like_html;
pub use scanner::{Scanner, Token};
pub use selection::Selection;
pub use sentence::{DEFAULT_TAIL_OFFSET, SentenceHeuristic};
pub use types::Paragraph;
