//! Selection and line emission under a paragraph budget.

use std::io::Write;

use tracing::{debug, trace};

use crate::error::Result;
use crate::extract::assembler::Paragraphs;
use crate::extract::config::{TagRules, default_rules};
use crate::extract::selection::Selection;
use crate::extract::types::Paragraph;

/// Reusable extraction settings for a whole run.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
	rules: TagRules,
	selection: Selection,
}

impl Extractor {
	pub fn new(selection: Selection) -> Self {
		Self {
			rules: TagRules::default(),
			selection,
		}
	}

	/// Replaces the embedded element classification.
	pub fn with_rules(mut self, rules: TagRules) -> Self {
		self.rules = rules;
		self
	}

	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	/// Lazily yields every paragraph of `fragment`, before selection.
	pub fn paragraphs<'a>(&'a self, fragment: &'a [u8]) -> Paragraphs<'a> {
		Paragraphs::new(fragment, &self.rules)
	}

	/// Writes selected paragraphs of `fragment` to `sink`, one per line, and
	/// returns how many were written.
	///
	/// At most `budget` lines are written; scanning stops as soon as the last
	/// one is out. Only sink errors are reported.
	pub fn process<W: Write + ?Sized>(&self, fragment: &[u8], sink: &mut W, budget: usize) -> Result<usize> {
		emit(self.paragraphs(fragment), sink, &self.selection, budget)
	}
}

/// One-shot extraction with the embedded tag rules.
pub fn run_extraction<W: Write + ?Sized>(fragment: &[u8], sink: &mut W, selection: &Selection, budget: usize) -> Result<usize> {
	emit(Paragraphs::new(fragment, default_rules()), sink, selection, budget)
}

fn emit<W: Write + ?Sized>(paragraphs: impl Iterator<Item = Paragraph>, sink: &mut W, selection: &Selection, budget: usize) -> Result<usize> {
	if budget == 0 {
		return Ok(0);
	}

	let mut written = 0;
	let mut rejected = 0;
	for paragraph in paragraphs {
		if !selection.matches(paragraph.text()) {
			rejected += 1;
			trace!(target = "zimtext", mode = selection.mode(), len = paragraph.text().len(), "paragraph rejected");
			continue;
		}

		sink.write_all(paragraph.text().as_bytes())?;
		sink.write_all(b"\n")?;
		written += 1;
		if written == budget {
			debug!(target = "zimtext", written, "budget exhausted mid-fragment");
			break;
		}
	}

	trace!(target = "zimtext", written, rejected, "fragment done");
	Ok(written)
}
