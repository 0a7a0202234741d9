use std::path::PathBuf;

use clap::Parser;
use zimtext::DEFAULT_TAIL_OFFSET;

use crate::summary::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "zimtext")]
#[command(about = "Write the paragraph text of a ZIM archive's HTML articles to a file, one paragraph per line")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// ZIM archive to read
	#[arg(long, value_name = "PATH")]
	pub zim: PathBuf,

	/// Text file to write (created or truncated)
	#[arg(long, value_name = "PATH")]
	pub txt: PathBuf,

	/// Stop after writing this many lines; zero or negative means no limit
	#[arg(long, value_name = "N", allow_negative_numbers = true)]
	pub limit: Option<i64>,

	/// Only keep paragraphs that look like a single sentence
	#[arg(long)]
	pub sentences: bool,

	/// Only keep paragraphs matching this regex (takes precedence over --sentences)
	#[arg(long, alias = "regexFilter", value_name = "PATTERN")]
	pub regex_filter: Option<String>,

	/// Characters allowed after the sentence terminator in --sentences mode
	#[arg(long, value_name = "N", default_value_t = DEFAULT_TAIL_OFFSET)]
	pub sentence_tail: usize,

	/// JSON file overriding the built-in tag classification
	#[arg(long, value_name = "FILE")]
	pub rules: Option<PathBuf>,

	/// Run summary format
	#[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,

	/// Suppress progress output
	#[arg(short, long)]
	pub quiet: bool,
}

impl Cli {
	/// The line budget, `None` when unbounded.
	pub fn limit(&self) -> Option<usize> {
		self.limit.filter(|&n| n > 0).and_then(|n| usize::try_from(n).ok())
	}
}
