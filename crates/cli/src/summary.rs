use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

/// Format of the run summary printed on stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text
	#[default]
	Text,
	/// JSON object
	Json,
}

impl std::fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			OutputFormat::Text => write!(f, "text"),
			OutputFormat::Json => write!(f, "json"),
		}
	}
}

/// Counters collected over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
	pub paragraphs: usize,
	pub limit: Option<usize>,
	pub selection: &'static str,
	pub clusters_read: u32,
	pub clusters_skipped: u32,
	pub fragments_seen: u64,
	pub html_fragments: u64,
	pub interrupted: bool,
	pub elapsed_ms: u64,
}

impl RunSummary {
	pub fn render(&self, format: OutputFormat) -> serde_json::Result<String> {
		match format {
			OutputFormat::Json => serde_json::to_string_pretty(self),
			OutputFormat::Text => Ok(self.render_text()),
		}
	}

	fn render_text(&self) -> String {
		let status = if self.interrupted { "interrupted".yellow() } else { "done".green() };
		let mut out = format!("{status}: {} paragraphs written", self.paragraphs.to_string().bold());
		if let Some(limit) = self.limit {
			out.push_str(&format!(" (limit {limit})"));
		}
		out.push_str(&format!(
			"\n  selection: {}\n  clusters: {} read, {} skipped\n  fragments: {} seen, {} html\n  elapsed: {:.2}s",
			self.selection,
			self.clusters_read,
			self.clusters_skipped,
			self.fragments_seen,
			self.html_fragments,
			self.elapsed_ms as f64 / 1000.0,
		));
		out
	}
}
