//! Advisory completion percentage on stderr.

use std::io::Write;

const LIMITED_EVERY: u32 = 4;
const UNLIMITED_EVERY: u32 = 16;

#[derive(Debug)]
pub struct Progress {
	enabled: bool,
	limit: Option<usize>,
	cluster_count: u32,
}

impl Progress {
	pub fn new(enabled: bool, limit: Option<usize>, cluster_count: u32) -> Self {
		Self {
			enabled,
			limit,
			cluster_count,
		}
	}

	/// Called before cluster `index` is read, with the lines written so far.
	pub fn cluster(&self, index: u32, written: usize) {
		if let Some(pct) = self.percent(index, written).filter(|_| self.enabled) {
			report(pct);
		}
	}

	pub fn finish(&self) {
		if self.enabled {
			report(100.0);
			eprintln!();
		}
	}

	/// With a limit, progress toward it every few clusters; otherwise the
	/// share of clusters visited, less often.
	fn percent(&self, index: u32, written: usize) -> Option<f64> {
		match self.limit {
			Some(limit) if index % LIMITED_EVERY == 0 => Some(written as f64 / limit as f64 * 100.0),
			None if index % UNLIMITED_EVERY == 0 && self.cluster_count > 0 => Some(f64::from(index) / f64::from(self.cluster_count) * 100.0),
			_ => None,
		}
	}
}

fn report(pct: f64) {
	let mut stderr = std::io::stderr().lock();
	let _ = write!(stderr, "\r{pct:.1}%");
	let _ = stderr.flush();
}
