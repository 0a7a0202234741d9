//! The archive walk: clusters in order, blobs in order, until the budget is spent.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::Context;
use tracing::{debug, info, warn};
use zim::{Archive, ZimError};
use zimtext::{Extractor, Selection, SentenceHeuristic, TagRules, looks_like_html};

use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::progress::Progress;
use crate::sink::OutputSink;
use crate::summary::RunSummary;

/// Everything a run needs, validated up front.
#[derive(Debug)]
pub struct RunConfig {
	pub zim: PathBuf,
	pub txt: PathBuf,
	pub limit: Option<usize>,
	pub extractor: Extractor,
	pub progress: bool,
}

impl RunConfig {
	/// Fails on an invalid pattern or rules file before any file is touched.
	pub fn from_cli(cli: &Cli) -> Result<Self> {
		let heuristic = SentenceHeuristic::default().with_tail_offset(cli.sentence_tail);
		let selection = Selection::from_options(cli.regex_filter.as_deref(), cli.sentences, heuristic)?;
		let mut extractor = Extractor::new(selection);
		if let Some(path) = &cli.rules {
			extractor = extractor.with_rules(TagRules::load(path)?);
		}

		Ok(Self {
			zim: cli.zim.clone(),
			txt: cli.txt.clone(),
			limit: cli.limit(),
			extractor,
			progress: !cli.quiet,
		})
	}

	/// Walks the archive on the calling thread, checking `interrupted`
	/// between fragments.
	pub fn run(&self, interrupted: &AtomicBool) -> Result<RunSummary> {
		let started = Instant::now();
		let mut archive = Archive::open(&self.zim).map_err(|source| CliError::Archive {
			path: self.zim.clone(),
			source,
		})?;
		let mut sink = OutputSink::create(&self.txt).with_context(|| format!("failed to create {}", self.txt.display()))?;

		let cluster_count = archive.cluster_count();
		let progress = Progress::new(self.progress, self.limit, cluster_count);
		let mut summary = RunSummary {
			limit: self.limit,
			selection: self.extractor.selection().mode(),
			..RunSummary::default()
		};
		let mut remaining = self.limit.unwrap_or(usize::MAX);

		info!(
			target = "zimtext",
			archive = %self.zim.display(),
			output = %self.txt.display(),
			clusters = cluster_count,
			selection = summary.selection,
			limit = ?self.limit,
			"extraction started"
		);

		'clusters: for index in 0..cluster_count {
			if remaining == 0 {
				break;
			}
			if interrupted.load(Ordering::Relaxed) {
				summary.interrupted = true;
				break;
			}
			progress.cluster(index, summary.paragraphs);

			let cluster = match archive.cluster_at(index) {
				Ok(cluster) => cluster,
				Err(ZimError::UnsupportedCompression(code)) => {
					warn!(target = "zimtext", cluster = index, code, "skipping cluster with unsupported compression");
					summary.clusters_skipped += 1;
					continue;
				}
				Err(err) => {
					debug!(target = "zimtext", cluster = index, error = %err, "skipping unreadable cluster");
					summary.clusters_skipped += 1;
					continue;
				}
			};
			// Uncompressed clusters hold images and other binary assets.
			if !cluster.was_compressed() {
				summary.clusters_skipped += 1;
				continue;
			}
			summary.clusters_read += 1;

			for blob in cluster.blobs() {
				if remaining == 0 {
					break 'clusters;
				}
				if interrupted.load(Ordering::Relaxed) {
					summary.interrupted = true;
					break 'clusters;
				}
				summary.fragments_seen += 1;
				if !looks_like_html(blob) {
					continue;
				}
				summary.html_fragments += 1;

				let written = self.extractor.process(blob, &mut sink, remaining)?;
				remaining -= written;
				summary.paragraphs += written;
			}
		}

		sink.finish().with_context(|| format!("failed to flush {}", self.txt.display()))?;
		progress.finish();

		summary.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
		info!(
			target = "zimtext",
			paragraphs = summary.paragraphs,
			clusters_read = summary.clusters_read,
			clusters_skipped = summary.clusters_skipped,
			interrupted = summary.interrupted,
			"extraction finished"
		);
		Ok(summary)
	}
}

/// Exit status after a second interrupt, as a shell reports SIGINT.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Runs the walk on a blocking thread while Ctrl-C requests a stop.
///
/// A second Ctrl-C exits immediately without flushing the output.
pub async fn execute(cli: &Cli) -> Result<RunSummary> {
	let config = RunConfig::from_cli(cli)?;
	let interrupted = Arc::new(AtomicBool::new(false));

	let watcher = {
		let interrupted = Arc::clone(&interrupted);
		tokio::spawn(async move {
			if watch_interrupts(&interrupted, tokio::signal::ctrl_c).await {
				warn!(target = "zimtext", "second interrupt received, exiting");
				std::process::exit(INTERRUPTED_EXIT_CODE);
			}
		})
	};

	let outcome = tokio::task::spawn_blocking(move || config.run(&interrupted)).await;
	watcher.abort();
	outcome.context("extraction thread failed")?
}

/// Raises `interrupted` on the first signal and resolves to `true` on the
/// second. Resolves to `false` if signals cannot be received.
async fn watch_interrupts<F, Fut>(interrupted: &AtomicBool, mut signal: F) -> bool
where
	F: FnMut() -> Fut,
	Fut: Future<Output = io::Result<()>>,
{
	if signal().await.is_err() {
		return false;
	}
	warn!(target = "zimtext", "interrupt received, stopping after the current fragment (press Ctrl-C again to exit now)");
	interrupted.store(true, Ordering::Relaxed);
	signal().await.is_ok()
}

#[cfg(test)]
mod tests {
	use clap::Parser;
	use zim::Compression;
	use zim::fixture::ArchiveBuilder;

	use super::*;

	fn cli(args: &[&str]) -> Cli {
		let mut full = vec!["zimtext", "-q"];
		full.extend_from_slice(args);
		Cli::try_parse_from(full).unwrap()
	}

	#[test]
	fn invalid_pattern_fails_before_output_is_created() {
		let dir = tempfile::tempdir().unwrap();
		let txt = dir.path().join("out.txt");
		let err = RunConfig::from_cli(&cli(&["--zim", "missing.zim", "--txt", txt.to_str().unwrap(), "--regex-filter", "("])).unwrap_err();
		assert!(matches!(err, CliError::Extract(zimtext::ExtractError::Pattern(_))));
		assert!(!txt.exists());
	}

	#[test]
	fn stops_at_limit_and_reports_counts() {
		let dir = tempfile::tempdir().unwrap();
		let zim = dir.path().join("in.zim");
		let txt = dir.path().join("out.txt");
		ArchiveBuilder::new()
			.cluster(Compression::Zstd, &[b"<html><p>One.</p><p>Two.</p></html>", b"not html"])
			.cluster(Compression::Xz, &[b"<html><p>Three.</p></html>"])
			.write_to(&zim)
			.unwrap();

		let config = RunConfig::from_cli(&cli(&["--zim", zim.to_str().unwrap(), "--txt", txt.to_str().unwrap(), "--limit", "2"])).unwrap();
		let summary = config.run(&AtomicBool::new(false)).unwrap();
		assert_eq!(summary.paragraphs, 2);
		assert_eq!(summary.fragments_seen, 1);
		assert_eq!(summary.clusters_read, 1);
		assert_eq!(std::fs::read_to_string(&txt).unwrap(), "One.\nTwo.\n");
	}

	#[test]
	fn interrupt_stops_before_the_next_fragment() {
		let dir = tempfile::tempdir().unwrap();
		let zim = dir.path().join("in.zim");
		let txt = dir.path().join("out.txt");
		ArchiveBuilder::new()
			.cluster(Compression::Zstd, &[b"<html><p>One.</p></html>"])
			.write_to(&zim)
			.unwrap();

		let config = RunConfig::from_cli(&cli(&["--zim", zim.to_str().unwrap(), "--txt", txt.to_str().unwrap()])).unwrap();
		let summary = config.run(&AtomicBool::new(true)).unwrap();
		assert!(summary.interrupted);
		assert_eq!(summary.paragraphs, 0);
		assert_eq!(std::fs::read_to_string(&txt).unwrap(), "");
	}

	#[test]
	fn spent_limit_stops_before_reading_further_clusters() {
		let dir = tempfile::tempdir().unwrap();
		let zim = dir.path().join("in.zim");
		let txt = dir.path().join("out.txt");
		ArchiveBuilder::new()
			.cluster(Compression::Zstd, &[b"<html><p>One.</p></html>"])
			.cluster(Compression::None, &[b"img"])
			.cluster(Compression::None, &[b"img"])
			.raw_cluster(vec![3, 0, 0])
			.write_to(&zim)
			.unwrap();

		let config = RunConfig::from_cli(&cli(&["--zim", zim.to_str().unwrap(), "--txt", txt.to_str().unwrap(), "--limit", "1"])).unwrap();
		let summary = config.run(&AtomicBool::new(false)).unwrap();
		assert_eq!(summary.paragraphs, 1);
		assert_eq!(summary.clusters_read, 1);
		assert_eq!(summary.clusters_skipped, 0);
	}

	fn signals(results: Vec<io::Result<()>>) -> impl FnMut() -> std::future::Ready<io::Result<()>> {
		let mut results = results.into_iter();
		move || std::future::ready(results.next().unwrap_or_else(|| Err(io::Error::other("no more signals"))))
	}

	#[tokio::test]
	async fn second_interrupt_requests_exit() {
		let interrupted = AtomicBool::new(false);
		assert!(watch_interrupts(&interrupted, signals(vec![Ok(()), Ok(())])).await);
		assert!(interrupted.load(Ordering::Relaxed));
	}

	#[tokio::test]
	async fn single_interrupt_only_raises_the_flag() {
		let interrupted = AtomicBool::new(false);
		assert!(!watch_interrupts(&interrupted, signals(vec![Ok(())])).await);
		assert!(interrupted.load(Ordering::Relaxed));
	}

	#[tokio::test]
	async fn unavailable_signals_leave_the_run_alone() {
		let interrupted = AtomicBool::new(false);
		assert!(!watch_interrupts(&interrupted, signals(Vec::new())).await);
		assert!(!interrupted.load(Ordering::Relaxed));
	}

	#[test]
	fn skips_uncompressed_and_broken_clusters() {
		let dir = tempfile::tempdir().unwrap();
		let zim = dir.path().join("in.zim");
		let txt = dir.path().join("out.txt");
		ArchiveBuilder::new()
			.cluster(Compression::None, &[b"<html><p>Stored.</p></html>"])
			.raw_cluster(vec![3, 0, 0])
			.cluster(Compression::Zstd, &[b"<html><p>Kept.</p></html>"])
			.write_to(&zim)
			.unwrap();

		let config = RunConfig::from_cli(&cli(&["--zim", zim.to_str().unwrap(), "--txt", txt.to_str().unwrap()])).unwrap();
		let summary = config.run(&AtomicBool::new(false)).unwrap();
		assert_eq!(summary.clusters_skipped, 2);
		assert_eq!(summary.clusters_read, 1);
		assert_eq!(std::fs::read_to_string(&txt).unwrap(), "Kept.\n");
	}
}
