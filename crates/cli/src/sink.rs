//! Buffered output file for extracted lines.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::warn;

pub const BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// Line sink flushed on every exit path.
///
/// [`OutputSink::finish`] flushes and reports failure; dropping an unfinished
/// sink (an error or interrupt unwinding the run) flushes best-effort and only
/// logs failure.
pub struct OutputSink<W: Write> {
	writer: BufWriter<W>,
	finished: bool,
}

impl OutputSink<File> {
	pub fn create(path: &Path) -> io::Result<Self> {
		Ok(Self::new(File::create(path)?))
	}
}

impl<W: Write> OutputSink<W> {
	pub fn new(inner: W) -> Self {
		Self {
			writer: BufWriter::with_capacity(BUFFER_SIZE, inner),
			finished: false,
		}
	}

	pub fn finish(mut self) -> io::Result<()> {
		self.writer.flush()?;
		self.finished = true;
		Ok(())
	}
}

impl<W: Write> Write for OutputSink<W> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.writer.write(buf)
	}

	fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
		self.writer.write_all(buf)
	}

	fn flush(&mut self) -> io::Result<()> {
		self.writer.flush()
	}
}

impl<W: Write> Drop for OutputSink<W> {
	fn drop(&mut self) {
		if self.finished {
			return;
		}
		if let Err(err) = self.writer.flush() {
			warn!(target = "zimtext", error = %err, "failed to flush output");
		}
	}
}
