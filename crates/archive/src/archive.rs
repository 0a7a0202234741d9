//! Random access to clusters of an archive on disk.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cluster::Cluster;
use crate::error::{Result, ZimError};
use crate::header::{HEADER_LEN, Header, le_u64};

/// An open ZIM file.
///
/// Only the header and the cluster pointer list are held in memory; clusters
/// are read and decoded on demand.
#[derive(Debug)]
pub struct Archive {
	path: PathBuf,
	file: File,
	file_len: u64,
	header: Header,
	cluster_ptrs: Vec<u64>,
}

impl Archive {
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref().to_path_buf();
		let mut file = File::open(&path)?;
		let file_len = file.metadata()?.len();

		let mut raw = [0u8; HEADER_LEN];
		read_exact_or(&mut file, &mut raw, "header")?;
		let header = Header::parse(&raw)?;

		let table_len = u64::from(header.cluster_count) * 8;
		if header.cluster_ptr_pos.checked_add(table_len).is_none_or(|end| end > file_len) {
			return Err(ZimError::Truncated("cluster pointer list"));
		}
		file.seek(SeekFrom::Start(header.cluster_ptr_pos))?;
		let mut table = vec![0u8; table_len as usize];
		read_exact_or(&mut file, &mut table, "cluster pointer list")?;
		let cluster_ptrs = table.chunks_exact(8).map(|chunk| le_u64(chunk, 0)).collect();

		debug!(
			target = "zim",
			path = %path.display(),
			version = format!("{}.{}", header.major_version, header.minor_version),
			clusters = header.cluster_count,
			entries = header.entry_count,
			"opened archive"
		);

		Ok(Self {
			path,
			file,
			file_len,
			header,
			cluster_ptrs,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn header(&self) -> &Header {
		&self.header
	}

	pub fn cluster_count(&self) -> u32 {
		self.header.cluster_count
	}

	/// Reads and decodes the cluster at `index`.
	pub fn cluster_at(&mut self, index: u32) -> Result<Cluster> {
		let count = self.cluster_count();
		let i = index as usize;
		let start = *self.cluster_ptrs.get(i).ok_or(ZimError::ClusterOutOfRange { index, count })?;
		let end = self.cluster_end(i);
		if start >= end || end > self.file_len {
			return Err(ZimError::Corrupt(format!("cluster {index} spans {start}..{end} in a file of {} bytes", self.file_len)));
		}

		self.file.seek(SeekFrom::Start(start))?;
		let mut raw = vec![0u8; (end - start) as usize];
		read_exact_or(&mut self.file, &mut raw, "cluster")?;
		Cluster::parse(&raw)
	}

	/// A cluster runs to the next pointer; the last one stops at the checksum.
	fn cluster_end(&self, i: usize) -> u64 {
		if let Some(&next) = self.cluster_ptrs.get(i + 1) {
			return next;
		}
		let checksum = self.header.checksum_pos;
		if checksum > self.cluster_ptrs[i] && checksum <= self.file_len { checksum } else { self.file_len }
	}
}

fn read_exact_or(file: &mut File, buf: &mut [u8], what: &'static str) -> Result<()> {
	file.read_exact(buf).map_err(|err| match err.kind() {
		io::ErrorKind::UnexpectedEof => ZimError::Truncated(what),
		_ => ZimError::Io(err),
	})
}
