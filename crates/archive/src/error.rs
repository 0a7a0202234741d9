use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZimError {
	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),

	#[error("not a ZIM archive (magic number {0:#010x})")]
	InvalidMagic(u32),

	#[error("archive truncated while reading {0}")]
	Truncated(&'static str),

	#[error("cluster {index} out of range (archive has {count})")]
	ClusterOutOfRange { index: u32, count: u32 },

	#[error("blob {index} out of range (cluster has {count})")]
	BlobOutOfRange { index: usize, count: usize },

	#[error("unsupported cluster compression {0}")]
	UnsupportedCompression(u8),

	#[error("corrupt archive: {0}")]
	Corrupt(String),

	#[error("failed to decompress cluster: {0}")]
	Decompress(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ZimError>;
