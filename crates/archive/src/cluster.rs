//! Cluster decoding and blob access.
//!
//! A cluster starts with one info byte: the low nibble names the compression,
//! bit `0x10` selects 8-byte offsets. The (decompressed) body begins with an
//! offset table; the first offset divided by the offset width is the number
//! of offsets, and blob `i` spans `offsets[i]..offsets[i + 1]`.

use std::io::Read;

use crate::error::{Result, ZimError};
use crate::header::{le_u32, le_u64};

const EXTENDED_FLAG: u8 = 0x10;

/// How a cluster body is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	None,
	Xz,
	Zstd,
}

impl Compression {
	pub fn from_info(info: u8) -> Result<Self> {
		match info & 0x0F {
			0 | 1 => Ok(Self::None),
			4 => Ok(Self::Xz),
			5 => Ok(Self::Zstd),
			other => Err(ZimError::UnsupportedCompression(other)),
		}
	}

	pub fn code(self) -> u8 {
		match self {
			Self::None => 1,
			Self::Xz => 4,
			Self::Zstd => 5,
		}
	}
}

/// A decoded cluster holding its blobs in memory.
#[derive(Debug)]
pub struct Cluster {
	compression: Compression,
	extended: bool,
	body: Vec<u8>,
	offsets: Vec<usize>,
}

impl Cluster {
	/// Decodes a raw cluster as stored in the archive, info byte included.
	pub fn parse(raw: &[u8]) -> Result<Self> {
		let (&info, stored) = raw.split_first().ok_or(ZimError::Truncated("cluster info byte"))?;
		let compression = Compression::from_info(info)?;
		let extended = info & EXTENDED_FLAG != 0;

		let body = match compression {
			Compression::None => stored.to_vec(),
			Compression::Xz => {
				let mut body = Vec::new();
				xz2::read::XzDecoder::new(stored).read_to_end(&mut body).map_err(ZimError::Decompress)?;
				body
			}
			Compression::Zstd => {
				let mut body = Vec::new();
				zstd::stream::read::Decoder::new(stored)
					.map_err(ZimError::Decompress)?
					.single_frame()
					.read_to_end(&mut body)
					.map_err(ZimError::Decompress)?;
				body
			}
		};

		let offsets = read_offsets(&body, extended)?;
		Ok(Self {
			compression,
			extended,
			body,
			offsets,
		})
	}

	pub fn compression(&self) -> Compression {
		self.compression
	}

	pub fn was_compressed(&self) -> bool {
		self.compression != Compression::None
	}

	pub fn is_extended(&self) -> bool {
		self.extended
	}

	pub fn blob_count(&self) -> usize {
		self.offsets.len().saturating_sub(1)
	}

	pub fn blob_at(&self, index: usize) -> Result<&[u8]> {
		let count = self.blob_count();
		if index >= count {
			return Err(ZimError::BlobOutOfRange { index, count });
		}
		Ok(&self.body[self.offsets[index]..self.offsets[index + 1]])
	}

	/// Iterates the blobs in storage order.
	pub fn blobs(&self) -> impl Iterator<Item = &[u8]> + '_ {
		self.offsets.windows(2).map(|pair| &self.body[pair[0]..pair[1]])
	}
}

fn read_offsets(body: &[u8], extended: bool) -> Result<Vec<usize>> {
	let width = if extended { 8 } else { 4 };
	let read = |at: usize| -> usize {
		if extended {
			usize::try_from(le_u64(body, at)).unwrap_or(usize::MAX)
		} else {
			le_u32(body, at) as usize
		}
	};

	if body.len() < width {
		return Err(ZimError::Truncated("cluster offset table"));
	}
	let first = read(0);
	if first < width || first % width != 0 || first > body.len() {
		return Err(ZimError::Corrupt(format!("first blob offset {first} invalid for cluster of {} bytes", body.len())));
	}

	let count = first / width;
	let mut offsets = Vec::with_capacity(count);
	let mut previous = first;
	for i in 0..count {
		let offset = read(i * width);
		if offset < previous || offset > body.len() {
			return Err(ZimError::Corrupt(format!("blob offset {offset} at index {i} out of order or past end")));
		}
		offsets.push(offset);
		previous = offset;
	}
	Ok(offsets)
}
