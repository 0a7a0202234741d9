//! Writers for small synthetic archives, used by tests here and downstream.

use std::io::Write;
use std::path::Path;

use crate::cluster::Compression;
use crate::error::{Result, ZimError};
use crate::header::{HEADER_LEN, Header};

/// Encodes one cluster, info byte included, holding `blobs` in order.
pub fn encode_cluster(compression: Compression, extended: bool, blobs: &[&[u8]]) -> Result<Vec<u8>> {
	let width = if extended { 8 } else { 4 };
	let mut body = Vec::new();
	let mut offset = (blobs.len() + 1) * width;
	for blob in blobs.iter().map(|blob| blob.len()).chain(std::iter::once(0)) {
		if extended {
			body.extend_from_slice(&(offset as u64).to_le_bytes());
		} else {
			let narrow = u32::try_from(offset).map_err(|_| ZimError::Corrupt(format!("blob offset {offset} needs extended offsets")))?;
			body.extend_from_slice(&narrow.to_le_bytes());
		}
		offset += blob;
	}
	for blob in blobs {
		body.extend_from_slice(blob);
	}

	let info = compression.code() | if extended { 0x10 } else { 0 };
	let mut out = vec![info];
	match compression {
		Compression::None => out.extend_from_slice(&body),
		Compression::Xz => {
			let mut encoder = xz2::write::XzEncoder::new(out, 6);
			encoder.write_all(&body)?;
			out = encoder.finish()?;
		}
		Compression::Zstd => {
			out.extend_from_slice(&zstd::encode_all(body.as_slice(), 3)?);
		}
	}
	Ok(out)
}

/// Lays out a minimal archive: header, empty MIME list, cluster pointers,
/// clusters, then a zeroed checksum.
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
	clusters: Vec<Pending>,
}

#[derive(Debug)]
enum Pending {
	Encode { compression: Compression, extended: bool, blobs: Vec<Vec<u8>> },
	Raw(Vec<u8>),
}

impl ArchiveBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cluster(self, compression: Compression, blobs: &[&[u8]]) -> Self {
		self.push(compression, false, blobs)
	}

	pub fn extended_cluster(self, compression: Compression, blobs: &[&[u8]]) -> Self {
		self.push(compression, true, blobs)
	}

	/// Appends bytes verbatim as a cluster, for exercising corrupt input.
	pub fn raw_cluster(mut self, raw: Vec<u8>) -> Self {
		self.clusters.push(Pending::Raw(raw));
		self
	}

	fn push(mut self, compression: Compression, extended: bool, blobs: &[&[u8]]) -> Self {
		self.clusters.push(Pending::Encode {
			compression,
			extended,
			blobs: blobs.iter().map(|blob| blob.to_vec()).collect(),
		});
		self
	}

	pub fn build(&self) -> Result<Vec<u8>> {
		let mut encoded = Vec::with_capacity(self.clusters.len());
		for pending in &self.clusters {
			encoded.push(match pending {
				Pending::Encode { compression, extended, blobs } => {
					let blobs: Vec<&[u8]> = blobs.iter().map(Vec::as_slice).collect();
					encode_cluster(*compression, *extended, &blobs)?
				}
				Pending::Raw(raw) => raw.clone(),
			});
		}

		let mime_list_pos = HEADER_LEN as u64;
		let cluster_ptr_pos = mime_list_pos + 1;
		let mut cursor = cluster_ptr_pos + encoded.len() as u64 * 8;
		let mut pointers = Vec::with_capacity(encoded.len());
		for cluster in &encoded {
			pointers.push(cursor);
			cursor += cluster.len() as u64;
		}

		let header = Header {
			major_version: 6,
			minor_version: 1,
			uuid: [0x5A; 16],
			entry_count: 0,
			cluster_count: encoded.len() as u32,
			url_ptr_pos: cluster_ptr_pos,
			title_ptr_pos: cluster_ptr_pos,
			cluster_ptr_pos,
			mime_list_pos,
			main_page: u32::MAX,
			layout_page: u32::MAX,
			checksum_pos: cursor,
		};

		let mut out = Vec::with_capacity(cursor as usize + 16);
		out.extend_from_slice(&header.to_bytes());
		out.push(0);
		for pointer in pointers {
			out.extend_from_slice(&pointer.to_le_bytes());
		}
		for cluster in encoded {
			out.extend_from_slice(&cluster);
		}
		out.extend_from_slice(&[0u8; 16]);
		Ok(out)
	}

	pub fn write_to(&self, path: &Path) -> Result<()> {
		std::fs::write(path, self.build()?)?;
		Ok(())
	}
}
