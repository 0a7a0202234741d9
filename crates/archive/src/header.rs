//! Fixed-size archive header.

use crate::error::{Result, ZimError};

pub const MAGIC: u32 = 0x044D_495A;
pub const HEADER_LEN: usize = 80;

/// The 80-byte little-endian header at the start of every ZIM file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
	pub major_version: u16,
	pub minor_version: u16,
	pub uuid: [u8; 16],
	pub entry_count: u32,
	pub cluster_count: u32,
	pub url_ptr_pos: u64,
	pub title_ptr_pos: u64,
	pub cluster_ptr_pos: u64,
	pub mime_list_pos: u64,
	pub main_page: u32,
	pub layout_page: u32,
	pub checksum_pos: u64,
}

impl Header {
	pub fn parse(bytes: &[u8; HEADER_LEN]) -> Result<Self> {
		let magic = le_u32(bytes, 0);
		if magic != MAGIC {
			return Err(ZimError::InvalidMagic(magic));
		}

		let mut uuid = [0u8; 16];
		uuid.copy_from_slice(&bytes[8..24]);

		Ok(Self {
			major_version: le_u16(bytes, 4),
			minor_version: le_u16(bytes, 6),
			uuid,
			entry_count: le_u32(bytes, 24),
			cluster_count: le_u32(bytes, 28),
			url_ptr_pos: le_u64(bytes, 32),
			title_ptr_pos: le_u64(bytes, 40),
			cluster_ptr_pos: le_u64(bytes, 48),
			mime_list_pos: le_u64(bytes, 56),
			main_page: le_u32(bytes, 64),
			layout_page: le_u32(bytes, 68),
			checksum_pos: le_u64(bytes, 72),
		})
	}

	pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
		let mut out = [0u8; HEADER_LEN];
		out[0..4].copy_from_slice(&MAGIC.to_le_bytes());
		out[4..6].copy_from_slice(&self.major_version.to_le_bytes());
		out[6..8].copy_from_slice(&self.minor_version.to_le_bytes());
		out[8..24].copy_from_slice(&self.uuid);
		out[24..28].copy_from_slice(&self.entry_count.to_le_bytes());
		out[28..32].copy_from_slice(&self.cluster_count.to_le_bytes());
		out[32..40].copy_from_slice(&self.url_ptr_pos.to_le_bytes());
		out[40..48].copy_from_slice(&self.title_ptr_pos.to_le_bytes());
		out[48..56].copy_from_slice(&self.cluster_ptr_pos.to_le_bytes());
		out[56..64].copy_from_slice(&self.mime_list_pos.to_le_bytes());
		out[64..68].copy_from_slice(&self.main_page.to_le_bytes());
		out[68..72].copy_from_slice(&self.layout_page.to_le_bytes());
		out[72..80].copy_from_slice(&self.checksum_pos.to_le_bytes());
		out
	}
}

pub(crate) fn le_u16(bytes: &[u8], at: usize) -> u16 {
	u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

pub(crate) fn le_u32(bytes: &[u8], at: usize) -> u32 {
	u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

pub(crate) fn le_u64(bytes: &[u8], at: usize) -> u64 {
	let mut buf = [0u8; 8];
	buf.copy_from_slice(&bytes[at..at + 8]);
	u64::from_le_bytes(buf)
}
