//! Read-only access to the clusters and blobs of ZIM archives.
//!
//! Only what a sequential blob walk needs is implemented: the header, the
//! cluster pointer list, and cluster decompression (xz and zstd). Directory
//! entries, titles, and URLs are not read.
//!
//! ```ignore
//! let mut archive = zim::Archive::open("wikipedia.zim")?;
//! for index in 0..archive.cluster_count() {
//!     let cluster = archive.cluster_at(index)?;
//!     for blob in cluster.blobs() {
//!         // ...
//!     }
//! }
//! ```

mod archive;
mod cluster;
mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixture;
mod header;

pub use archive::Archive;
pub use cluster::{Cluster, Compression};
pub use error::{Result, ZimError};
pub use header::{HEADER_LEN, Header, MAGIC};
