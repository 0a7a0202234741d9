use std::path::PathBuf;

use thiserror::Error;
use zim::ZimError;
use zimtext::ExtractError;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("failed to open archive {}: {source}", .path.display())]
	Archive {
		path: PathBuf,
		#[source]
		source: ZimError,
	},

	#[error(transparent)]
	Extract(#[from] ExtractError),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
