//! Error types for the extraction pipeline.
//!
//! Markup never produces an error. Failures come from the sink the caller
//! hands in, or from building a [`Selection`](crate::Selection) or
//! [`TagRules`](crate::TagRules) out of user input.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),

	#[error("invalid text filter pattern: {0}")]
	Pattern(#[from] regex::Error),

	#[error("invalid tag rules: {0}")]
	Rules(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
