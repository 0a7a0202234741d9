//! Cheap check for whether a blob is worth scanning.

use memchr::memmem;

/// True when `bytes` contains `<html` and a `</html>` past the first few bytes.
pub fn looks_like_html(bytes: &[u8]) -> bool {
	memmem::find(bytes, b"<html").is_some() && memmem::find(bytes, b"</html>").is_some_and(|at| at > 5)
}
