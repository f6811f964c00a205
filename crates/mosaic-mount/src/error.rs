//! Errors for project-wide page scanning

use std::path::PathBuf;
use thiserror::Error;

/// Result type for page discovery and rendering
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors raised while discovering or reading page files
#[derive(Debug, Error)]
pub enum ScanError {
	/// The pages directory or a page file could not be read
	#[error("cannot read {path}: {source}", path = .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// Directory traversal failed
	#[error("cannot walk pages directory: {0}")]
	Walk(#[from] walkdir::Error),
}

impl ScanError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}
}
