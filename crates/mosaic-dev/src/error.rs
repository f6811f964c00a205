//! Error types for file watching

use thiserror::Error;

/// Result type for watcher operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors raised while setting up a watcher
#[derive(Debug, Error)]
pub enum WatchError {
	/// The platform notifier failed
	#[error("file watcher error: {0}")]
	Notify(#[from] notify::Error),
}
