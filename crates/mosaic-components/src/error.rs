//! Error types for component loading and rendering

use std::path::PathBuf;
use thiserror::Error;

/// Result type for registry and definition operations
pub type Result<T> = std::result::Result<T, ComponentError>;

/// Errors raised while resolving, loading, or rendering a component
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ComponentError {
	/// No source file corresponds to the requested name
	#[error("component not found: {name}")]
	NotFound {
		/// Requested component name.
		name: String,
	},

	/// The source file exists but could not be read, parsed, or compiled
	#[error("failed to load component '{name}' from {path}: {message}", path = .path.display())]
	LoadFailure {
		/// Component name.
		name: String,
		/// Offending source file.
		path: PathBuf,
		/// Underlying cause.
		message: String,
	},

	/// Render template failed to compile
	#[error("invalid render template for component '{name}': {message}")]
	InvalidTemplate {
		/// Component name.
		name: String,
		/// Compiler message.
		message: String,
	},

	/// The string is not a valid component name
	#[error("invalid component name: {0:?}")]
	InvalidName(String),

	/// IO error
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl ComponentError {
	/// Builds a [`ComponentError::LoadFailure`].
	pub fn load_failure(
		name: impl Into<String>,
		path: impl Into<PathBuf>,
		message: impl Into<String>,
	) -> Self {
		Self::LoadFailure {
			name: name.into(),
			path: path.into(),
			message: message.into(),
		}
	}

	/// Returns true when the error means "no such component".
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound { .. } | Self::InvalidName(_))
	}
}

/// A render function failed for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("component '{component}' failed to render: {message}")]
pub struct RenderError {
	/// Component that failed.
	pub component: String,
	/// Failure description.
	pub message: String,
}

impl RenderError {
	/// Creates a render error for `component`.
	pub fn new(component: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			component: component.into(),
			message: message.into(),
		}
	}
}
