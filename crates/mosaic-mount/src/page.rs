//! Page rendering interface for routing layers

use crate::engine::Mounter;
use crate::error::{Result, ScanError};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Content type of every mounted page.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// A mounted page ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
	pub body: String,
	pub content_type: &'static str,
}

impl PageResponse {
	pub fn html(body: String) -> Self {
		Self {
			body,
			content_type: HTML_CONTENT_TYPE,
		}
	}
}

/// Mounts raw page text for a router.
///
/// # Examples
///
/// ```
/// use mosaic_components::{ComponentRegistry, RegistryConfig};
/// use mosaic_mount::{MountOptions, Mounter, PageRenderer};
/// use std::sync::Arc;
///
/// let registry = Arc::new(ComponentRegistry::new(RegistryConfig::default()));
/// let renderer = PageRenderer::new(Arc::new(Mounter::new(registry, MountOptions::default())));
///
/// let response = renderer.render_page("<p>hello</p>");
/// assert_eq!(response.body, "<p>hello</p>");
/// assert_eq!(response.content_type, "text/html; charset=utf-8");
/// ```
#[derive(Debug, Clone)]
pub struct PageRenderer {
	mounter: Arc<Mounter>,
}

impl PageRenderer {
	pub fn new(mounter: Arc<Mounter>) -> Self {
		Self { mounter }
	}

	pub fn mounter(&self) -> &Arc<Mounter> {
		&self.mounter
	}

	pub fn render_page(&self, raw: &str) -> PageResponse {
		PageResponse::html(self.mounter.mount(raw))
	}

	/// Reads and mounts a page file.
	pub fn render_file(&self, path: impl AsRef<Path>) -> Result<PageResponse> {
		let path = path.as_ref();
		let raw = fs::read_to_string(path).map_err(|e| ScanError::io(path, e))?;
		tracing::debug!(page = %path.display(), "rendering page");
		Ok(self.render_page(&raw))
	}
}
