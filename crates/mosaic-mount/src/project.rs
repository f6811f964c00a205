//! Project-wide page scanning
//!
//! Build pipelines call [`Mounter::scan_components`] once over the pages
//! directory to produce a single static style sheet for every component the
//! site uses.

use crate::engine::Mounter;
use crate::error::{Result, ScanError};
use crate::include::expand_includes;
use crate::stylesheet::StyleSheet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions treated as page files.
pub const PAGE_EXTENSIONS: &[&str] = &["html", "htm"];

/// Lists page files under `pages_dir`, recursively, sorted by path.
///
/// # Errors
///
/// Returns [`ScanError::Io`] if `pages_dir` cannot be read and
/// [`ScanError::Walk`] if traversal fails below it.
pub fn discover_pages(pages_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
	let pages_dir = pages_dir.as_ref();
	fs::read_dir(pages_dir).map_err(|e| ScanError::io(pages_dir, e))?;

	let mut pages = Vec::new();
	for entry in WalkDir::new(pages_dir).sort_by_file_name() {
		let entry = entry?;
		if entry.file_type().is_file() && is_page(entry.path()) {
			pages.push(entry.into_path());
		}
	}
	pages.sort();
	Ok(pages)
}

fn is_page(path: &Path) -> bool {
	path.extension()
		.and_then(|e| e.to_str())
		.is_some_and(|e| PAGE_EXTENSIONS.iter().any(|p| e.eq_ignore_ascii_case(p)))
}

impl Mounter {
	/// Collects the styles of every component used by any page under
	/// `pages_dir`, in page order, each component once.
	///
	/// Unreadable page files are logged and skipped.
	pub fn scan_components(&self, pages_dir: impl AsRef<Path>) -> Result<StyleSheet> {
		let pages = discover_pages(pages_dir)?;
		let mut sheet = StyleSheet::new();
		for page in &pages {
			let document = match fs::read_to_string(page) {
				Ok(document) => document,
				Err(err) => {
					tracing::warn!(page = %page.display(), error = %err, "skipping unreadable page");
					continue;
				}
			};
			let expanded = expand_includes(&document, self.registry(), &mut Vec::new());
			sheet.merge(self.collect_styles(&expanded));
		}
		tracing::info!(pages = pages.len(), components = sheet.len(), "scanned pages for component styles");
		Ok(sheet)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::MountOptions;
	use mosaic_components::{ComponentDefinition, ComponentName, ComponentRegistry, RegistryConfig};
	use rstest::rstest;
	use std::sync::Arc;
	use tempfile::TempDir;

	fn page(dir: &Path, name: &str, content: &str) {
		let path = dir.join(name);
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(path, content).unwrap();
	}

	fn styled(name: &str, styles: &str) -> ComponentDefinition {
		ComponentDefinition::new(ComponentName::new(name).unwrap(), |_| Ok(String::new()))
			.with_styles(styles)
	}

	#[rstest]
	fn test_discover_pages_is_sorted_and_filtered() {
		let dir = TempDir::new().unwrap();
		page(dir.path(), "b.html", "");
		page(dir.path(), "a/index.HTM", "");
		page(dir.path(), "notes.txt", "");
		page(dir.path(), "a.html", "");

		let pages = discover_pages(dir.path()).unwrap();
		let relative: Vec<_> = pages
			.iter()
			.map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
			.collect();
		assert_eq!(relative, vec!["a/index.HTM", "a.html", "b.html"]);
	}

	#[rstest]
	fn test_discover_pages_missing_dir() {
		let err = discover_pages("/definitely/not/pages").unwrap_err();
		assert!(matches!(err, ScanError::Io { .. }));
	}

	#[rstest]
	fn test_scan_components_collects_across_pages() {
		let dir = TempDir::new().unwrap();
		page(dir.path(), "index.html", "<Nav/><Card>x</Card>");
		page(dir.path(), "about/index.html", "<Card>y</Card><Footer/><Unknown/>");

		let registry = ComponentRegistry::new(RegistryConfig::new(dir.path().join("components")));
		registry.register(styled("Card", ".card{}"));
		registry.register(styled("Nav", ".nav{}"));
		registry.register(styled("Footer", ".footer{}"));
		let mounter = Mounter::new(Arc::new(registry), MountOptions::default());

		let sheet = mounter.scan_components(dir.path()).unwrap();
		let names: Vec<_> = sheet.names().map(ComponentName::as_str).collect();
		assert_eq!(names, vec!["Card", "Footer", "Nav"]);
		assert_eq!(sheet.to_css(), ".card{}\n.footer{}\n.nav{}");
	}
}
