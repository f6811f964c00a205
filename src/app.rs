//! Assembled Mosaic instance

use crate::settings::MosaicSettings;
use mosaic_components::{ComponentRegistry, PreloadSummary};
use mosaic_mount::{
	MountReport, Mounter, PageRenderer, PageResponse, ScanError, StyleSheet, discover_pages,
};
use std::path::PathBuf;
use std::sync::Arc;

/// A registry, mounter, and page renderer built from one set of settings.
///
/// Cloning is cheap; clones share the registry.
#[derive(Debug, Clone)]
pub struct Mosaic {
	settings: MosaicSettings,
	registry: Arc<ComponentRegistry>,
	renderer: PageRenderer,
	preload: Option<PreloadSummary>,
}

impl Mosaic {
	/// Builds the registry, preloads the components directory, and sets up
	/// the mounter.
	///
	/// A components directory that cannot be read is logged; components are
	/// then loaded on first use, if they appear.
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use mosaic::{Mosaic, MosaicSettings};
	///
	/// # fn main() -> Result<(), mosaic::SettingsError> {
	/// let settings = MosaicSettings::from_file("mosaic.toml")?.apply_env()?;
	/// let mosaic = Mosaic::from_settings(settings);
	/// let page = mosaic.render_page("<html><body><Hero title=\"Hi\" /></body></html>");
	/// println!("{}", page.body);
	/// # Ok(())
	/// # }
	/// ```
	pub fn from_settings(settings: MosaicSettings) -> Self {
		let registry = Arc::new(ComponentRegistry::new(settings.registry_config()));
		let preload = match registry.preload(&settings.components_dir) {
			Ok(summary) => Some(summary),
			Err(err) => {
				tracing::warn!(
					dir = %settings.components_dir.display(),
					error = %err,
					"cannot preload components"
				);
				None
			}
		};

		let mounter = Mounter::new(Arc::clone(&registry), settings.mount_options());
		Self {
			settings,
			registry,
			renderer: PageRenderer::new(Arc::new(mounter)),
			preload,
		}
	}

	pub fn settings(&self) -> &MosaicSettings {
		&self.settings
	}

	pub fn registry(&self) -> &Arc<ComponentRegistry> {
		&self.registry
	}

	pub fn mounter(&self) -> &Arc<Mounter> {
		self.renderer.mounter()
	}

	pub fn renderer(&self) -> &PageRenderer {
		&self.renderer
	}

	/// Counts from the startup preload, if the directory could be read.
	pub fn preload_summary(&self) -> Option<PreloadSummary> {
		self.preload
	}

	pub fn mount(&self, document: &str) -> String {
		self.mounter().mount(document)
	}

	pub fn mount_with_report(&self, document: &str) -> MountReport {
		self.mounter().mount_with_report(document)
	}

	pub fn render_page(&self, raw: &str) -> PageResponse {
		self.renderer.render_page(raw)
	}

	/// Page files under the configured pages directory.
	pub fn pages(&self) -> Result<Vec<PathBuf>, ScanError> {
		discover_pages(&self.settings.pages_dir)
	}

	/// Styles of every component used by any page, for a static style sheet.
	pub fn scan_components(&self) -> Result<StyleSheet, ScanError> {
		self.mounter().scan_components(&self.settings.pages_dir)
	}

	/// Invalidation hook bound to this instance's registry.
	#[cfg(feature = "dev")]
	pub fn invalidation_hook(&self) -> mosaic_dev::InvalidationHook {
		mosaic_dev::InvalidationHook::new(Arc::clone(&self.registry))
	}

	/// Watches the components directory and keeps the registry current.
	///
	/// Must be called from within a tokio runtime.
	#[cfg(feature = "dev")]
	pub fn watch(&self) -> Result<tokio::task::JoinHandle<()>, mosaic_dev::WatchError> {
		tracing::info!(dir = %self.settings.components_dir.display(), "watching components");
		self.invalidation_hook().start()
	}
}
