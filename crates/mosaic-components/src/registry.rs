//! Component registry
//!
//! Resolves component names to definitions, loading source files from a
//! components directory on demand and caching the result. The registry also
//! keeps a raw-content cache of every file seen during [`ComponentRegistry::preload`],
//! used by legacy `<component src="…">` includes.
//!
//! A registry is an ordinary value: hosts create one (usually behind an
//! [`Arc`](std::sync::Arc)), hand it to mounters and the invalidation hook,
//! and drop or [`dispose`](ComponentRegistry::dispose) it when done. Separate
//! registries never share state.

use crate::definition::ComponentDefinition;
use crate::error::{ComponentError, Result};
use crate::name::ComponentName;
use crate::source::parse_source;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Default components directory, relative to the project root.
pub const DEFAULT_COMPONENTS_DIR: &str = "components";

/// Default component source file extension.
pub const DEFAULT_EXTENSION: &str = "component";

/// Where and how a registry finds component sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
	/// Directory searched (recursively) for component sources
	pub components_dir: PathBuf,
	/// Source file extension, without the leading dot
	pub extension: String,
	/// When false, file-backed definitions are re-read on every resolve
	pub cache_enabled: bool,
}

impl RegistryConfig {
	/// Configuration for `components_dir` with default extension and caching.
	pub fn new(components_dir: impl Into<PathBuf>) -> Self {
		Self {
			components_dir: components_dir.into(),
			..Self::default()
		}
	}

	/// Sets the source file extension. A leading dot is ignored.
	pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
		let extension = extension.into();
		self.extension = extension.trim_start_matches('.').to_string();
		self
	}

	/// Enables or disables definition caching.
	pub fn with_cache(mut self, enabled: bool) -> Self {
		self.cache_enabled = enabled;
		self
	}

	/// True if `path` has the component source extension.
	pub fn is_component_file(&self, path: &Path) -> bool {
		path.extension()
			.and_then(|e| e.to_str())
			.is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
	}
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			components_dir: PathBuf::from(DEFAULT_COMPONENTS_DIR),
			extension: DEFAULT_EXTENSION.to_string(),
			cache_enabled: true,
		}
	}
}

/// Counts reported by [`ComponentRegistry::preload`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadSummary {
	/// Component sources loaded and registered
	pub loaded: usize,
	/// Component sources that failed to load
	pub failed: usize,
	/// Files stored in the raw-content cache
	pub raw_files: usize,
}

/// Name-keyed cache of component definitions
#[derive(Debug)]
pub struct ComponentRegistry {
	config: RegistryConfig,
	definitions: RwLock<HashMap<ComponentName, Arc<ComponentDefinition>>>,
	styles: RwLock<HashMap<ComponentName, String>>,
	raw: RwLock<HashMap<String, String>>,
}

impl ComponentRegistry {
	/// Creates an empty registry.
	///
	/// # Examples
	///
	/// ```
	/// use mosaic_components::{ComponentRegistry, RegistryConfig};
	///
	/// let registry = ComponentRegistry::new(RegistryConfig::new("components"));
	/// assert!(registry.is_empty());
	/// ```
	pub fn new(config: RegistryConfig) -> Self {
		Self {
			config,
			definitions: RwLock::new(HashMap::new()),
			styles: RwLock::new(HashMap::new()),
			raw: RwLock::new(HashMap::new()),
		}
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Resolves `name` to a definition, loading it from disk on a cache miss.
	///
	/// # Errors
	///
	/// - [`ComponentError::InvalidName`] if `name` is not a component name
	/// - [`ComponentError::NotFound`] if no source file matches
	/// - [`ComponentError::LoadFailure`] if the source cannot be read, parsed,
	///   or compiled
	///
	/// Failures leave the cache untouched and are only logged at debug level;
	/// callers decide how loudly to report them.
	pub fn resolve(&self, name: &str) -> Result<Arc<ComponentDefinition>> {
		let name = ComponentName::new(name)?;

		if let Some(definition) = self.get(name.as_str())
			&& (self.config.cache_enabled || definition.source().is_none())
		{
			return Ok(definition);
		}

		let Some(path) = self.locate(&name) else {
			tracing::debug!(
				component = %name,
				dir = %self.config.components_dir.display(),
				"component not found"
			);
			return Err(ComponentError::NotFound {
				name: name.to_string(),
			});
		};

		tracing::debug!(component = %name, path = %path.display(), "loading component");
		match self.load_file(&name, &path) {
			Ok(definition) => {
				self.insert(definition.clone());
				Ok(definition)
			}
			Err(err) => {
				tracing::debug!(
					component = %name,
					path = %path.display(),
					error = %err,
					"failed to load component"
				);
				Err(err)
			}
		}
	}

	/// Cache-only lookup.
	pub fn get(&self, name: &str) -> Option<Arc<ComponentDefinition>> {
		self.definitions.read().get(name).cloned()
	}

	/// Cached styles for `name`, without rendering.
	pub fn styles(&self, name: &str) -> Option<String> {
		self.styles.read().get(name).cloned()
	}

	/// Registers a definition built by the host, replacing any entry of the
	/// same name.
	pub fn register(&self, definition: ComponentDefinition) -> Arc<ComponentDefinition> {
		let definition = Arc::new(definition);
		self.insert(definition.clone());
		definition
	}

	fn insert(&self, definition: Arc<ComponentDefinition>) {
		let name = definition.name().clone();
		match definition.styles() {
			Some(styles) => {
				self.styles.write().insert(name.clone(), styles.to_string());
			}
			None => {
				self.styles.write().remove(&name);
			}
		}
		self.definitions.write().insert(name, definition);
	}

	/// Removes `name` from the definition and styles caches.
	///
	/// Matching is case-insensitive so that every alias cached for one source
	/// file is evicted. Returns true if anything was removed.
	pub fn invalidate(&self, name: &str) -> bool {
		let before = self.definitions.read().len();
		self.definitions.write().retain(|key, _| !key.matches(name));
		self.styles.write().retain(|key, _| !key.matches(name));
		let removed = before != self.definitions.read().len();
		if removed {
			tracing::debug!(component = name, "invalidated component");
		}
		removed
	}

	/// Evicts everything loaded from `path`, including its raw content.
	pub fn invalidate_path(&self, path: &Path) -> bool {
		let key = self.key_for(path);
		let mut evicted = Vec::new();
		self.definitions.write().retain(|name, definition| {
			let hit = definition
				.source()
				.is_some_and(|source| source == path || (key.is_some() && self.key_for(source) == key));
			if hit {
				evicted.push(name.clone());
			}
			!hit
		});
		{
			let mut styles = self.styles.write();
			for name in &evicted {
				styles.remove(name);
			}
		}

		let mut removed = !evicted.is_empty();
		if self.config.is_component_file(path)
			&& let Ok(name) = ComponentName::from_path(path)
		{
			removed |= self.invalidate(name.as_str());
		}
		if let Some(key) = key {
			removed |= self.raw.write().remove(&key).is_some();
		}
		removed
	}

	/// Re-reads `path` after an add or change event.
	///
	/// Component sources replace their cached entry and return the new
	/// definition; other files only refresh the raw-content cache and return
	/// `None`.
	pub fn reload_path(&self, path: &Path) -> Result<Option<Arc<ComponentDefinition>>> {
		let text = fs::read_to_string(path)?;
		let is_component = self.config.is_component_file(path);
		if is_component {
			self.invalidate_path(path);
		}
		if let Some(key) = self.key_for(path) {
			self.cache_raw(key, text.clone());
		}
		if !is_component {
			return Ok(None);
		}

		let name = ComponentName::from_path(path)?;
		let definition = self.compile(&name, path, &text)?;
		self.insert(definition.clone());
		tracing::debug!(component = %name, path = %path.display(), "reloaded component");
		Ok(Some(definition))
	}

	/// Walks `root` and registers every component source found.
	///
	/// Every readable UTF-8 file is also stored in the raw-content cache under
	/// its path relative to `root`. Individual failures are logged and counted.
	///
	/// # Errors
	///
	/// Returns [`ComponentError::Io`] if `root` itself cannot be read.
	pub fn preload(&self, root: impl AsRef<Path>) -> Result<PreloadSummary> {
		let root = root.as_ref();
		fs::read_dir(root)?;

		let mut summary = PreloadSummary::default();
		for entry in WalkDir::new(root).sort_by_file_name() {
			let entry = match entry {
				Ok(entry) => entry,
				Err(err) => {
					tracing::warn!(error = %err, "skipping unreadable entry during preload");
					continue;
				}
			};
			if !entry.file_type().is_file() {
				continue;
			}

			let path = entry.path();
			let text = match fs::read_to_string(path) {
				Ok(text) => text,
				Err(err) => {
					tracing::debug!(path = %path.display(), error = %err, "skipping non-text file");
					continue;
				}
			};
			if let Ok(relative) = path.strip_prefix(root) {
				self.cache_raw(normalize_key(relative), text.clone());
				summary.raw_files += 1;
			}

			if !self.config.is_component_file(path) {
				continue;
			}
			let loaded = ComponentName::from_path(path)
				.and_then(|name| self.compile(&name, path, &text));
			match loaded {
				Ok(definition) => {
					self.insert(definition);
					summary.loaded += 1;
				}
				Err(err) => {
					tracing::warn!(path = %path.display(), error = %err, "failed to preload component");
					summary.failed += 1;
				}
			}
		}

		tracing::info!(
			root = %root.display(),
			loaded = summary.loaded,
			failed = summary.failed,
			raw_files = summary.raw_files,
			"preloaded components"
		);
		Ok(summary)
	}

	/// Raw text of a file seen by the registry, by relative path.
	///
	/// Leading `./` and `/` are ignored, as is a leading segment naming the
	/// components directory itself (`components/nav.html`).
	pub fn raw_content(&self, path: &str) -> Option<String> {
		let key = normalize_key(Path::new(path.trim_start_matches('/')));
		let raw = self.raw.read();
		if let Some(text) = raw.get(&key) {
			return Some(text.clone());
		}
		let dir_name = self.config.components_dir.file_name()?.to_str()?;
		let stripped = key.strip_prefix(dir_name)?.strip_prefix('/')?;
		raw.get(stripped).cloned()
	}

	/// Stores raw text under a relative path.
	pub fn cache_raw(&self, path: impl Into<String>, text: impl Into<String>) {
		self.raw.write().insert(path.into(), text.into());
	}

	/// True if `path` lies inside the components directory.
	pub fn owns(&self, path: &Path) -> bool {
		self.key_for(path).is_some()
	}

	/// Cached component names, sorted.
	pub fn names(&self) -> Vec<ComponentName> {
		let mut names: Vec<_> = self.definitions.read().keys().cloned().collect();
		names.sort();
		names
	}

	pub fn contains(&self, name: &str) -> bool {
		self.definitions.read().contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.definitions.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.read().is_empty()
	}

	/// Drops every cached definition, style, and raw file.
	pub fn dispose(&self) {
		self.definitions.write().clear();
		self.styles.write().clear();
		self.raw.write().clear();
	}

	/// Finds the source file for `name`.
	///
	/// Tries `<dir>/<lowercase name>.<ext>` first, then walks the directory
	/// for a file whose stem matches case-insensitively.
	fn locate(&self, name: &ComponentName) -> Option<PathBuf> {
		let dir = &self.config.components_dir;
		let direct = dir.join(format!("{}.{}", name.file_stem(), self.config.extension));
		if direct.is_file() {
			return Some(direct);
		}

		WalkDir::new(dir)
			.sort_by_file_name()
			.into_iter()
			.filter_map(|entry| entry.ok())
			.filter(|entry| entry.file_type().is_file())
			.map(|entry| entry.into_path())
			.find(|path| {
				self.config.is_component_file(path)
					&& path
						.file_stem()
						.and_then(|s| s.to_str())
						.is_some_and(|stem| name.matches(stem))
			})
	}

	fn load_file(&self, name: &ComponentName, path: &Path) -> Result<Arc<ComponentDefinition>> {
		let text = fs::read_to_string(path).map_err(|e| {
			ComponentError::load_failure(name.as_str(), path, format!("cannot read source: {}", e))
		})?;
		let definition = self.compile(name, path, &text)?;
		if let Some(key) = self.key_for(path) {
			self.cache_raw(key, text);
		}
		Ok(definition)
	}

	fn compile(&self, name: &ComponentName, path: &Path, text: &str) -> Result<Arc<ComponentDefinition>> {
		let source = parse_source(text)
			.map_err(|e| ComponentError::load_failure(name.as_str(), path, e.to_string()))?;
		if !name.matches(&source.name) {
			return Err(ComponentError::load_failure(
				name.as_str(),
				path,
				format!("file declares `{}`, expected `{}`", source.name, name),
			));
		}
		let definition = ComponentDefinition::from_source(name.clone(), source)
			.map_err(|e| ComponentError::load_failure(name.as_str(), path, e.to_string()))?;
		Ok(Arc::new(definition.with_source(path)))
	}

	/// Path of `path` relative to the components directory, as a cache key.
	///
	/// Watcher events may report absolute or canonical paths while the
	/// configured directory is relative, so both forms are tried. Deleted
	/// files cannot be canonicalized; their parent directory is used instead.
	fn key_for(&self, path: &Path) -> Option<String> {
		let dir = &self.config.components_dir;
		if let Ok(relative) = path.strip_prefix(dir) {
			return Some(normalize_key(relative));
		}

		let canonical_dir = dir.canonicalize().ok()?;
		let canonical_path = path.canonicalize().ok().or_else(|| {
			let parent = path.parent()?.canonicalize().ok()?;
			Some(parent.join(path.file_name()?))
		})?;
		canonical_path
			.strip_prefix(&canonical_dir)
			.ok()
			.map(normalize_key)
	}
}

/// Joins the normal components of a relative path with `/`.
fn normalize_key(path: &Path) -> String {
	path.components()
		.filter_map(|component| match component {
			Component::Normal(part) => part.to_str(),
			_ => None,
		})
		.collect::<Vec<_>>()
		.join("/")
}
