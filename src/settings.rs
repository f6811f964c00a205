//! Project settings
//!
//! Settings come from a TOML file whose keys are all optional, followed by
//! `MOSAIC_*` environment overrides:
//!
//! ```toml
//! components_dir = "components"
//! component_extension = "component"
//! pages_dir = "pages"
//! cache_components = true
//! client_script = "/assets/mosaic.js"
//! max_depth = 16
//! annotate = true
//! ```

use mosaic_components::{DEFAULT_COMPONENTS_DIR, DEFAULT_EXTENSION, RegistryConfig};
use mosaic_mount::{DEFAULT_MAX_DEPTH, MountOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix of environment variables read by [`MosaicSettings::apply_env`].
pub const ENV_PREFIX: &str = "MOSAIC_";

/// Default pages directory, relative to the project root.
pub const DEFAULT_PAGES_DIR: &str = "pages";

/// Errors raised while loading settings
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("cannot read settings file {path}: {source}", path = .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("invalid setting: {0}")]
	Invalid(String),
}

/// Mosaic project settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MosaicSettings {
	/// Directory holding component sources
	pub components_dir: PathBuf,
	/// Component source file extension
	pub component_extension: String,
	/// Directory holding page files
	pub pages_dir: PathBuf,
	/// Cache loaded components (turn off to re-read sources on every resolve)
	pub cache_components: bool,
	/// Client script injected into every mounted page
	pub client_script: Option<String>,
	/// Nesting limit for recursive child mounting
	pub max_depth: usize,
	/// Write diagnostic comments into mounted documents
	pub annotate: bool,
}

impl Default for MosaicSettings {
	fn default() -> Self {
		Self {
			components_dir: PathBuf::from(DEFAULT_COMPONENTS_DIR),
			component_extension: DEFAULT_EXTENSION.to_string(),
			pages_dir: PathBuf::from(DEFAULT_PAGES_DIR),
			cache_components: true,
			client_script: None,
			max_depth: DEFAULT_MAX_DEPTH,
			annotate: true,
		}
	}
}

impl MosaicSettings {
	/// Parses settings from TOML text. Missing keys keep their defaults.
	///
	/// # Examples
	///
	/// ```
	/// use mosaic::MosaicSettings;
	///
	/// let settings = MosaicSettings::from_toml_str("components_dir = \"ui\"\nmax_depth = 4").unwrap();
	/// assert_eq!(settings.components_dir.to_str(), Some("ui"));
	/// assert_eq!(settings.max_depth, 4);
	/// assert!(settings.cache_components);
	/// ```
	pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(text)?;
		settings.validate()
	}

	/// Reads a settings file. Relative directories are resolved against the
	/// file's own directory.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let settings = Self::from_toml_str(&text)?;
		tracing::debug!(path = %path.display(), "loaded settings");
		Ok(match path.parent() {
			Some(base) if !base.as_os_str().is_empty() => settings.with_base_dir(base),
			_ => settings,
		})
	}

	/// Applies `MOSAIC_*` overrides from the process environment.
	pub fn apply_env(self) -> Result<Self, SettingsError> {
		self.apply_env_from(std::env::vars())
	}

	/// Applies `MOSAIC_*` overrides from `vars`. Other variables are ignored.
	pub fn apply_env_from<I, K, V>(mut self, vars: I) -> Result<Self, SettingsError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<String>,
	{
		for (key, value) in vars {
			let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
				continue;
			};
			let value = value.into();
			match name {
				"COMPONENTS_DIR" => self.components_dir = PathBuf::from(value),
				"COMPONENT_EXTENSION" => self.component_extension = value,
				"PAGES_DIR" => self.pages_dir = PathBuf::from(value),
				"CACHE_COMPONENTS" => self.cache_components = parse_bool(key.as_ref(), &value)?,
				"CLIENT_SCRIPT" => {
					self.client_script = if value.trim().is_empty() { None } else { Some(value) };
				}
				"MAX_DEPTH" => {
					self.max_depth = value.trim().parse().map_err(|_| {
						SettingsError::Invalid(format!("{} must be a positive integer, got {:?}", key.as_ref(), value))
					})?;
				}
				"ANNOTATE" => self.annotate = parse_bool(key.as_ref(), &value)?,
				other => {
					tracing::debug!(variable = %format!("{}{}", ENV_PREFIX, other), "ignoring unknown setting");
				}
			}
		}
		self.validate()
	}

	/// Resolves relative directories against `base`.
	pub fn with_base_dir(mut self, base: impl AsRef<Path>) -> Self {
		let base = base.as_ref();
		if self.components_dir.is_relative() {
			self.components_dir = base.join(&self.components_dir);
		}
		if self.pages_dir.is_relative() {
			self.pages_dir = base.join(&self.pages_dir);
		}
		self
	}

	pub fn with_components_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.components_dir = dir.into();
		self
	}

	pub fn with_component_extension(mut self, extension: impl Into<String>) -> Self {
		self.component_extension = extension.into();
		self
	}

	pub fn with_pages_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.pages_dir = dir.into();
		self
	}

	pub fn with_cache_components(mut self, enabled: bool) -> Self {
		self.cache_components = enabled;
		self
	}

	pub fn with_client_script(mut self, src: impl Into<String>) -> Self {
		self.client_script = Some(src.into());
		self
	}

	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn with_annotate(mut self, annotate: bool) -> Self {
		self.annotate = annotate;
		self
	}

	/// Registry configuration derived from these settings.
	pub fn registry_config(&self) -> RegistryConfig {
		RegistryConfig::new(&self.components_dir)
			.with_extension(self.component_extension.clone())
			.with_cache(self.cache_components)
	}

	/// Mount options derived from these settings.
	pub fn mount_options(&self) -> MountOptions {
		let options = MountOptions::default()
			.with_max_depth(self.max_depth)
			.with_annotate(self.annotate);
		match &self.client_script {
			Some(src) => options.with_client_script(src.clone()),
			None => options,
		}
	}

	fn validate(self) -> Result<Self, SettingsError> {
		let extension = self.component_extension.trim_start_matches('.');
		if extension.is_empty() || extension.contains(['/', '\\', '.']) {
			return Err(SettingsError::Invalid(format!(
				"component_extension must be a plain file extension, got {:?}",
				self.component_extension
			)));
		}
		if self.max_depth == 0 {
			return Err(SettingsError::Invalid("max_depth must be at least 1".to_string()));
		}
		Ok(self)
	}
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" => Ok(false),
		_ => Err(SettingsError::Invalid(format!(
			"{} must be a boolean, got {:?}",
			key, value
		))),
	}
}
