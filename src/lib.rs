//! # Mosaic
//!
//! A template-mounting engine for HTML documents.
//!
//! Pages are plain HTML with capitalized component tags mixed in:
//!
//! ```html
//! <html>
//! <body>
//!   <Card data={"title": "Welcome"}>
//!     <Button size="large" disabled>Go</Button>
//!   </Card>
//! </body>
//! </html>
//! ```
//!
//! Each component lives in its own source file under the components
//! directory:
//!
//! ```text
//! // components/button.component
//! export Button = {
//!     render: `<button class="btn btn-{{ size }}">{{ children | safe }}</button>`,
//!     styles: `.btn { padding: 0.5rem; }`,
//! };
//! ```
//!
//! Mounting replaces every tag with its rendered markup and injects the
//! styles of every component used into the head, once.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mosaic::{Mosaic, MosaicSettings};
//!
//! let mosaic = Mosaic::from_settings(MosaicSettings::default());
//! let html = mosaic.mount(r#"<html><body><Button size="large">Go</Button></body></html>"#);
//! # let _ = html;
//! ```
//!
//! ## Feature Flags
//!
//! - `dev` (default) - file watching and registry invalidation ([`Mosaic::watch`])
//!
//! ## Crates
//!
//! - [`components`] - names, props, source grammar, registry
//! - [`mount`] - tag scanning, attributes, the mount pipeline, style injection
//! - `dev` - file watcher and invalidation hook

pub mod app;
pub mod settings;

pub use mosaic_components as components;
#[cfg(feature = "dev")]
pub use mosaic_dev as dev;
pub use mosaic_mount as mount;

pub use app::Mosaic;
pub use settings::{ENV_PREFIX, MosaicSettings, SettingsError};

pub use mosaic_components::{
	ComponentDefinition, ComponentError, ComponentName, ComponentRegistry, PropValue, Props,
	RegistryConfig, RenderError,
};
#[cfg(feature = "dev")]
pub use mosaic_dev::{FileWatcher, Invalidation, InvalidationHook, WatchError, WatchEvent};
pub use mosaic_mount::{
	MountDiagnostic, MountOptions, MountReport, Mounter, PageRenderer, PageResponse, StyleSheet,
	parse_attributes,
};
