//! # Mosaic Components
//!
//! Component definitions and the registry that loads them for the Mosaic
//! mounting engine.
//!
//! ## Features
//!
//! - **Component names**: `[A-Z][A-Za-z0-9]*`, mapped to lower-cased source files
//! - **Props**: insertion-ordered maps of strings, booleans, and decoded objects
//! - **Source grammar**: one `export Name = { render, styles }` declaration per file
//! - **Definitions**: Tera templates compiled at load time, or Rust closures
//! - **Registry**: on-demand loading, caching, invalidation, and a raw-content
//!   cache for legacy includes
//!
//! ## Example
//!
//! ```rust,no_run
//! use mosaic_components::{ComponentRegistry, Props, RegistryConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ComponentRegistry::new(RegistryConfig::new("components"));
//! let button = registry.resolve("Button")?;
//!
//! let mut props = Props::new();
//! props.insert("size", "large");
//! props.set_children("Go");
//! let html = button.render(&props)?;
//! # let _ = html;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - [`name`] - Component name validation
//! - [`props`] - Property maps passed to render functions
//! - [`source`] - Component source file parser
//! - [`definition`] - Render function plus styles
//! - [`registry`] - Name-keyed definition cache
//! - [`error`] - Error types

pub mod definition;
pub mod error;
pub mod name;
pub mod props;
pub mod registry;
pub mod source;

pub use definition::{ComponentDefinition, RenderFn};
pub use error::{ComponentError, RenderError, Result};
pub use name::ComponentName;
pub use props::{CHILDREN, PropValue, Props};
pub use registry::{
	ComponentRegistry, DEFAULT_COMPONENTS_DIR, DEFAULT_EXTENSION, PreloadSummary, RegistryConfig,
};
pub use source::{ComponentSource, SourceError, parse_source};
