//! # Mosaic Mount
//!
//! Mounts capitalized component tags embedded in HTML documents.
//!
//! Every `<Name …>` tag found in a document is resolved through a
//! [`ComponentRegistry`](mosaic_components::ComponentRegistry), rendered with
//! its attributes (and mounted children) as props, and replaced by the
//! result. The styles of every component used are collected once and
//! injected into the document head as a single `<style>` block.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mosaic_components::{ComponentRegistry, RegistryConfig};
//! use mosaic_mount::{MountOptions, Mounter};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ComponentRegistry::new(RegistryConfig::new("components")));
//! registry.preload("components").ok();
//!
//! let mounter = Mounter::new(registry, MountOptions::default());
//! let html = mounter.mount(r#"<html><body><Button size="large">Go</Button></body></html>"#);
//! # let _ = html;
//! ```
//!
//! ## Module Structure
//!
//! - [`scanner`] - Component tag scanner
//! - [`attributes`] - Attribute text to props
//! - [`engine`] - The mount pipeline
//! - [`head`] - Style and client script injection
//! - [`include`] - Legacy `<component src>` includes
//! - [`stylesheet`] - Aggregated, deduplicated styles
//! - [`diagnostics`] - Per-occurrence failure reports
//! - [`project`] - Page discovery and project-wide style scan
//! - [`page`] - Page rendering for routers

pub mod attributes;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod head;
pub mod include;
pub mod page;
pub mod project;
pub mod scanner;
pub mod stylesheet;

pub use attributes::{AttributeFallback, parse_attributes, parse_attributes_with_diagnostics};
pub use diagnostics::{DiagnosticKind, MountDiagnostic};
pub use engine::{DEFAULT_MAX_DEPTH, MountOptions, MountReport, Mounter, mount};
pub use error::{Result, ScanError};
pub use head::{CLIENT_SENTINEL, STYLE_SENTINEL};
pub use page::{HTML_CONTENT_TYPE, PageRenderer, PageResponse};
pub use project::{PAGE_EXTENSIONS, discover_pages};
pub use stylesheet::StyleSheet;
