//! Mounting engine
//!
//! A mount runs these steps over one document:
//!
//! 1. Head normalization: add `<head></head>` to a rooted document without one.
//! 2. Style pre-collection over every component tag, nested ones included.
//! 3. Style and client script injection into the head.
//! 4. Legacy `<component src="…">` include expansion.
//! 5. Component tag substitution. Children are mounted first and passed to
//!    the render function as `children`; rendered output is not scanned again.
//!
//! Failures never abort a mount. Each one is logged, recorded as a
//! [`MountDiagnostic`], and (with [`MountOptions::annotate`]) written into the
//! document as an HTML comment next to the offending tag.

use crate::attributes::{AttributeFallback, parse_attributes_with_diagnostics};
use crate::diagnostics::{DiagnosticKind, MountDiagnostic};
use crate::head::{inject_head_blocks, normalize_head};
use crate::include::expand_includes;
use crate::scanner::{TagMatch, find_component_tag, opening_tags};
use crate::stylesheet::StyleSheet;
use mosaic_components::{
	ComponentDefinition, ComponentError, ComponentRegistry, RegistryConfig, RenderError,
};
use serde::Serialize;
use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

/// Default nesting limit for recursive child mounting.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Mount behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountOptions {
	/// Script injected once into the head, if set
	pub client_script: Option<String>,
	/// Deepest level of children that is still mounted
	pub max_depth: usize,
	/// Write diagnostic comments into the document
	pub annotate: bool,
}

impl MountOptions {
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
}

impl Default for MountOptions {
	fn default() -> Self {
		Self {
			client_script: None,
			max_depth: DEFAULT_MAX_DEPTH,
			annotate: true,
		}
	}
}

/// Result of [`Mounter::mount_with_report`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MountReport {
	/// Mounted document
	pub html: String,
	/// Styles collected for this document
	pub styles: StyleSheet,
	/// Failures handled along the way, in document order
	pub diagnostics: Vec<MountDiagnostic>,
}

impl MountReport {
	pub fn has_diagnostics(&self) -> bool {
		!self.diagnostics.is_empty()
	}
}

/// Mounts component tags in documents against one registry.
#[derive(Debug, Clone)]
pub struct Mounter {
	registry: Arc<ComponentRegistry>,
	options: MountOptions,
}

impl Mounter {
	pub fn new(registry: Arc<ComponentRegistry>, options: MountOptions) -> Self {
		Self { registry, options }
	}

	pub fn registry(&self) -> &Arc<ComponentRegistry> {
		&self.registry
	}

	pub fn options(&self) -> &MountOptions {
		&self.options
	}

	/// Mounts `document` and returns the finished HTML.
	///
	/// # Examples
	///
	/// ```
	/// use mosaic_components::{ComponentDefinition, ComponentName, ComponentRegistry, RegistryConfig};
	/// use mosaic_mount::{MountOptions, Mounter};
	/// use std::sync::Arc;
	///
	/// let registry = Arc::new(ComponentRegistry::new(RegistryConfig::default()));
	/// registry.register(
	///     ComponentDefinition::from_template(
	///         ComponentName::new("Greeting").unwrap(),
	///         "<p>Hello, {{ name }}!</p>",
	///     )
	///     .unwrap(),
	/// );
	///
	/// let mounter = Mounter::new(registry, MountOptions::default());
	/// assert_eq!(mounter.mount(r#"<Greeting name="Ada" />"#), "<p>Hello, Ada!</p>");
	/// ```
	pub fn mount(&self, document: &str) -> String {
		self.mount_with_report(document).html
	}

	/// Mounts `document`, also returning collected styles and diagnostics.
	pub fn mount_with_report(&self, document: &str) -> MountReport {
		let document = normalize_head(document);

		let mut ignored = Vec::new();
		let styles = self.collect_styles(&expand_includes(&document, &self.registry, &mut ignored));
		let document = inject_head_blocks(
			&document,
			&styles.to_css(),
			self.options.client_script.as_deref(),
		);

		let mut diagnostics = Vec::new();
		let html = self.mount_fragment(&document, 0, &mut diagnostics);
		MountReport {
			html,
			styles,
			diagnostics,
		}
	}

	/// Styles of every component referenced in `document`, without mutating it.
	///
	/// Each distinct name is resolved once. Resolution failures are only
	/// logged here; substitution reports them.
	pub fn collect_styles(&self, document: &str) -> StyleSheet {
		let mut sheet = StyleSheet::new();
		let mut seen = HashSet::new();
		for tag in opening_tags(document) {
			if !seen.insert(tag.name) {
				continue;
			}
			match self.registry.resolve(tag.name) {
				Ok(definition) => {
					if let Some(styles) = definition.styles() {
						sheet.insert(definition.name().clone(), styles);
					}
				}
				Err(err) => {
					tracing::debug!(component = tag.name, error = %err, "skipping styles");
				}
			}
		}
		sheet
	}

	/// Expands includes, then substitutes component tags.
	fn mount_fragment(
		&self,
		fragment: &str,
		depth: usize,
		diagnostics: &mut Vec<MountDiagnostic>,
	) -> String {
		let expanded = expand_includes(fragment, &self.registry, diagnostics);
		self.substitute_tags(&expanded, depth, diagnostics)
	}

	fn substitute_tags(
		&self,
		text: &str,
		depth: usize,
		diagnostics: &mut Vec<MountDiagnostic>,
	) -> String {
		let mut out = String::with_capacity(text.len());
		let mut copied = 0;
		let mut from = 0;

		while let Some(tag) = find_component_tag(text, from) {
			out.push_str(&text[copied..tag.start]);
			match self.registry.resolve(tag.name) {
				Ok(definition) => {
					let rendered = self.render_tag(&definition, &tag, depth, diagnostics);
					out.push_str(&rendered);
					copied = tag.end;
				}
				Err(err) => {
					let diagnostic = unresolved(tag.name, &err);
					if self.options.annotate {
						let comment = diagnostic.comment();
						if !out.ends_with(&comment) {
							out.push_str(&comment);
						}
					}
					diagnostics.push(diagnostic);
					out.push_str(tag.opening(text));
					copied = tag.open_end;
				}
			}
			from = copied;
		}

		out.push_str(&text[copied..]);
		out
	}

	fn render_tag(
		&self,
		definition: &ComponentDefinition,
		tag: &TagMatch<'_>,
		depth: usize,
		diagnostics: &mut Vec<MountDiagnostic>,
	) -> String {
		let name = tag.name;
		let mut out = String::new();

		let (mut props, fallbacks) = parse_attributes_with_diagnostics(tag.attributes);
		for fallback in fallbacks {
			let diagnostic = attribute_fallback(name, &fallback);
			if self.options.annotate {
				out.push_str(&diagnostic.comment());
			}
			diagnostics.push(diagnostic);
		}

		if let Some(children) = tag.children {
			let children = children.trim();
			let mounted = if depth >= self.options.max_depth
				&& find_component_tag(children, 0).is_some()
			{
				tracing::warn!(
					component = name,
					max_depth = self.options.max_depth,
					"nesting limit reached; children left unmounted"
				);
				diagnostics.push(MountDiagnostic::new(
					DiagnosticKind::DepthExceeded,
					Some(name),
					format!(
						"children of \"{}\" nested deeper than {} levels were not mounted",
						name, self.options.max_depth
					),
				));
				children.to_string()
			} else {
				self.mount_fragment(children, depth + 1, diagnostics)
			};
			props.set_children(mounted);
		}

		let result = panic::catch_unwind(AssertUnwindSafe(|| definition.render(&props)))
			.unwrap_or_else(|payload| Err(RenderError::new(name, panic_message(payload.as_ref()))));
		match result {
			Ok(html) => out.push_str(&html),
			Err(err) => {
				tracing::warn!(component = name, error = %err.message, "render failed");
				let diagnostic = MountDiagnostic::new(
					DiagnosticKind::RenderFailure,
					Some(name),
					format!("component \"{}\" failed to render: {}", name, err.message),
				);
				if self.options.annotate {
					out.push_str(&diagnostic.comment());
				}
				diagnostics.push(diagnostic);
			}
		}
		out
	}
}

/// Mounts `document` against a transient registry preloaded from
/// `component_root`.
///
/// An unreadable root is logged and leaves every tag unresolved.
pub fn mount(document: &str, component_root: impl AsRef<Path>) -> String {
	let root = component_root.as_ref();
	let registry = ComponentRegistry::new(RegistryConfig::new(root));
	if let Err(err) = registry.preload(root) {
		tracing::warn!(root = %root.display(), error = %err, "cannot preload components");
	}
	Mounter::new(Arc::new(registry), MountOptions::default()).mount(document)
}

fn unresolved(name: &str, err: &ComponentError) -> MountDiagnostic {
	let (kind, message) = match err {
		ComponentError::NotFound { .. } | ComponentError::InvalidName(_) => (
			DiagnosticKind::ComponentNotFound,
			format!("component \"{}\" not found", name),
		),
		ComponentError::LoadFailure { message, .. } => (
			DiagnosticKind::ComponentLoadFailure,
			format!("component \"{}\" failed to load: {}", name, message),
		),
		other => (
			DiagnosticKind::ComponentLoadFailure,
			format!("component \"{}\" failed to load: {}", name, other),
		),
	};
	tracing::warn!(component = name, error = %err, "component left unresolved");
	MountDiagnostic::new(kind, Some(name), message)
}

fn attribute_fallback(name: &str, fallback: &AttributeFallback) -> MountDiagnostic {
	tracing::warn!(
		component = name,
		attribute = %fallback.attribute,
		error = %fallback.message,
		"attribute value is not a JSON object; kept as text"
	);
	MountDiagnostic::new(
		DiagnosticKind::AttributeParseFailure,
		Some(name),
		format!(
			"attribute \"{}\" of \"{}\" kept as text: {}",
			fallback.attribute, name, fallback.message
		),
	)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		format!("panicked: {}", message)
	} else if let Some(message) = payload.downcast_ref::<String>() {
		format!("panicked: {}", message)
	} else {
		"panicked".to_string()
	}
}
