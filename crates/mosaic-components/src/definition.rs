//! Component definitions
//!
//! A definition pairs a render function with optional style text. Definitions
//! loaded from source files render through a Tera template compiled once at
//! load time; hosts can also register plain Rust closures.

use crate::error::{ComponentError, RenderError, Result};
use crate::name::ComponentName;
use crate::props::Props;
use crate::source::ComponentSource;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tera::{Context, Tera};

/// Render function type for closure-backed components
pub type RenderFn = Arc<dyn Fn(&Props) -> std::result::Result<String, RenderError> + Send + Sync>;

/// Name under which the single template of a definition is stored.
///
/// The `.html` suffix turns Tera's autoescaping on.
const TEMPLATE_NAME: &str = "component.html";

#[derive(Clone)]
enum Renderer {
	Template(Arc<Tera>),
	Function(RenderFn),
}

/// A resolvable component: render function plus optional styles.
#[derive(Clone)]
pub struct ComponentDefinition {
	name: ComponentName,
	renderer: Renderer,
	styles: Option<String>,
	source: Option<PathBuf>,
}

impl ComponentDefinition {
	/// Creates a closure-backed definition.
	///
	/// # Examples
	///
	/// ```
	/// use mosaic_components::{ComponentDefinition, ComponentName, Props};
	///
	/// let name = ComponentName::new("Hello").unwrap();
	/// let hello = ComponentDefinition::new(name, |props: &Props| {
	///     Ok(format!("<p>Hello, {}!</p>", props.get_str("name").unwrap_or("world")))
	/// });
	///
	/// assert_eq!(hello.render(&Props::new()).unwrap(), "<p>Hello, world!</p>");
	/// ```
	pub fn new<F>(name: ComponentName, render: F) -> Self
	where
		F: Fn(&Props) -> std::result::Result<String, RenderError> + Send + Sync + 'static,
	{
		Self {
			name,
			renderer: Renderer::Function(Arc::new(render)),
			styles: None,
			source: None,
		}
	}

	/// Compiles a template-backed definition.
	///
	/// Props are the template context. Values are HTML-escaped on output, so
	/// markup passed through `children` needs the `safe` filter.
	///
	/// # Examples
	///
	/// ```
	/// use mosaic_components::{ComponentDefinition, ComponentName, Props};
	///
	/// let name = ComponentName::new("Panel").unwrap();
	/// let panel = ComponentDefinition::from_template(
	///     name,
	///     r#"<section title="{{ title }}">{{ children | safe }}</section>"#,
	/// )
	/// .unwrap();
	///
	/// let mut props = Props::new();
	/// props.insert("title", "Intro");
	/// props.set_children("<p>Hi</p>");
	/// assert_eq!(
	///     panel.render(&props).unwrap(),
	///     r#"<section title="Intro"><p>Hi</p></section>"#
	/// );
	/// ```
	pub fn from_template(name: ComponentName, template: &str) -> Result<Self> {
		let mut tera = Tera::default();
		tera.add_raw_template(TEMPLATE_NAME, template)
			.map_err(|e| ComponentError::InvalidTemplate {
				name: name.to_string(),
				message: describe(&e),
			})?;

		Ok(Self {
			name,
			renderer: Renderer::Template(Arc::new(tera)),
			styles: None,
			source: None,
		})
	}

	/// Builds a definition from a parsed source file.
	pub fn from_source(name: ComponentName, source: ComponentSource) -> Result<Self> {
		let definition = Self::from_template(name, &source.render)?;
		Ok(match source.styles {
			Some(styles) => definition.with_styles(styles),
			None => definition,
		})
	}

	/// Attaches style text. Blank text is treated as no styles.
	pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
		let styles = styles.into();
		self.styles = if styles.trim().is_empty() {
			None
		} else {
			Some(styles)
		};
		self
	}

	/// Records the file this definition was loaded from.
	pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
		self.source = Some(path.into());
		self
	}

	pub fn name(&self) -> &ComponentName {
		&self.name
	}

	pub fn styles(&self) -> Option<&str> {
		self.styles.as_deref()
	}

	pub fn source(&self) -> Option<&Path> {
		self.source.as_deref()
	}

	/// True for definitions compiled from a template.
	pub fn is_template(&self) -> bool {
		matches!(self.renderer, Renderer::Template(_))
	}

	/// Renders the component with `props`.
	pub fn render(&self, props: &Props) -> std::result::Result<String, RenderError> {
		match &self.renderer {
			Renderer::Template(tera) => {
				let context = Context::from_serialize(props)
					.map_err(|e| RenderError::new(self.name.as_str(), describe(&e)))?;
				tera.render(TEMPLATE_NAME, &context)
					.map_err(|e| RenderError::new(self.name.as_str(), describe(&e)))
			}
			Renderer::Function(render) => render(props),
		}
	}
}

impl fmt::Debug for ComponentDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ComponentDefinition")
			.field("name", &self.name)
			.field("template", &self.is_template())
			.field("styles", &self.styles)
			.field("source", &self.source)
			.finish()
	}
}

/// Flattens a Tera error and its causes into one line.
fn describe(err: &tera::Error) -> String {
	let mut message = err.to_string();
	let mut source = std::error::Error::source(err);
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn name(s: &str) -> ComponentName {
		ComponentName::new(s).unwrap()
	}

	#[rstest]
	fn test_template_render_is_pure() {
		let button = ComponentDefinition::from_template(
			name("Button"),
			r#"<button class="btn btn-{{ size }}">{{ children | safe }}</button>"#,
		)
		.unwrap();

		let mut props = Props::new();
		props.insert("size", "large");
		props.set_children("Go");

		let first = button.render(&props).unwrap();
		let second = button.render(&props).unwrap();
		assert_eq!(first, r#"<button class="btn btn-large">Go</button>"#);
		assert_eq!(first, second);
	}

	#[rstest]
	fn test_template_escapes_values() {
		let label = ComponentDefinition::from_template(name("Label"), "<b>{{ text }}</b>").unwrap();
		let mut props = Props::new();
		props.insert("text", "<script>");

		assert_eq!(label.render(&props).unwrap(), "<b>&lt;script&gt;</b>");
	}

	#[rstest]
	fn test_template_sees_objects_and_booleans() {
		let card = ComponentDefinition::from_template(
			name("Card"),
			"{{ data.title }}{% if disabled is defined %} (disabled){% endif %}",
		)
		.unwrap();

		let mut props: Props = [("disabled", true)].into_iter().collect();
		let mut data = serde_json::Map::new();
		data.insert("title".into(), serde_json::json!("Hello"));
		props.insert("data", data);

		assert_eq!(card.render(&props).unwrap(), "Hello (disabled)");
	}

	#[rstest]
	fn test_invalid_template_is_rejected() {
		let err = ComponentDefinition::from_template(name("Broken"), "{% if %}").unwrap_err();
		assert!(matches!(err, ComponentError::InvalidTemplate { ref name, .. } if name == "Broken"));
	}

	#[rstest]
	fn test_missing_variable_is_render_error() {
		let card = ComponentDefinition::from_template(name("Card"), "{{ title }}").unwrap();
		let err = card.render(&Props::new()).unwrap_err();
		assert_eq!(err.component, "Card");
		assert!(err.message.contains("title"), "message: {}", err.message);
	}

	#[rstest]
	fn test_closure_definition() {
		let echo = ComponentDefinition::new(name("Echo"), |props: &Props| {
			Ok(props.children().unwrap_or_default().to_uppercase())
		});
		let mut props = Props::new();
		props.set_children("hi");

		assert!(!echo.is_template());
		assert_eq!(echo.render(&props).unwrap(), "HI");
	}

	#[rstest]
	#[case("", None)]
	#[case("   \n", None)]
	#[case(".a{}", Some(".a{}"))]
	fn test_blank_styles_are_dropped(#[case] styles: &str, #[case] expected: Option<&str>) {
		let def = ComponentDefinition::new(name("A"), |_| Ok(String::new())).with_styles(styles);
		assert_eq!(def.styles(), expected);
	}

	#[rstest]
	fn test_from_source_carries_styles() {
		let source = ComponentSource {
			name: "Tag".into(),
			render: "<i>{{ label }}</i>".into(),
			styles: Some("i { color: red; }".into()),
		};
		let def = ComponentDefinition::from_source(name("Tag"), source)
			.unwrap()
			.with_source("components/tag.component");

		assert!(def.is_template());
		assert_eq!(def.styles(), Some("i { color: red; }"));
		assert_eq!(def.source(), Some(Path::new("components/tag.component")));
	}
}
