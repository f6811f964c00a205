//! Per-occurrence mount diagnostics

use serde::Serialize;
use std::fmt;

/// Prefix of every comment the engine writes into a document.
pub const COMMENT_PREFIX: &str = "mosaic:";

/// What went wrong for one tag occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
	/// No source file for the name
	ComponentNotFound,
	/// The source file could not be read, parsed, or compiled
	ComponentLoadFailure,
	/// A `{…}` attribute value was kept as a string
	AttributeParseFailure,
	/// The render function failed or panicked
	RenderFailure,
	/// A legacy include pointed at an unknown file
	IncludeNotFound,
	/// Child content nested deeper than the configured limit
	DepthExceeded,
}

impl DiagnosticKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::ComponentNotFound => "component_not_found",
			Self::ComponentLoadFailure => "component_load_failure",
			Self::AttributeParseFailure => "attribute_parse_failure",
			Self::RenderFailure => "render_failure",
			Self::IncludeNotFound => "include_not_found",
			Self::DepthExceeded => "depth_exceeded",
		}
	}
}

impl fmt::Display for DiagnosticKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A failure handled while mounting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MountDiagnostic {
	pub kind: DiagnosticKind,
	/// Component name or include path, when known.
	pub component: Option<String>,
	pub message: String,
}

impl MountDiagnostic {
	pub fn new(kind: DiagnosticKind, component: Option<&str>, message: impl Into<String>) -> Self {
		Self {
			kind,
			component: component.map(str::to_string),
			message: message.into(),
		}
	}

	/// The in-document comment for this diagnostic.
	pub fn comment(&self) -> String {
		html_comment(&self.message)
	}
}

impl fmt::Display for MountDiagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.component {
			Some(component) => write!(f, "[{}] {}: {}", self.kind, component, self.message),
			None => write!(f, "[{}] {}", self.kind, self.message),
		}
	}
}

/// Wraps `text` in an HTML comment, breaking up any `--` so the comment
/// cannot end early.
///
/// # Examples
///
/// ```
/// use mosaic_mount::diagnostics::html_comment;
///
/// assert_eq!(html_comment("component \"Card\" not found"), "<!-- mosaic: component \"Card\" not found -->");
/// assert_eq!(html_comment("a-->b"), "<!-- mosaic: a- ->b -->");
/// ```
pub fn html_comment(text: &str) -> String {
	let mut text = text.to_string();
	while text.contains("--") {
		text = text.replace("--", "- -");
	}
	format!("<!-- {} {} -->", COMMENT_PREFIX, text)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("plain", "<!-- mosaic: plain -->")]
	#[case("---", "<!-- mosaic: - - - -->")]
	#[case("a----b", "<!-- mosaic: a- - - -b -->")]
	fn test_html_comment(#[case] text: &str, #[case] expected: &str) {
		assert_eq!(html_comment(text), expected);
	}

	#[rstest]
	fn test_display() {
		let diagnostic = MountDiagnostic::new(
			DiagnosticKind::ComponentNotFound,
			Some("Missing"),
			"component \"Missing\" not found",
		);
		assert_eq!(
			diagnostic.to_string(),
			"[component_not_found] Missing: component \"Missing\" not found"
		);
	}

	#[rstest]
	fn test_serializes_kind_as_snake_case() {
		let diagnostic = MountDiagnostic::new(DiagnosticKind::DepthExceeded, None, "too deep");
		let value = serde_json::to_value(&diagnostic).unwrap();
		assert_eq!(value["kind"], "depth_exceeded");
		assert_eq!(value["component"], serde_json::Value::Null);
	}
}
