//! Legacy explicit includes
//!
//! `<component src="partials/nav.html" />` (or the paired form with an empty
//! body) is replaced by the raw text of that file from the registry's
//! raw-content cache. Included text is not searched for further includes.

use crate::attributes::parse_attributes;
use crate::diagnostics::{DiagnosticKind, MountDiagnostic};
use crate::scanner::{find_ci, opaque_end, tag_end};
use mosaic_components::ComponentRegistry;

const INCLUDE_TAG: &str = "<component";
const INCLUDE_CLOSE: &str = "</component";

/// Replaces every include tag in `document`.
///
/// Tags without a `src` attribute are left as they are. Unknown paths are
/// replaced by a comment and reported.
pub fn expand_includes(
	document: &str,
	registry: &ComponentRegistry,
	diagnostics: &mut Vec<MountDiagnostic>,
) -> String {
	let bytes = document.as_bytes();
	let mut out = String::with_capacity(document.len());
	let mut copied = 0;
	let mut i = 0;

	while let Some(rel) = document[i..].find('<') {
		let lt = i + rel;
		if let Some(resume) = opaque_end(document, lt) {
			i = resume;
			continue;
		}
		let name_end = lt + INCLUDE_TAG.len();
		let is_include = document[lt..].starts_with(INCLUDE_TAG)
			&& matches!(bytes.get(name_end), Some(b' ' | b'\t' | b'\n' | b'\r' | b'/' | b'>'));
		let Some(gt) = is_include.then(|| tag_end(document, name_end)).flatten() else {
			i = lt + 1;
			continue;
		};

		let inner = document[name_end..gt].trim_end();
		let (attributes, self_closing) = match inner.strip_suffix('/') {
			Some(attributes) => (attributes, true),
			None => (inner, false),
		};
		let props = parse_attributes(attributes);
		let Some(src) = props.get_str("src") else {
			i = gt + 1;
			continue;
		};

		let end = if self_closing {
			gt + 1
		} else {
			closing_end(document, gt + 1).unwrap_or(gt + 1)
		};

		out.push_str(&document[copied..lt]);
		match registry.raw_content(src) {
			Some(text) => {
				tracing::debug!(path = src, "expanded include");
				out.push_str(&text);
			}
			None => {
				tracing::warn!(path = src, "include not found");
				let diagnostic = MountDiagnostic::new(
					DiagnosticKind::IncludeNotFound,
					Some(src),
					format!("include \"{}\" not found", src),
				);
				out.push_str(&diagnostic.comment());
				diagnostics.push(diagnostic);
			}
		}
		copied = end;
		i = end;
	}

	out.push_str(&document[copied..]);
	out
}

/// End of the `</component>` that closes an include opened before `from`.
fn closing_end(document: &str, from: usize) -> Option<usize> {
	let close = find_ci(document, INCLUDE_CLOSE, from)?;
	let after = &document[close + INCLUDE_CLOSE.len()..];
	let trimmed = after.trim_start();
	trimmed
		.starts_with('>')
		.then(|| document.len() - trimmed.len() + 1)
}
