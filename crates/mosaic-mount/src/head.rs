//! Style injector
//!
//! Puts the aggregated style block and the shared client script reference
//! into the document head. Both blocks carry a sentinel attribute and are
//! never inserted twice, which keeps repeated mounts of one document stable.

use crate::attributes::parse_attributes;
use crate::scanner::{is_tag_boundary, opaque_end, tag_end};

/// Attribute marking the injected style block.
pub const STYLE_SENTINEL: &str = "data-mosaic-styles";

/// Attribute marking the injected client script.
pub const CLIENT_SENTINEL: &str = "data-mosaic-client";

/// Inserts `<head></head>` after the `<html …>` root tag when the document
/// has a root but no head.
///
/// # Examples
///
/// ```
/// use mosaic_mount::head::normalize_head;
///
/// assert_eq!(
///     normalize_head("<html lang=\"en\"><body></body></html>"),
///     "<html lang=\"en\"><head></head><body></body></html>"
/// );
/// assert_eq!(normalize_head("<p>fragment</p>"), "<p>fragment</p>");
/// ```
pub fn normalize_head(document: &str) -> String {
	if has_head(document) {
		return document.to_string();
	}
	let Some(root) = find_tag(document, "html") else {
		return document.to_string();
	};
	let Some(gt) = document[root..].find('>').map(|p| root + p) else {
		return document.to_string();
	};

	let mut out = String::with_capacity(document.len() + 13);
	out.push_str(&document[..=gt]);
	out.push_str("<head></head>");
	out.push_str(&document[gt + 1..]);
	out
}

/// True if the document has a `<head>` element (`<header>` does not count).
pub fn has_head(document: &str) -> bool {
	find_tag(document, "head").is_some()
}

/// Inserts `block` before the first `</head>`, or at the very start of a
/// document without one. Comments and `<script>`/`<style>` contents are not
/// searched.
pub fn inject(document: &str, block: &str) -> String {
	let at = find_tag(document, "/head").unwrap_or(0);
	let mut out = String::with_capacity(document.len() + block.len());
	out.push_str(&document[..at]);
	out.push_str(block);
	out.push_str(&document[at..]);
	out
}

/// True if a `<style>` element carrying the style sentinel attribute is
/// already in the document.
pub fn has_style_block(document: &str) -> bool {
	has_marked_tag(document, "style", STYLE_SENTINEL)
}

/// True if a `<script>` element carrying the client sentinel attribute is
/// already in the document.
pub fn has_client_script(document: &str) -> bool {
	has_marked_tag(document, "script", CLIENT_SENTINEL)
}

/// The injected style element.
pub fn style_block(css: &str) -> String {
	format!("<style {}>\n{}\n</style>", STYLE_SENTINEL, css)
}

/// The injected client script element.
///
/// # Examples
///
/// ```
/// use mosaic_mount::head::client_script_tag;
///
/// assert_eq!(
///     client_script_tag("/assets/mosaic.js"),
///     r#"<script src="/assets/mosaic.js" data-mosaic-client defer></script>"#
/// );
/// ```
pub fn client_script_tag(src: &str) -> String {
	format!(
		"<script src=\"{}\" {} defer></script>",
		html_escape::encode_double_quoted_attribute(src),
		CLIENT_SENTINEL
	)
}

/// Adds the style block and client script a document does not have yet.
///
/// Blocks that go in together keep the order style, then script.
pub fn inject_head_blocks(document: &str, css: &str, client_script: Option<&str>) -> String {
	let mut block = String::new();
	if !css.trim().is_empty() && !has_style_block(document) {
		block.push_str(&style_block(css));
	}
	if let Some(src) = client_script
		&& !has_client_script(document)
	{
		block.push_str(&client_script_tag(src));
	}
	if block.is_empty() {
		document.to_string()
	} else {
		inject(document, &block)
	}
}

/// Offset of the first `<{tag}` tag, matched case-insensitively and followed
/// by whitespace, `/` or `>`. Pass `/head` to find a closing tag.
fn find_tag(document: &str, tag: &str) -> Option<usize> {
	find_markup(document, |lt| tag_name_end(document, lt, tag).is_some())
}

fn has_marked_tag(document: &str, tag: &str, sentinel: &str) -> bool {
	find_markup(document, |lt| {
		let Some(name_end) = tag_name_end(document, lt, tag) else {
			return false;
		};
		tag_end(document, name_end)
			.is_some_and(|gt| parse_attributes(&document[name_end..gt]).contains_key(sentinel))
	})
	.is_some()
}

/// End of `tag` when the markup at `lt` is `<{tag}` followed by a boundary.
fn tag_name_end(document: &str, lt: usize, tag: &str) -> Option<usize> {
	let bytes = document.as_bytes();
	let end = lt + 1 + tag.len();
	let name = bytes.get(lt + 1..end)?;
	(name.eq_ignore_ascii_case(tag.as_bytes()) && is_tag_boundary(bytes.get(end).copied()))
		.then_some(end)
}

/// First `<` for which `accept` holds. Comments are skipped whole; a
/// `<script>` or `<style>` opening tag is offered, then its contents skipped.
fn find_markup(document: &str, mut accept: impl FnMut(usize) -> bool) -> Option<usize> {
	let mut i = 0;
	while let Some(offset) = document[i..].find('<') {
		let lt = i + offset;
		if document[lt..].starts_with("<!--") {
			i = opaque_end(document, lt).unwrap_or(document.len());
			continue;
		}
		if accept(lt) {
			return Some(lt);
		}
		i = opaque_end(document, lt).unwrap_or(lt + 1);
	}
	None
}
