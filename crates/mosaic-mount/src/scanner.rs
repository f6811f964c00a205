//! Component tag scanner
//!
//! Finds capitalized tags in HTML text without building a tree. Comments and
//! the contents of `<script>` and `<style>` elements are opaque. A paired
//! tag is matched to its own closing tag by counting nested opening tags of
//! the same name, so `<Box><Box>a</Box></Box>` pairs the outer tags.
//!
//! Upper-case spellings of standard HTML elements (`<HTML>`, `<BODY>`, `<P>`)
//! are plain markup, not components. A mixed-case name such as `<Table>` is
//! still a component.

/// Standard HTML element names that are never components when written in
/// all capitals.
const HTML_ELEMENTS: &[&str] = &[
	"A", "ABBR", "ADDRESS", "AREA", "ARTICLE", "ASIDE", "AUDIO", "B", "BASE", "BDI", "BDO",
	"BLOCKQUOTE", "BODY", "BR", "BUTTON", "CANVAS", "CAPTION", "CENTER", "CITE", "CODE", "COL",
	"COLGROUP", "DATA", "DATALIST", "DD", "DEL", "DETAILS", "DFN", "DIALOG", "DIV", "DL", "DT",
	"EM", "EMBED", "FIELDSET", "FIGCAPTION", "FIGURE", "FONT", "FOOTER", "FORM", "FRAME",
	"FRAMESET", "H1", "H2", "H3", "H4", "H5", "H6", "HEAD", "HEADER", "HGROUP", "HR", "HTML", "I",
	"IFRAME", "IMG", "INPUT", "INS", "KBD", "LABEL", "LEGEND", "LI", "LINK", "MAIN", "MAP", "MARK",
	"MENU", "META", "METER", "NAV", "NOSCRIPT", "OBJECT", "OL", "OPTGROUP", "OPTION", "OUTPUT",
	"P", "PARAM", "PICTURE", "PRE", "PROGRESS", "Q", "RP", "RT", "RUBY", "S", "SAMP", "SCRIPT",
	"SEARCH", "SECTION", "SELECT", "SLOT", "SMALL", "SOURCE", "SPAN", "STRONG", "STYLE", "SUB",
	"SUMMARY", "SUP", "TABLE", "TBODY", "TD", "TEMPLATE", "TEXTAREA", "TFOOT", "TH", "THEAD",
	"TIME", "TITLE", "TR", "TRACK", "TT", "U", "UL", "VAR", "VIDEO", "WBR",
];

/// True for an all-capitals spelling of a standard HTML element.
pub fn is_html_element(name: &str) -> bool {
	HTML_ELEMENTS.binary_search(&name).is_ok()
}

/// An opening tag such as `<Card title="x">` or `<Icon name="x" />`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningTag<'a> {
	/// Tag name.
	pub name: &'a str,
	/// Raw attribute text, trimmed, without the self-closing slash.
	pub attributes: &'a str,
	/// Byte offset of `<`.
	pub start: usize,
	/// Byte offset just past `>`.
	pub end: usize,
	pub self_closing: bool,
}

/// How a component tag occurrence is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
	/// `<Name … />`
	SelfClosing,
	/// `<Name …>children</Name>`
	Paired,
	/// `<Name …>` with no matching closing tag
	Unmatched,
}

/// One component tag occurrence and its span in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMatch<'a> {
	pub name: &'a str,
	pub attributes: &'a str,
	/// Byte offset of the opening `<`.
	pub start: usize,
	/// Byte offset just past the opening tag.
	pub open_end: usize,
	/// Byte offset just past the whole occurrence (closing tag included).
	pub end: usize,
	/// Untrimmed inner markup of a paired tag.
	pub children: Option<&'a str>,
	pub kind: TagKind,
}

impl TagMatch<'_> {
	/// The opening tag text.
	pub fn opening<'d>(&self, document: &'d str) -> &'d str {
		&document[self.start..self.open_end]
	}
}

/// Finds the first component tag starting at or after `from`.
///
/// # Examples
///
/// ```
/// use mosaic_mount::scanner::{TagKind, find_component_tag};
///
/// let doc = r#"<p>Hi</p><Box size="s"><Box>a</Box></Box>"#;
/// let tag = find_component_tag(doc, 0).unwrap();
/// assert_eq!(tag.name, "Box");
/// assert_eq!(tag.attributes, r#"size="s""#);
/// assert_eq!(tag.children, Some("<Box>a</Box>"));
/// assert_eq!(tag.kind, TagKind::Paired);
/// assert_eq!(tag.end, doc.len());
/// ```
pub fn find_component_tag(document: &str, from: usize) -> Option<TagMatch<'_>> {
	let open = next_opening(document, from)?;
	if open.self_closing {
		return Some(TagMatch {
			name: open.name,
			attributes: open.attributes,
			start: open.start,
			open_end: open.end,
			end: open.end,
			children: None,
			kind: TagKind::SelfClosing,
		});
	}

	Some(match find_closing(document, open.name, open.end) {
		Some((close_start, close_end)) => TagMatch {
			name: open.name,
			attributes: open.attributes,
			start: open.start,
			open_end: open.end,
			end: close_end,
			children: Some(&document[open.end..close_start]),
			kind: TagKind::Paired,
		},
		None => TagMatch {
			name: open.name,
			attributes: open.attributes,
			start: open.start,
			open_end: open.end,
			end: open.end,
			children: None,
			kind: TagKind::Unmatched,
		},
	})
}

/// Top-level component tags, in document order.
///
/// Tags nested inside a paired tag's children are not yielded.
pub fn component_tags(document: &str) -> impl Iterator<Item = TagMatch<'_>> {
	let mut from = 0;
	std::iter::from_fn(move || {
		let tag = find_component_tag(document, from)?;
		from = tag.end;
		Some(tag)
	})
}

/// Every component opening tag, nested ones included, in document order.
pub fn opening_tags(document: &str) -> impl Iterator<Item = OpeningTag<'_>> {
	let mut from = 0;
	std::iter::from_fn(move || {
		let tag = next_opening(document, from)?;
		from = tag.end;
		Some(tag)
	})
}

/// Finds the next capitalized opening tag at or after `from`.
pub fn next_opening(document: &str, from: usize) -> Option<OpeningTag<'_>> {
	let bytes = document.as_bytes();
	let mut i = from;
	while i < bytes.len() {
		let lt = i + document[i..].find('<')?;
		if let Some(resume) = opaque_end(document, lt) {
			i = resume;
			continue;
		}
		if !bytes.get(lt + 1).is_some_and(u8::is_ascii_uppercase) {
			i = lt + 1;
			continue;
		}

		let name_end = name_end(bytes, lt + 1);
		if !is_tag_boundary(bytes.get(name_end).copied())
			|| is_html_element(&document[lt + 1..name_end])
		{
			i = lt + 1;
			continue;
		}
		let Some(gt) = tag_end(document, name_end) else {
			i = lt + 1;
			continue;
		};

		let inner = document[name_end..gt].trim_end();
		let (attributes, self_closing) = match inner.strip_suffix('/') {
			Some(attributes) => (attributes, true),
			None => (inner, false),
		};
		return Some(OpeningTag {
			name: &document[lt + 1..name_end],
			attributes: attributes.trim(),
			start: lt,
			end: gt + 1,
			self_closing,
		});
	}
	None
}

/// Finds the closing tag matching an opening `<name>` that ended at `from`.
///
/// Returns the span of `</name>`.
fn find_closing(document: &str, name: &str, from: usize) -> Option<(usize, usize)> {
	let bytes = document.as_bytes();
	let mut depth = 1usize;
	let mut i = from;
	while i < bytes.len() {
		let lt = i + document[i..].find('<')?;
		if let Some(resume) = opaque_end(document, lt) {
			i = resume;
			continue;
		}

		let rest = &document[lt..];
		if let Some(after) = rest.strip_prefix("</").and_then(|r| r.strip_prefix(name)) {
			let trimmed = after.trim_start();
			if trimmed.starts_with('>') {
				let gt = document.len() - trimmed.len();
				depth -= 1;
				if depth == 0 {
					return Some((lt, gt + 1));
				}
				i = gt + 1;
				continue;
			}
		} else if let Some(after) = rest.strip_prefix('<').and_then(|r| r.strip_prefix(name))
			&& is_tag_boundary(after.bytes().next())
		{
			let name_end = lt + 1 + name.len();
			if let Some(gt) = tag_end(document, name_end) {
				if !document[name_end..gt].trim_end().ends_with('/') {
					depth += 1;
				}
				i = gt + 1;
				continue;
			}
		}
		i = lt + 1;
	}
	None
}

/// If `lt` starts a comment or a raw-text element, the offset to resume
/// scanning from.
pub(crate) fn opaque_end(document: &str, lt: usize) -> Option<usize> {
	let rest = &document[lt..];
	if rest.starts_with("<!--") {
		return Some(match rest[4..].find("-->") {
			Some(end) => lt + 4 + end + 3,
			None => document.len(),
		});
	}

	for element in ["script", "style"] {
		let Some(after) = rest[1..].strip_prefix(element) else {
			continue;
		};
		if !is_tag_boundary(after.bytes().next()) {
			continue;
		}
		let content_start = match tag_end(document, lt + 1 + element.len()) {
			Some(gt) => gt + 1,
			None => return Some(document.len()),
		};
		let closing = format!("</{}", element);
		return Some(match find_ci(document, &closing, content_start) {
			Some(close) => close,
			None => document.len(),
		});
	}
	None
}

/// Offset of the `>` ending a tag whose attributes start at `from`.
///
/// `>` inside quotes or `{…}` does not end the tag.
pub(crate) fn tag_end(document: &str, from: usize) -> Option<usize> {
	let mut quote = None;
	let mut braces = 0usize;
	for (offset, byte) in document.as_bytes()[from..].iter().enumerate() {
		match (quote, byte) {
			(Some(q), b) if *b == q => quote = None,
			(Some(_), _) => {}
			(None, b'"' | b'\'') => quote = Some(*byte),
			(None, b'{') => braces += 1,
			(None, b'}') => braces = braces.saturating_sub(1),
			(None, b'>') if braces == 0 => return Some(from + offset),
			_ => {}
		}
	}
	None
}

/// Case-insensitive ASCII search for `needle` at or after `from`.
pub(crate) fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
	let hay = haystack.as_bytes();
	let needle = needle.as_bytes();
	if needle.is_empty() || hay.len() < needle.len() {
		return None;
	}
	(from..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

fn name_end(bytes: &[u8], from: usize) -> usize {
	bytes[from..]
		.iter()
		.position(|b| !b.is_ascii_alphanumeric())
		.map_or(bytes.len(), |p| from + p)
}

pub(crate) fn is_tag_boundary(byte: Option<u8>) -> bool {
	matches!(byte, Some(b' ' | b'\t' | b'\n' | b'\r' | b'\x0c' | b'/' | b'>'))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_self_closing() {
		let doc = r#"<div><Icon name="star" /></div>"#;
		let tag = find_component_tag(doc, 0).unwrap();
		assert_eq!(tag.name, "Icon");
		assert_eq!(tag.attributes, r#"name="star""#);
		assert_eq!(tag.kind, TagKind::SelfClosing);
		assert_eq!(tag.opening(doc), r#"<Icon name="star" />"#);
		assert_eq!(tag.children, None);
	}

	#[rstest]
	fn test_paired_with_attributes() {
		let doc = r#"<Button size="large" color="primary">Go</Button>"#;
		let tag = find_component_tag(doc, 0).unwrap();
		assert_eq!(tag.kind, TagKind::Paired);
		assert_eq!(tag.attributes, r#"size="large" color="primary""#);
		assert_eq!(tag.children, Some("Go"));
		assert_eq!((tag.start, tag.end), (0, doc.len()));
	}

	#[rstest]
	fn test_same_name_nesting() {
		let doc = "<Box><Box>a</Box><Box/></Box>tail";
		let tag = find_component_tag(doc, 0).unwrap();
		assert_eq!(tag.children, Some("<Box>a</Box><Box/>"));
		assert_eq!(&doc[tag.end..], "tail");
	}

	#[rstest]
	fn test_different_names_do_not_affect_depth() {
		let doc = "<Card><Box>x</Box></Card>";
		let tag = find_component_tag(doc, 0).unwrap();
		assert_eq!(tag.name, "Card");
		assert_eq!(tag.children, Some("<Box>x</Box>"));
	}

	#[rstest]
	fn test_unmatched_opening_tag() {
		let doc = "<Panel>never closed";
		let tag = find_component_tag(doc, 0).unwrap();
		assert_eq!(tag.kind, TagKind::Unmatched);
		assert_eq!(tag.end, "<Panel>".len());
		assert_eq!(tag.children, None);
	}

	#[rstest]
	fn test_closing_tag_allows_trailing_whitespace() {
		let doc = "<Box>a</Box  >";
		let tag = find_component_tag(doc, 0).unwrap();
		assert_eq!(tag.children, Some("a"));
		assert_eq!(tag.end, doc.len());
	}

	#[rstest]
	#[case("<div><p>plain</p></div>")]
	#[case("<!-- <Button /> -->")]
	#[case("<script>let x = '<Button />';</script>")]
	#[case("<style>/* <Card> */</style>")]
	#[case("<Buttons-list>")]
	#[case("<Button")]
	#[case("a < B and C > d")]
	fn test_no_component_tags(#[case] doc: &str) {
		assert!(find_component_tag(doc, 0).is_none(), "doc: {}", doc);
	}

	#[rstest]
	fn test_gt_inside_attribute_values() {
		let doc = r#"<Chart data={"op": ">"} label="a > b">x</Chart>"#;
		let tag = find_component_tag(doc, 0).unwrap();
		assert_eq!(tag.attributes, r#"data={"op": ">"} label="a > b""#);
		assert_eq!(tag.children, Some("x"));
	}

	#[rstest]
	fn test_closing_tag_inside_comment_is_ignored() {
		let doc = "<Box><!-- </Box> -->a</Box>";
		let tag = find_component_tag(doc, 0).unwrap();
		assert_eq!(tag.children, Some("<!-- </Box> -->a"));
	}

	#[rstest]
	fn test_component_tags_are_top_level() {
		let doc = "<Ab>1<Bc/></Ab> <Cd/> <De>";
		let names: Vec<_> = component_tags(doc).map(|t| t.name).collect();
		assert_eq!(names, vec!["Ab", "Cd", "De"]);
	}

	#[rstest]
	fn test_opening_tags_include_nested() {
		let doc = "<Ab>1<Bc/><Ab>2</Ab></Ab><Cd></Cd>";
		let names: Vec<_> = opening_tags(doc).map(|t| t.name).collect();
		assert_eq!(names, vec!["Ab", "Bc", "Ab", "Cd"]);
	}

	#[rstest]
	fn test_find_from_offset() {
		let doc = "<Ab/><Bc/>";
		let tag = find_component_tag(doc, 1).unwrap();
		assert_eq!(tag.name, "Bc");
		assert_eq!(tag.start, 5);
	}

	#[rstest]
	fn test_multibyte_text_around_tags() {
		let doc = "héllo <Badge label=\"ü\" /> wörld";
		let tag = find_component_tag(doc, 0).unwrap();
		assert_eq!(tag.opening(doc), "<Badge label=\"ü\" />");
	}

	#[rstest]
	#[case("abcSCRIPT", "script", 0, Some(3))]
	#[case("abc", "script", 0, None)]
	#[case("</Style></style>", "</style", 1, Some(8))]
	fn test_find_ci(
		#[case] hay: &str,
		#[case] needle: &str,
		#[case] from: usize,
		#[case] expected: Option<usize>,
	) {
		assert_eq!(find_ci(hay, needle, from), expected);
	}

	#[rstest]
	fn test_html_element_list_is_sorted() {
		assert!(HTML_ELEMENTS.windows(2).all(|pair| pair[0] < pair[1]));
	}

	#[rstest]
	#[case("HTML", true)]
	#[case("P", true)]
	#[case("H1", true)]
	#[case("Table", false)]
	#[case("Card", false)]
	fn test_is_html_element(#[case] name: &str, #[case] expected: bool) {
		assert_eq!(is_html_element(name), expected);
	}

	#[rstest]
	fn test_upper_case_html_is_not_a_component() {
		let doc = "<HTML><HEAD></HEAD><BODY><P>x</P><Table rows=\"2\" /></BODY></HTML>";
		let tags: Vec<_> = component_tags(doc).collect();
		assert_eq!(tags.len(), 1);
		assert_eq!(tags[0].name, "Table");
	}
}
