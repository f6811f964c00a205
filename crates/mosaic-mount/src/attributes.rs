//! Attribute parser
//!
//! Converts the raw attribute text of a component tag into [`Props`].
//! Accepted forms:
//!
//! | Form | Value |
//! |---|---|
//! | `name` | `true` |
//! | `name="value"`, `name='value'` | string |
//! | `name=value` | string, up to the next whitespace |
//! | `name={"k": 1}` | JSON object |
//!
//! HTML character references in string values are decoded, so
//! `title="Tom &amp; Jerry"` becomes `Tom & Jerry` and is escaped again when
//! a template prints it.
//!
//! An unterminated quote or brace consumes the rest of the input. Quoted or
//! braced text that does not follow `name=` is skipped.

use mosaic_components::{PropValue, Props};
use serde_json::Value;

/// A `{…}` value that was kept as a literal string because it did not
/// decode as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFallback {
	/// Attribute name.
	pub attribute: String,
	/// Text between the braces, trimmed. This is the stored value.
	pub raw: String,
	/// Decoder message.
	pub message: String,
}

/// Parses attribute text, discarding fallback details.
///
/// # Examples
///
/// ```
/// use mosaic_mount::parse_attributes;
///
/// let props = parse_attributes(r#"size="large" disabled data={"id": 7}"#);
/// assert_eq!(props.get_str("size"), Some("large"));
/// assert_eq!(props.get("disabled").and_then(|v| v.as_bool()), Some(true));
/// assert_eq!(props.get("data").and_then(|v| v.as_object()).map(|o| o["id"] == 7), Some(true));
/// ```
pub fn parse_attributes(raw: &str) -> Props {
	parse_attributes_with_diagnostics(raw).0
}

/// Parses attribute text, also returning every `{…}` value that fell back
/// to a literal string.
pub fn parse_attributes_with_diagnostics(raw: &str) -> (Props, Vec<AttributeFallback>) {
	let bytes = raw.as_bytes();
	let mut props = Props::new();
	let mut fallbacks = Vec::new();
	let mut i = 0;

	while i < bytes.len() {
		match bytes[i] {
			quote @ (b'"' | b'\'') => {
				i = raw[i + 1..].find(quote as char).map_or(raw.len(), |p| i + p + 2);
				continue;
			}
			b'{' => {
				i = matching_brace(bytes, i).map_or(raw.len(), |e| e + 1);
				continue;
			}
			byte if !is_name_start(byte) => {
				i += 1;
				continue;
			}
			_ => {}
		}

		let name_start = i;
		while i < bytes.len() && is_name_char(bytes[i]) {
			i += 1;
		}
		let name = &raw[name_start..i];

		let eq = skip_whitespace(bytes, i);
		if bytes.get(eq) != Some(&b'=') {
			props.insert(name, true);
			continue;
		}

		let value_start = skip_whitespace(bytes, eq + 1);
		let Some(&first) = bytes.get(value_start) else {
			props.insert(name, "");
			i = value_start;
			continue;
		};

		match first {
			b'"' | b'\'' => {
				let content = value_start + 1;
				let end = raw[content..]
					.find(first as char)
					.map_or(raw.len(), |p| content + p);
				props.insert(name, decode_entities(&raw[content..end]));
				i = (end + 1).min(raw.len());
			}
			b'{' => {
				let end = matching_brace(bytes, value_start);
				let inner = raw[value_start + 1..end.unwrap_or(raw.len())].trim();
				match decode_object(inner) {
					Ok(object) => {
						props.insert(name, object);
					}
					Err(message) => {
						fallbacks.push(AttributeFallback {
							attribute: name.to_string(),
							raw: inner.to_string(),
							message,
						});
						props.insert(name, inner);
					}
				}
				i = end.map_or(raw.len(), |e| e + 1);
			}
			_ => {
				let end = bytes[value_start..]
					.iter()
					.position(u8::is_ascii_whitespace)
					.map_or(raw.len(), |p| value_start + p);
				props.insert(name, decode_entities(&raw[value_start..end]));
				i = end;
			}
		}
	}

	(props, fallbacks)
}

fn is_name_start(byte: u8) -> bool {
	byte.is_ascii_alphabetic() || matches!(byte, b'_' | b':' | b'@')
}

fn is_name_char(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b':' | b'.' | b'-' | b'@')
}

fn skip_whitespace(bytes: &[u8], from: usize) -> usize {
	bytes[from.min(bytes.len())..]
		.iter()
		.position(|b| !b.is_ascii_whitespace())
		.map_or(bytes.len(), |p| from + p)
}

/// Offset of the `}` closing the brace at `open`, skipping quoted strings.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
	let mut depth = 0usize;
	let mut quote = None;
	let mut escaped = false;
	for (i, &byte) in bytes.iter().enumerate().skip(open) {
		if let Some(q) = quote {
			if escaped {
				escaped = false;
			} else if byte == b'\\' {
				escaped = true;
			} else if byte == q {
				quote = None;
			}
			continue;
		}
		match byte {
			b'"' | b'\'' => quote = Some(byte),
			b'{' => depth += 1,
			b'}' => {
				depth -= 1;
				if depth == 0 {
					return Some(i);
				}
			}
			_ => {}
		}
	}
	None
}

fn decode_object(inner: &str) -> Result<PropValue, String> {
	match serde_json::from_str::<Value>(&format!("{{{}}}", inner)) {
		Ok(Value::Object(map)) => Ok(PropValue::Object(map)),
		Ok(other) => Err(format!("expected an object, found {}", other)),
		Err(err) => Err(err.to_string()),
	}
}

fn decode_entities(value: &str) -> String {
	html_escape::decode_html_entities(value).into_owned()
}
