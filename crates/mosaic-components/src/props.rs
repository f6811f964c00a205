//! Property maps passed to render functions

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Reserved key holding the inner markup of a paired tag.
pub const CHILDREN: &str = "children";

/// A single property value.
///
/// Serializes untagged, so a template sees strings as strings, objects as
/// nested maps, and bare attributes as `true`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropValue {
	/// Quoted or unquoted literal
	String(String),
	/// Bare attribute (always `true` when produced by the attribute parser)
	Bool(bool),
	/// Decoded `{…}` value
	Object(Map<String, Value>),
}

impl PropValue {
	/// Returns the string value, if this is a string.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the boolean value, if this is a boolean.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Returns the decoded object, if this is an object.
	pub fn as_object(&self) -> Option<&Map<String, Value>> {
		match self {
			Self::Object(map) => Some(map),
			_ => None,
		}
	}

	/// Converts the value into a JSON value.
	pub fn to_json(&self) -> Value {
		match self {
			Self::String(s) => Value::String(s.clone()),
			Self::Bool(b) => Value::Bool(*b),
			Self::Object(map) => Value::Object(map.clone()),
		}
	}
}

impl fmt::Display for PropValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::String(s) => f.write_str(s),
			Self::Bool(b) => write!(f, "{}", b),
			Self::Object(map) => write!(f, "{}", Value::Object(map.clone())),
		}
	}
}

impl From<&str> for PropValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for PropValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<bool> for PropValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<Map<String, Value>> for PropValue {
	fn from(value: Map<String, Value>) -> Self {
		Self::Object(value)
	}
}

/// Insertion-ordered property map.
///
/// Inserting an existing key replaces its value but keeps its original
/// position, so the last occurrence of a repeated attribute wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Props(IndexMap<String, PropValue>);

impl Props {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a value, returning the one it replaced.
	///
	/// # Examples
	///
	/// ```
	/// use mosaic_components::{PropValue, Props};
	///
	/// let mut props = Props::new();
	/// props.insert("size", "small");
	/// props.insert("size", "large");
	/// assert_eq!(props.get_str("size"), Some("large"));
	/// assert_eq!(props.len(), 1);
	/// ```
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Option<PropValue> {
		self.0.insert(key.into(), value.into())
	}

	pub fn get(&self, key: &str) -> Option<&PropValue> {
		self.0.get(key)
	}

	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.get(key).and_then(PropValue::as_str)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	pub fn remove(&mut self, key: &str) -> Option<PropValue> {
		self.0.shift_remove(key)
	}

	/// Inner markup of the tag, if it had a closing tag.
	pub fn children(&self) -> Option<&str> {
		self.get_str(CHILDREN)
	}

	pub fn set_children(&mut self, children: impl Into<String>) {
		self.insert(CHILDREN, PropValue::String(children.into()));
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// The map as a JSON object.
	pub fn to_json(&self) -> Value {
		Value::Object(
			self.0
				.iter()
				.map(|(k, v)| (k.clone(), v.to_json()))
				.collect(),
		)
	}
}

impl<K, V> FromIterator<(K, V)> for Props
where
	K: Into<String>,
	V: Into<PropValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut props = Props::new();
		for (k, v) in iter {
			props.insert(k, v);
		}
		props
	}
}
