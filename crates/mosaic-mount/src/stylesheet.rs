//! Aggregated style sheet

use indexmap::IndexMap;
use mosaic_components::ComponentName;
use serde::Serialize;

/// Component styles collected in one pass, each component at most once, in
/// first-discovered order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StyleSheet {
	entries: IndexMap<ComponentName, String>,
}

impl StyleSheet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds styles for `name` unless it already has an entry or the text is
	/// blank. Returns true if the entry was added.
	pub fn insert(&mut self, name: ComponentName, styles: impl Into<String>) -> bool {
		let styles = styles.into();
		if styles.trim().is_empty() || self.entries.contains_key(&name) {
			return false;
		}
		self.entries.insert(name, styles);
		true
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.entries.get(name).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Component names in collection order.
	pub fn names(&self) -> impl Iterator<Item = &ComponentName> {
		self.entries.keys()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&ComponentName, &str)> {
		self.entries.iter().map(|(k, v)| (k, v.as_str()))
	}

	/// Appends the entries of `other` that are not present yet.
	pub fn merge(&mut self, other: StyleSheet) {
		for (name, styles) in other.entries {
			self.insert(name, styles);
		}
	}

	/// Concatenated CSS, one trimmed entry per line.
	///
	/// # Examples
	///
	/// ```
	/// use mosaic_components::ComponentName;
	/// use mosaic_mount::StyleSheet;
	///
	/// let mut sheet = StyleSheet::new();
	/// sheet.insert(ComponentName::new("Card").unwrap(), ".card{}\n");
	/// sheet.insert(ComponentName::new("Button").unwrap(), ".btn{}");
	/// sheet.insert(ComponentName::new("Card").unwrap(), ".ignored{}");
	/// assert_eq!(sheet.to_css(), ".card{}\n.btn{}");
	/// ```
	pub fn to_css(&self) -> String {
		self.entries
			.values()
			.map(|styles| styles.trim())
			.collect::<Vec<_>>()
			.join("\n")
	}
}
