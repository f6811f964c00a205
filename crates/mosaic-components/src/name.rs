//! Component names

use crate::error::{ComponentError, Result};
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Name of a component type.
///
/// Always matches `[A-Z][A-Za-z0-9]*`. Names compare case-sensitively as map
/// keys; [`ComponentName::matches`] gives the case-insensitive comparison used
/// when mapping names back to source files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ComponentName(String);

impl ComponentName {
	/// Validates and wraps a name.
	///
	/// # Examples
	///
	/// ```
	/// use mosaic_components::ComponentName;
	///
	/// assert!(ComponentName::new("Button").is_ok());
	/// assert!(ComponentName::new("button").is_err());
	/// assert!(ComponentName::new("Nav-Bar").is_err());
	/// ```
	pub fn new(name: impl Into<String>) -> Result<Self> {
		let name = name.into();
		if Self::is_valid(&name) {
			Ok(Self(name))
		} else {
			Err(ComponentError::InvalidName(name))
		}
	}

	/// Returns true if `name` matches `[A-Z][A-Za-z0-9]*`.
	pub fn is_valid(name: &str) -> bool {
		let mut chars = name.chars();
		match chars.next() {
			Some(first) if first.is_ascii_uppercase() => chars.all(|c| c.is_ascii_alphanumeric()),
			_ => false,
		}
	}

	/// Derives a name from a file stem by upper-casing its first character.
	///
	/// # Examples
	///
	/// ```
	/// use mosaic_components::ComponentName;
	///
	/// let name = ComponentName::from_stem("navBar").unwrap();
	/// assert_eq!(name.as_str(), "NavBar");
	/// ```
	pub fn from_stem(stem: &str) -> Result<Self> {
		let mut chars = stem.chars();
		let capitalized = match chars.next() {
			Some(first) => {
				let mut out = String::with_capacity(stem.len());
				out.push(first.to_ascii_uppercase());
				out.push_str(chars.as_str());
				out
			}
			None => String::new(),
		};
		Self::new(capitalized)
	}

	/// Derives a name from a source file path (`cards/card.component` → `Card`).
	pub fn from_path(path: &Path) -> Result<Self> {
		let stem = path
			.file_stem()
			.and_then(|s| s.to_str())
			.ok_or_else(|| ComponentError::InvalidName(path.display().to_string()))?;
		Self::from_stem(stem)
	}

	/// The name as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Lower-cased file stem this name is looked up under.
	pub fn file_stem(&self) -> String {
		self.0.to_ascii_lowercase()
	}

	/// Case-insensitive comparison.
	pub fn matches(&self, other: &str) -> bool {
		self.0.eq_ignore_ascii_case(other)
	}
}

impl fmt::Display for ComponentName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for ComponentName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for ComponentName {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl FromStr for ComponentName {
	type Err = ComponentError;

	fn from_str(s: &str) -> Result<Self> {
		Self::new(s)
	}
}

impl TryFrom<&str> for ComponentName {
	type Error = ComponentError;

	fn try_from(value: &str) -> Result<Self> {
		Self::new(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::path::PathBuf;

	#[rstest]
	#[case("Button", true)]
	#[case("B", true)]
	#[case("Card2", true)]
	#[case("NavBar", true)]
	#[case("button", false)]
	#[case("", false)]
	#[case("2Card", false)]
	#[case("Nav_Bar", false)]
	#[case("Über", false)]
	fn test_is_valid(#[case] name: &str, #[case] expected: bool) {
		assert_eq!(ComponentName::is_valid(name), expected);
	}

	#[rstest]
	#[case("button", "Button")]
	#[case("Button", "Button")]
	#[case("navBar", "NavBar")]
	fn test_from_stem(#[case] stem: &str, #[case] expected: &str) {
		assert_eq!(ComponentName::from_stem(stem).unwrap().as_str(), expected);
	}

	#[rstest]
	fn test_from_stem_rejects_kebab_case() {
		assert!(matches!(
			ComponentName::from_stem("nav-bar"),
			Err(ComponentError::InvalidName(_))
		));
	}

	#[rstest]
	fn test_from_path_strips_directories_and_extension() {
		let path = PathBuf::from("components/layout/card.component");
		assert_eq!(ComponentName::from_path(&path).unwrap().as_str(), "Card");
	}

	#[rstest]
	fn test_matches_is_case_insensitive() {
		let name = ComponentName::new("NavBar").unwrap();
		assert!(name.matches("navbar"));
		assert!(name.matches("NAVBAR"));
		assert!(!name.matches("Nav"));
		assert_eq!(name.file_stem(), "navbar");
	}
}
