//! Component source file grammar
//!
//! A component source file declares exactly one export assigned to an object
//! literal with a required `render` field and an optional `styles` field:
//!
//! ```text
//! // card.component
//! export Card = {
//!     render: `<div class="card">{{ children | safe }}</div>`,
//!     styles: `.card { border: 1px solid #ddd; }`,
//! };
//! ```
//!
//! Field values are string literals: backtick strings may span lines and only
//! recognise the `` \` `` and `\\` escapes; single- and double-quoted strings
//! recognise `\n`, `\t`, `\r`, `\\`, `\"` and `\'`. Line (`//`) and block
//! (`/* */`) comments may appear between tokens. Nothing in the file is
//! executed: `render` is handed to the template compiler as-is.

use thiserror::Error;

/// Parsed contents of a component source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSource {
	/// Declared export name, exactly as written.
	pub name: String,
	/// Render template text.
	pub render: String,
	/// Style sheet text.
	pub styles: Option<String>,
}

/// Syntax error in a component source file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {message}")]
pub struct SourceError {
	/// 1-based line.
	pub line: usize,
	/// 1-based column.
	pub column: usize,
	/// What went wrong.
	pub message: String,
}

/// Parses a component source file.
///
/// # Examples
///
/// ```
/// use mosaic_components::parse_source;
///
/// let source = parse_source(r#"export Badge = { render: "<span>{{ label }}</span>" }"#).unwrap();
/// assert_eq!(source.name, "Badge");
/// assert_eq!(source.render, "<span>{{ label }}</span>");
/// assert!(source.styles.is_none());
/// ```
pub fn parse_source(input: &str) -> Result<ComponentSource, SourceError> {
	SourceParser::new(input).parse()
}

struct SourceParser {
	input: Vec<char>,
	pos: usize,
	line: usize,
	column: usize,
}

impl SourceParser {
	fn new(input: &str) -> Self {
		Self {
			input: input.chars().collect(),
			pos: 0,
			line: 1,
			column: 1,
		}
	}

	fn parse(mut self) -> Result<ComponentSource, SourceError> {
		self.skip_trivia()?;
		let mut name = self.identifier()?;
		if name == "export" {
			self.skip_trivia()?;
			name = self.identifier()?;
		}

		self.skip_trivia()?;
		self.expect('=')?;
		self.skip_trivia()?;
		self.expect('{')?;

		let mut render = None;
		let mut styles = None;

		loop {
			self.skip_trivia()?;
			if self.peek() == Some('}') {
				self.bump();
				break;
			}

			let (line, column) = (self.line, self.column);
			let key = self.identifier()?;
			self.skip_trivia()?;
			self.expect(':')?;
			self.skip_trivia()?;
			let value = self.string()?;

			let slot = match key.as_str() {
				"render" => &mut render,
				"styles" => &mut styles,
				other => {
					return Err(SourceError {
						line,
						column,
						message: format!("unknown field `{}`", other),
					});
				}
			};
			if slot.is_some() {
				return Err(SourceError {
					line,
					column,
					message: format!("duplicate field `{}`", key),
				});
			}
			*slot = Some(value);

			self.skip_trivia()?;
			match self.peek() {
				Some(',') => {
					self.bump();
				}
				Some('}') => {}
				_ => return Err(self.error("expected `,` or `}` after field value")),
			}
		}

		self.skip_trivia()?;
		if self.peek() == Some(';') {
			self.bump();
			self.skip_trivia()?;
		}
		if self.peek().is_some() {
			return Err(self.error("unexpected content after component definition"));
		}

		let render = render.ok_or_else(|| self.error("missing required field `render`"))?;

		Ok(ComponentSource {
			name,
			render,
			styles,
		})
	}

	fn peek(&self) -> Option<char> {
		self.input.get(self.pos).copied()
	}

	fn peek_next(&self) -> Option<char> {
		self.input.get(self.pos + 1).copied()
	}

	fn bump(&mut self) -> Option<char> {
		let c = self.peek()?;
		self.pos += 1;
		if c == '\n' {
			self.line += 1;
			self.column = 1;
		} else {
			self.column += 1;
		}
		Some(c)
	}

	fn error(&self, message: impl Into<String>) -> SourceError {
		SourceError {
			line: self.line,
			column: self.column,
			message: message.into(),
		}
	}

	fn expect(&mut self, expected: char) -> Result<(), SourceError> {
		match self.peek() {
			Some(c) if c == expected => {
				self.bump();
				Ok(())
			}
			Some(c) => Err(self.error(format!("expected `{}`, found `{}`", expected, c))),
			None => Err(self.error(format!("expected `{}`, found end of file", expected))),
		}
	}

	/// Skips whitespace and comments.
	fn skip_trivia(&mut self) -> Result<(), SourceError> {
		loop {
			match (self.peek(), self.peek_next()) {
				(Some(c), _) if c.is_whitespace() => {
					self.bump();
				}
				(Some('/'), Some('/')) => {
					while let Some(c) = self.bump() {
						if c == '\n' {
							break;
						}
					}
				}
				(Some('/'), Some('*')) => {
					let start = self.error("unterminated block comment");
					self.bump();
					self.bump();
					loop {
						match (self.peek(), self.peek_next()) {
							(Some('*'), Some('/')) => {
								self.bump();
								self.bump();
								break;
							}
							(Some(_), _) => {
								self.bump();
							}
							(None, _) => return Err(start),
						}
					}
				}
				_ => return Ok(()),
			}
		}
	}

	fn identifier(&mut self) -> Result<String, SourceError> {
		let mut ident = String::new();
		match self.peek() {
			Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
			Some(c) => return Err(self.error(format!("expected identifier, found `{}`", c))),
			None => return Err(self.error("expected identifier, found end of file")),
		}
		while let Some(c) = self.peek() {
			if c.is_ascii_alphanumeric() || c == '_' {
				ident.push(c);
				self.bump();
			} else {
				break;
			}
		}
		Ok(ident)
	}

	fn string(&mut self) -> Result<String, SourceError> {
		let quote = match self.peek() {
			Some(q @ ('`' | '"' | '\'')) => q,
			Some(c) => return Err(self.error(format!("expected string literal, found `{}`", c))),
			None => return Err(self.error("expected string literal, found end of file")),
		};
		let start = self.error("unterminated string literal");
		self.bump();

		let mut value = String::new();
		loop {
			let c = self.bump().ok_or_else(|| start.clone())?;
			if c == quote {
				return Ok(value);
			}
			match c {
				'\\' => {
					let escaped = self.bump().ok_or_else(|| start.clone())?;
					if quote == '`' {
						match escaped {
							'`' | '\\' => value.push(escaped),
							other => {
								value.push('\\');
								value.push(other);
							}
						}
					} else {
						match escaped {
							'n' => value.push('\n'),
							't' => value.push('\t'),
							'r' => value.push('\r'),
							'\\' | '"' | '\'' => value.push(escaped),
							other => {
								return Err(self.error(format!("unknown escape `\\{}`", other)));
							}
						}
					}
				}
				'\n' if quote != '`' => return Err(self.error("newline in quoted string; use a backtick string")),
				_ => value.push(c),
			}
		}
	}
}
