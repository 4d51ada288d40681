//! Lexical classification.
//!
//! Python text is parsed with tree-sitter and labelled with the grammar's
//! highlight captures (`keyword`, `string`, `function.builtin`, ...). The
//! capture name is the token's category path. Every byte of the input lands in
//! exactly one token, so the concatenation of all lexemes is the input.

mod grammar;

use std::path::Path;

use crate::Category;

/// Lexer selected for a text unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
	#[default]
	Python,
	/// Emits the whole input as a single [`Category::TEXT`] token.
	PlainText,
}

impl Language {
	/// Chooses a lexer from a file extension (without the leading dot).
	pub fn from_extension(ext: &str) -> Self {
		if ["py", "pyw", "pyi"].iter().any(|candidate| ext.eq_ignore_ascii_case(candidate)) {
			Self::Python
		} else {
			Self::PlainText
		}
	}

	/// Chooses a lexer from a path's extension.
	pub fn for_path(path: &Path) -> Self {
		path.extension().and_then(|ext| ext.to_str()).map_or(Self::PlainText, Self::from_extension)
	}

	pub const fn name(self) -> &'static str {
		match self {
			Self::Python => "python",
			Self::PlainText => "text",
		}
	}
}

/// One classified slice of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
	pub category: Category,
	pub lexeme: &'a str,
}

/// Token stream over one text unit.
///
/// The text is parsed when the stream is created; lexemes are sliced as the
/// iterator advances. Cloning restarts from the clone's position.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
	text: &'a str,
	segments: std::vec::IntoIter<grammar::Segment>,
}

/// Classifies `text` with the given lexer. Never fails: text the grammar
/// rejects is labelled [`Category::ERROR`].
pub fn classify(language: Language, text: &str) -> Tokens<'_> {
	let segments = match language {
		Language::Python if !text.is_empty() => grammar::python(text),
		Language::Python | Language::PlainText => grammar::whole(text),
	};
	Tokens {
		text,
		segments: segments.into_iter(),
	}
}

impl<'a> Iterator for Tokens<'a> {
	type Item = Token<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		let segment = self.segments.next()?;
		Some(Token {
			category: segment.category,
			lexeme: &self.text[segment.start..segment.end],
		})
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.segments.size_hint()
	}
}
