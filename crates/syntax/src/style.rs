//! Style rules and the category-hierarchy resolver.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::ancestors;

/// 24-bit foreground color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {input:?}: expected #RRGGBB or #RGB")]
pub struct ColorParseError {
	input: String,
}

impl FromStr for Color {
	type Err = ColorParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let err = || ColorParseError { input: s.to_string() };
		let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
		if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
			return Err(err());
		}
		let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| err());
		match hex.len() {
			6 => Ok(Self::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
			3 => {
				let short = |idx: usize| channel(&hex[idx..idx + 1]).map(|v| v * 17);
				Ok(Self::rgb(short(0)?, short(1)?, short(2)?))
			}
			_ => Err(err()),
		}
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
	}
}

/// Visual attributes applied to a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
	pub foreground: Color,
	pub bold: bool,
	pub italic: bool,
}

impl Style {
	pub const fn fg(foreground: Color) -> Self {
		Self {
			foreground,
			bold: false,
			italic: false,
		}
	}

	pub const fn bold(mut self) -> Self {
		self.bold = true;
		self
	}

	pub const fn italic(mut self) -> Self {
		self.italic = true;
		self
	}
}

/// One entry of a [`StyleTable`], keyed by its exact category path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
	pub category: Box<str>,
	pub foreground: Color,
	pub bold: bool,
	pub italic: bool,
}

impl StyleRule {
	pub fn style(&self) -> Style {
		Style {
			foreground: self.foreground,
			bold: self.bold,
			italic: self.italic,
		}
	}
}

/// Fixed mapping from exact category paths to style rules.
///
/// Keys never contain wildcards.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
	rules: FxHashMap<Box<str>, StyleRule>,
}

impl StyleTable {
	/// Creates an empty table; every lookup resolves to `None`.
	pub fn new() -> Self {
		Self::default()
	}

	/// Monokai-inspired dark palette used when no theme is configured.
	///
	/// `constructor` is the grammar's capture for capitalized names, which
	/// covers class names.
	pub fn monokai() -> Self {
		let pink = Color::rgb(0xF9, 0x26, 0x72);
		let green = Color::rgb(0xA6, 0xE2, 0x2E);
		let purple = Color::rgb(0xAE, 0x81, 0xFF);
		Self::new()
			.with_rule("keyword", Style::fg(pink))
			.with_rule("function", Style::fg(green))
			.with_rule("constructor", Style::fg(green).bold())
			.with_rule("string", Style::fg(Color::rgb(0xE6, 0xDB, 0x74)))
			.with_rule("comment", Style::fg(Color::rgb(0x75, 0x71, 0x5E)).italic())
			.with_rule("operator", Style::fg(pink))
			.with_rule("number", Style::fg(purple))
			.with_rule("constant.builtin", Style::fg(purple))
			.with_rule("function.builtin", Style::fg(Color::rgb(0x66, 0xD9, 0xEF)).italic())
	}

	/// Builder form of [`insert`](Self::insert).
	pub fn with_rule(mut self, category: &str, style: Style) -> Self {
		self.insert(category, style);
		self
	}

	/// Inserts or replaces the rule for `category`. Returns the replaced rule.
	pub fn insert(&mut self, category: &str, style: Style) -> Option<StyleRule> {
		let key: Box<str> = category.into();
		let rule = StyleRule {
			category: key.clone(),
			foreground: style.foreground,
			bold: style.bold,
			italic: style.italic,
		};
		let replaced = self.rules.insert(key, rule);
		if let Some(old) = &replaced {
			tracing::debug!(category = %old.category, "syntax.style.override");
		}
		replaced
	}

	/// Resolves `category` to the rule of its most specific styled ancestor.
	///
	/// The walk visits at most one key per path label.
	pub fn resolve(&self, category: &str) -> Option<&StyleRule> {
		ancestors(category).find_map(|path| self.rules.get(path))
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}
}
