//! Theme section: style rules layered over a base table.

use std::collections::BTreeMap;

use lantern_syntax::{Color, Style, StyleTable};
use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Base table the configured rules are layered over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeBase {
	#[default]
	Monokai,
	/// Start from an empty table; only configured rules apply.
	None,
}

/// One configured rule: either a bare color or a table with modifiers.
///
/// ```toml
/// [theme.rules]
/// "keyword" = "#ff0000"
/// "comment" = { fg = "#888888", italic = true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuleConfig {
	Color(String),
	Full {
		fg: String,
		#[serde(default)]
		bold: bool,
		#[serde(default)]
		italic: bool,
	},
}

impl RuleConfig {
	fn to_style(&self, category: &str) -> Result<Style> {
		let (fg, bold, italic) = match self {
			Self::Color(fg) => (fg, false, false),
			Self::Full { fg, bold, italic } => (fg, *bold, *italic),
		};
		let color: Color = fg.parse().map_err(|source| ConfigError::InvalidColor {
			category: category.to_string(),
			source,
		})?;
		let mut style = Style::fg(color);
		if bold {
			style = style.bold();
		}
		if italic {
			style = style.italic();
		}
		Ok(style)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
	pub base: ThemeBase,
	/// Keyed by capture name, such as `keyword` or `function.builtin`.
	pub rules: BTreeMap<String, RuleConfig>,
}

impl ThemeConfig {
	/// Builds the style table: base rules, then configured rules replacing
	/// same-category entries.
	pub fn style_table(&self) -> Result<StyleTable> {
		let mut table = match self.base {
			ThemeBase::Monokai => StyleTable::monokai(),
			ThemeBase::None => StyleTable::new(),
		};
		for (category, rule) in &self.rules {
			table.insert(category, rule.to_style(category)?);
		}
		Ok(table)
	}
}
