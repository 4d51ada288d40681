//! Per-block highlight pipeline.

use std::sync::Arc;

use crate::{Language, Style, StyleTable, classify};

/// Styled byte range of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSpan {
	/// Byte offset from the start of the block.
	pub offset: usize,
	/// Length in bytes.
	pub len: usize,
	pub style: Style,
}

impl StyleSpan {
	pub fn end(&self) -> usize {
		self.offset + self.len
	}
}

/// Classifies `block` and returns spans for every token with a resolved style.
pub fn highlight(block: &str, language: Language, table: &StyleTable) -> Vec<StyleSpan> {
	let mut spans = Vec::new();
	highlight_into(block, language, table, &mut spans);
	spans
}

/// Like [`highlight`], but replaces the contents of `spans`, reusing its
/// allocation.
///
/// Unstyled tokens emit nothing yet still advance the offset, so spans never
/// overlap and always line up with token boundaries.
pub fn highlight_into(block: &str, language: Language, table: &StyleTable, spans: &mut Vec<StyleSpan>) {
	spans.clear();
	let mut offset = 0;
	for token in classify(language, block) {
		let len = token.lexeme.len();
		if let Some(rule) = table.resolve(token.category.as_str()) {
			spans.push(StyleSpan {
				offset,
				len,
				style: rule.style(),
			});
		}
		offset += len;
	}
	debug_assert_eq!(offset, block.len());
}

/// Highlighter bound to one editor document.
///
/// Each call to [`highlight_block`](Self::highlight_block) discards the spans
/// of the previous block wholesale.
#[derive(Debug, Clone)]
pub struct BlockHighlighter {
	language: Language,
	table: Arc<StyleTable>,
	spans: Vec<StyleSpan>,
}

impl BlockHighlighter {
	pub fn new(language: Language, table: Arc<StyleTable>) -> Self {
		Self {
			language,
			table,
			spans: Vec::new(),
		}
	}

	/// Re-highlights an edited block and returns its new spans.
	pub fn highlight_block(&mut self, block: &str) -> &[StyleSpan] {
		highlight_into(block, self.language, &self.table, &mut self.spans);
		tracing::trace!(language = self.language.name(), bytes = block.len(), spans = self.spans.len(), "syntax.highlight.block");
		&self.spans
	}
}
