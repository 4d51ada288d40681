//! Tree-sitter parse and capture flattening.
//!
//! Highlight captures nest the way syntax nodes do. Flattening keeps, for
//! every byte, the innermost capture covering it; bytes no capture covers
//! become [`Category::TEXT`].

use std::cmp::Reverse;
use std::sync::LazyLock;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

use crate::Category;

/// Byte range of the input owned by one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Segment {
	pub start: usize,
	pub end: usize,
	pub category: Category,
}

struct HighlightSpec {
	grammar: tree_sitter::Language,
	query: Query,
}

/// `(ERROR)` is the last pattern, so a grammar capture on the same node wins.
static PYTHON: LazyLock<Option<HighlightSpec>> = LazyLock::new(|| {
	let grammar: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
	let source = format!("{}\n(ERROR) @{}\n", tree_sitter_python::HIGHLIGHTS_QUERY, Category::ERROR);
	match Query::new(&grammar, &source) {
		Ok(query) => Some(HighlightSpec { grammar, query }),
		Err(err) => {
			tracing::warn!(error = %err, "syntax.query.invalid");
			None
		}
	}
});

#[derive(Debug, Clone, Copy)]
struct Capture {
	start: usize,
	end: usize,
	/// Number of labels in the capture name.
	depth: usize,
	pattern: usize,
	category: Category,
}

/// Segments for a Python text unit, in order and covering `text` exactly.
pub(super) fn python(text: &str) -> Vec<Segment> {
	let Some(spec) = PYTHON.as_ref() else {
		return whole(text);
	};

	let mut parser = Parser::new();
	if let Err(err) = parser.set_language(&spec.grammar) {
		tracing::warn!(error = %err, "syntax.grammar.incompatible");
		return whole(text);
	}
	let Some(tree) = parser.parse(text, None) else {
		return whole(text);
	};

	let names = spec.query.capture_names();
	let mut captures = Vec::new();
	let mut cursor = QueryCursor::new();
	let mut matches = cursor.matches(&spec.query, tree.root_node(), text.as_bytes());
	while let Some(m) = matches.next() {
		for capture in m.captures {
			let (start, end) = (capture.node.start_byte(), capture.node.end_byte());
			let Some(&name) = names.get(capture.index as usize) else {
				continue;
			};
			if start >= end || end > text.len() || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
				continue;
			}
			captures.push(Capture {
				start,
				end,
				depth: name.split('.').count(),
				pattern: m.pattern_index,
				category: Category::new(name),
			});
		}
	}

	flatten(text.len(), captures)
}

/// A single [`Category::TEXT`] segment, or nothing for empty input.
pub(super) fn whole(text: &str) -> Vec<Segment> {
	if text.is_empty() {
		return Vec::new();
	}
	vec![Segment {
		start: 0,
		end: text.len(),
		category: Category::TEXT,
	}]
}

/// Resolves nested captures into a flat, gap-free segment list.
///
/// Among captures on the same node, the more specific name wins, then the
/// earlier pattern. Adjacent segments of one category are merged.
fn flatten(len: usize, mut captures: Vec<Capture>) -> Vec<Segment> {
	// Outer before inner; on equal ranges the winner is pushed last.
	captures.sort_by_key(|c| (c.start, Reverse(c.end), c.depth, Reverse(c.pattern)));

	let mut out = Vec::with_capacity(captures.len() * 2 + 1);
	let mut open: Vec<(usize, Category)> = Vec::new();
	let mut pos = 0;

	for capture in captures {
		close(&mut out, &mut open, &mut pos, capture.start);
		let enclosing = open.last().map_or(Category::TEXT, |&(_, category)| category);
		push(&mut out, pos, capture.start, enclosing);
		pos = pos.max(capture.start);

		let end = open.last().map_or(capture.end, |&(outer, _)| capture.end.min(outer));
		open.push((end, capture.category));
	}

	close(&mut out, &mut open, &mut pos, len);
	push(&mut out, pos, len, Category::TEXT);
	out
}

/// Emits and pops every open capture ending at or before `limit`.
fn close(out: &mut Vec<Segment>, open: &mut Vec<(usize, Category)>, pos: &mut usize, limit: usize) {
	while let Some(&(end, category)) = open.last() {
		if end > limit {
			break;
		}
		push(out, *pos, end, category);
		*pos = (*pos).max(end);
		open.pop();
	}
}

fn push(out: &mut Vec<Segment>, start: usize, end: usize, category: Category) {
	if start >= end {
		return;
	}
	if let Some(last) = out.last_mut()
		&& last.end == start
		&& last.category == category
	{
		last.end = end;
		return;
	}
	out.push(Segment { start, end, category });
}
