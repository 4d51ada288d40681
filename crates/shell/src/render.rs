use std::fmt::Write as _;

use anstyle::{Color, RgbColor};
use lantern_syntax::{Style, StyleSpan};

/// Terminal style for a highlight style: 24-bit foreground plus modifiers.
fn terminal_style(style: Style) -> anstyle::Style {
	let fg = style.foreground;
	let mut out = anstyle::Style::new().fg_color(Some(Color::Rgb(RgbColor(fg.r, fg.g, fg.b))));
	if style.bold {
		out = out.bold();
	}
	if style.italic {
		out = out.italic();
	}
	out
}

/// Renders `block` with ANSI styles applied per span.
///
/// Spans must be sorted and non-overlapping, as the highlighter emits them.
pub fn paint_block(block: &str, spans: &[StyleSpan]) -> String {
	let mut out = String::with_capacity(block.len() + spans.len() * 24);
	let mut cursor = 0;
	for span in spans {
		let style = terminal_style(span.style);
		out.push_str(&block[cursor..span.offset]);
		let _ = write!(out, "{}{}{}", style.render(), &block[span.offset..span.end()], style.render_reset());
		cursor = span.end();
	}
	out.push_str(&block[cursor..]);
	out
}

/// One line per span: byte range, color and modifiers.
pub fn describe_spans(line: usize, block: &str, spans: &[StyleSpan]) -> String {
	let mut out = String::new();
	for span in spans {
		let _ = write!(out, "{line}:{}..{} {}", span.offset, span.end(), span.style.foreground);
		if span.style.bold {
			out.push_str(" bold");
		}
		if span.style.italic {
			out.push_str(" italic");
		}
		let _ = writeln!(out, " {:?}", &block[span.offset..span.end()]);
	}
	out
}

#[cfg(test)]
mod tests {
	use anstyle::Effects;
	use lantern_syntax::{Color as SyntaxColor, Language, StyleTable, highlight};

	use super::*;

	fn strip(painted: &str) -> String {
		let mut out = String::new();
		let mut rest = painted;
		while let Some(start) = rest.find('\x1b') {
			out.push_str(&rest[..start]);
			let end = rest[start..].find('m').map_or(rest.len(), |m| start + m + 1);
			rest = &rest[end..];
		}
		out.push_str(rest);
		out
	}

	#[test]
	fn unstyled_text_passes_through() {
		assert_eq!(paint_block("plain", &[]), "plain");
	}

	#[test]
	fn style_maps_color_and_modifiers() {
		let style = terminal_style(Style::fg(SyntaxColor::rgb(0x75, 0x71, 0x5E)).italic());
		assert_eq!(style.get_fg_color(), Some(Color::Rgb(RgbColor(0x75, 0x71, 0x5E))));
		assert_eq!(style.get_effects(), Effects::ITALIC);

		let style = terminal_style(Style::fg(SyntaxColor::rgb(1, 2, 3)).bold());
		assert_eq!(style.get_effects(), Effects::BOLD);
	}

	#[test]
	fn spans_are_wrapped_in_rendered_styles() {
		let table = StyleTable::monokai();
		let block = "import os";
		let spans = highlight(block, Language::Python, &table);
		let painted = paint_block(block, &spans);

		let keyword = terminal_style(table.resolve("keyword").expect("monokai keyword").style());
		let expected = format!("{}import{}", keyword.render(), keyword.render_reset());
		assert!(painted.starts_with(&expected), "{painted:?}");
		assert_eq!(strip(&painted), block);
	}

	#[test]
	fn comment_renders_italic() {
		let table = StyleTable::monokai();
		let block = "# note";
		let spans = highlight(block, Language::Python, &table);
		let comment = terminal_style(Style::fg(SyntaxColor::rgb(0x75, 0x71, 0x5E)).italic());

		assert_eq!(paint_block(block, &spans), format!("{}# note{}", comment.render(), comment.render_reset()));
		assert_eq!(describe_spans(1, block, &spans), "1:0..6 #75715E italic \"# note\"\n");
	}
}
