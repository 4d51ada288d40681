//! Syntax layer of the shell: classify text into categorized tokens, resolve
//! categories against a style table, and turn edited blocks into style spans.
//!
//! The three stages are separate:
//!
//! * [`classify`] is pure and restartable; it never fails and always covers
//!   its input exactly.
//! * [`StyleTable::resolve`] walks a [`Category`] path from most specific to
//!   least specific and returns the first exact rule.
//! * [`BlockHighlighter`] runs both per edited block and replaces the block's
//!   spans wholesale.

mod category;
mod classify;
mod highlight;
mod style;

pub use category::{Ancestors, Category, ancestors};
pub use classify::{Language, Token, Tokens, classify};
pub use highlight::{BlockHighlighter, StyleSpan, highlight, highlight_into};
pub use style::{Color, ColorParseError, Style, StyleRule, StyleTable};
