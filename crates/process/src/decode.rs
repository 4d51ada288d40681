/// Incremental lossy UTF-8 decoder for pipe reads.
///
/// A multi-byte sequence split across two reads is held back until the rest
/// arrives, so it decodes to one character instead of two replacement marks.
/// Invalid bytes decode to U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Chunker {
	pending: Vec<u8>,
}

impl Utf8Chunker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Decodes everything in `bytes` (plus held-back bytes) except a trailing
	/// incomplete sequence.
	pub fn push(&mut self, bytes: &[u8]) -> String {
		self.pending.extend_from_slice(bytes);
		let split = self.pending.len() - incomplete_tail_len(&self.pending);
		let text = String::from_utf8_lossy(&self.pending[..split]).into_owned();
		self.pending.drain(..split);
		text
	}

	/// Flushes held-back bytes at end of stream.
	pub fn finish(&mut self) -> String {
		let text = String::from_utf8_lossy(&self.pending).into_owned();
		self.pending.clear();
		text
	}

	pub fn has_pending(&self) -> bool {
		!self.pending.is_empty()
	}
}

/// Length of a truncated multi-byte sequence at the end of `bytes`, or 0.
fn incomplete_tail_len(bytes: &[u8]) -> usize {
	let len = bytes.len();
	for back in 1..=len.min(3) {
		let byte = bytes[len - back];
		if byte & 0b1100_0000 == 0b1000_0000 {
			continue;
		}
		let needed = match byte {
			0xC2..=0xDF => 2,
			0xE0..=0xEF => 3,
			0xF0..=0xF4 => 4,
			_ => return 0,
		};
		return if needed > back { back } else { 0 };
	}
	0
}
