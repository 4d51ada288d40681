/// Execution class attached to every piece of background work.
///
/// The class only feeds tracing today; it documents at the spawn site which
/// pool the work lands on and how urgent it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Timers and coordinators that sit directly behind user input.
	Interactive,
	/// Long-lived async work such as child-process stream readers.
	Background,
	/// Filesystem walks and file reads on the blocking pool.
	IoBlocking,
}

impl TaskClass {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Background => "background",
			Self::IoBlocking => "io_blocking",
		}
	}
}
