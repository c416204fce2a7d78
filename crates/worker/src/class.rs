use std::fmt;

/// Scheduling class attached to every spawned task, reported in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Work a user is waiting on, such as a debounced option fetch.
	Interactive,
	/// Work started without a keystroke behind it, such as loading a
	/// prefetched option set.
	Background,
}

impl TaskClass {
	pub const fn name(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Background => "background",
		}
	}
}

impl fmt::Display for TaskClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}
