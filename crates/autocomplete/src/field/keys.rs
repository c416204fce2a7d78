//! Keyboard handling for an open or closed option list.

/// Keys the field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
	Down,
	Up,
	Enter,
	Escape,
	Tab,
}

/// Whether the host should still run the key's default behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
	Handled,
	PassThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAction {
	Open,
	Close,
	HighlightNext,
	HighlightPrev,
	Select(usize),
	CreateCustom,
	Ignore,
}

pub(crate) fn resolve(key: Key, is_open: bool, highlighted: Option<usize>, allow_custom: bool) -> (KeyAction, KeyDisposition) {
	use KeyAction::*;
	use KeyDisposition::*;

	if !is_open {
		return match key {
			Key::Down | Key::Enter => (Open, Handled),
			Key::Up | Key::Escape | Key::Tab => (Ignore, PassThrough),
		};
	}

	match key {
		Key::Down => (HighlightNext, Handled),
		Key::Up => (HighlightPrev, Handled),
		Key::Enter => match highlighted {
			Some(idx) => (Select(idx), Handled),
			None if allow_custom => (CreateCustom, Handled),
			None => (Ignore, Handled),
		},
		Key::Escape => (Close, Handled),
		// focus moves on; only the list closes
		Key::Tab => (Close, PassThrough),
	}
}
