//! Pure field state machine.

use crate::option::OptionItem;
use crate::ranking::combined_search;

/// Everything a field renders from. Changed only by [`FieldState::transition`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldState {
	pub input_text: String,
	/// Empty when nothing is selected.
	pub selected_value: String,
	/// Options as delivered by the last load.
	pub raw_options: Vec<OptionItem>,
	/// Options to render, in display order.
	pub ranked_options: Vec<OptionItem>,
	/// Server-reported total, when the endpoint sends one.
	pub total: Option<u64>,
	pub is_loading: bool,
	pub last_error: Option<String>,
	pub is_open: bool,
	/// Index into `ranked_options`.
	pub highlighted: Option<usize>,
	pub validation_message: Option<String>,
	pub touched: bool,
	/// Rank `raw_options` locally against `input_text`.
	pub local_filter: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
	InputChanged(String),
	LoadStarted,
	OptionsLoaded { options: Vec<OptionItem>, total: Option<u64> },
	LoadFailed(String),
	OptionsCleared,
	Selected(OptionItem),
	/// Commit the current input text as the value.
	CustomCommitted,
	Blurred { validation_message: Option<String> },
	Opened,
	Closed,
	HighlightNext,
	HighlightPrev,
	Reset,
}

impl FieldState {
	pub fn new(local_filter: bool) -> Self {
		Self {
			local_filter,
			..Self::default()
		}
	}

	pub fn transition(mut self, event: FieldEvent) -> Self {
		match event {
			FieldEvent::InputChanged(text) => {
				self.input_text = text;
				self.is_open = true;
				self.highlighted = None;
				if self.touched {
					self.validation_message = None;
				}
				self.rerank();
			}
			FieldEvent::LoadStarted => {
				self.is_loading = true;
				self.last_error = None;
			}
			FieldEvent::OptionsLoaded { options, total } => {
				self.raw_options = options;
				self.total = total;
				self.is_loading = false;
				self.last_error = None;
				self.rerank();
			}
			FieldEvent::LoadFailed(message) => {
				self.clear_options();
				self.last_error = Some(message);
			}
			FieldEvent::OptionsCleared => {
				self.clear_options();
				self.last_error = None;
			}
			FieldEvent::Selected(option) => {
				self.selected_value = option.value;
				self.input_text = option.label;
				self.is_open = false;
				self.highlighted = None;
				self.validation_message = None;
			}
			FieldEvent::CustomCommitted => {
				self.selected_value = self.input_text.clone();
				self.is_open = false;
				self.highlighted = None;
				self.validation_message = None;
			}
			FieldEvent::Blurred { validation_message } => {
				self.touched = true;
				self.is_open = false;
				self.highlighted = None;
				self.validation_message = validation_message;
			}
			FieldEvent::Opened => self.is_open = true,
			FieldEvent::Closed => {
				self.is_open = false;
				self.highlighted = None;
			}
			FieldEvent::HighlightNext => {
				self.highlighted = match (self.highlighted, self.ranked_options.len()) {
					(_, 0) => None,
					(None, _) => Some(0),
					(Some(idx), len) => Some((idx + 1).min(len - 1)),
				};
			}
			FieldEvent::HighlightPrev => {
				self.highlighted = match (self.highlighted, self.ranked_options.len()) {
					(_, 0) => None,
					(None, _) => Some(0),
					(Some(idx), _) => Some(idx.saturating_sub(1)),
				};
			}
			FieldEvent::Reset => {
				self = Self {
					touched: self.touched,
					local_filter: self.local_filter,
					..Self::default()
				};
			}
		}
		self
	}

	pub fn highlighted_option(&self) -> Option<&OptionItem> {
		self.highlighted.and_then(|idx| self.ranked_options.get(idx))
	}

	/// True when some loaded option's label or value equals the input, ignoring case.
	pub fn has_exact_match(&self) -> bool {
		let input = self.input_text.trim().to_lowercase();
		self.raw_options
			.iter()
			.any(|option| option.label.to_lowercase() == input || option.value.to_lowercase() == input)
	}

	fn rerank(&mut self) {
		self.ranked_options = if self.local_filter {
			combined_search(&self.input_text, &self.raw_options)
		} else {
			self.raw_options.clone()
		};
		if self.highlighted.is_some_and(|idx| idx >= self.ranked_options.len()) {
			self.highlighted = None;
		}
	}

	fn clear_options(&mut self) {
		self.raw_options.clear();
		self.ranked_options.clear();
		self.total = None;
		self.is_loading = false;
		self.highlighted = None;
	}
}
