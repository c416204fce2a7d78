//! One autocomplete field: input, selection, validation and keyboard handling
//! on top of a [`FetchScheduler`].
//!
//! All state changes go through [`FieldState::transition`]. Fetch results
//! arrive as [`FetchOutcome`]s and are applied by [`FieldController::pump`] or
//! [`FieldController::settle`]; outcomes of any attempt other than the one the
//! field is currently waiting on are dropped.

mod keys;
mod spec;
mod state;
mod view;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, trace};

pub use self::keys::{Key, KeyDisposition};
use self::keys::{KeyAction, resolve};
pub use self::spec::{FieldMode, FieldSpec, ParentBinding, ValidateFn};
pub use self::state::{FieldEvent, FieldState};
pub use self::view::{FieldView, OptionView};
use crate::cache::OptionCache;
use crate::config::SchedulerConfig;
use crate::error::FetchError;
use crate::option::{FieldId, FilterValue, OptionItem, ParentFilterMap};
use crate::ranking::highlight_segments;
use crate::scheduler::{FetchEvent, FetchOutcome, FetchScheduler};
use crate::source::{OptionRequest, OptionSource};

type ChangeCallback = Box<dyn FnMut(&str) + Send>;
type ErrorCallback = Box<dyn FnMut(&FetchError) + Send>;

/// Emitted on a field's notice channel whenever the user changes its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNotice {
	pub field: FieldId,
	pub value: String,
}

pub struct FieldController {
	spec: FieldSpec,
	state: FieldState,
	/// Filter values resolved from parent fields, keyed by filter name.
	parent_filters: ParentFilterMap,
	scheduler: FetchScheduler,
	outcomes: mpsc::UnboundedReceiver<FetchOutcome>,
	/// Generation whose outcomes are applied; `None` when nothing is pending.
	awaiting: Option<u64>,
	on_change: Option<ChangeCallback>,
	on_error: Option<ErrorCallback>,
	notices: Option<mpsc::UnboundedSender<FieldNotice>>,
}

impl FieldController {
	pub fn new(spec: FieldSpec, config: &SchedulerConfig, cache: Arc<OptionCache>, source: Arc<dyn OptionSource>) -> Self {
		let (scheduler, outcomes) = FetchScheduler::new(spec.id.clone(), config.clone(), cache, source);
		Self {
			state: FieldState::new(spec.mode == FieldMode::Prefetched),
			spec,
			parent_filters: ParentFilterMap::new(),
			scheduler,
			outcomes,
			awaiting: None,
			on_change: None,
			on_error: None,
			notices: None,
		}
	}

	/// Called with the new value whenever the selection changes.
	pub fn on_change(mut self, callback: impl FnMut(&str) + Send + 'static) -> Self {
		self.on_change = Some(Box::new(callback));
		self
	}

	/// Called for every network failure applied to this field.
	pub fn on_error(mut self, callback: impl FnMut(&FetchError) + Send + 'static) -> Self {
		self.on_error = Some(Box::new(callback));
		self
	}

	/// Routes user-driven value changes to a coordinator.
	pub fn set_notifier(&mut self, notices: mpsc::UnboundedSender<FieldNotice>) {
		self.notices = Some(notices);
	}

	pub fn id(&self) -> &FieldId {
		&self.spec.id
	}

	pub fn spec(&self) -> &FieldSpec {
		&self.spec
	}

	pub fn state(&self) -> &FieldState {
		&self.state
	}

	pub fn scheduler(&self) -> &FetchScheduler {
		&self.scheduler
	}

	pub fn parent_filters(&self) -> &ParentFilterMap {
		&self.parent_filters
	}

	/// True while any required parent filter has no value.
	pub fn is_disabled(&self) -> bool {
		self.spec.parents.iter().any(|binding| {
			binding.required && self.parent_filters.get(&binding.filter).is_none_or(FilterValue::is_absent)
		})
	}

	/// The request this field would send for `query` with its current filters.
	pub fn request(&self, query: &str) -> OptionRequest {
		let mut filters = self.spec.static_filters.clone();
		filters.extend(self.parent_filters.iter().map(|(name, value)| (name.clone(), value.clone())));
		OptionRequest::new(self.spec.endpoint.clone(), query).with_filters(filters)
	}

	pub fn on_input_change(&mut self, text: impl Into<String>) {
		if self.is_disabled() {
			return;
		}
		let text = text.into();
		self.dispatch(FieldEvent::InputChanged(text.clone()));
		if self.spec.mode == FieldMode::Prefetched {
			return;
		}

		match self.scheduler.schedule(self.request(&text)) {
			Some(handle) => self.awaiting = Some(handle.generation()),
			None => {
				self.awaiting = None;
				self.dispatch(FieldEvent::OptionsCleared);
			}
		}
	}

	pub fn on_select(&mut self, option: OptionItem) {
		if self.is_disabled() {
			return;
		}
		if self.spec.mode == FieldMode::Remote {
			self.scheduler.cancel();
			self.awaiting = None;
		}
		let previous = self.state.selected_value.clone();
		self.dispatch(FieldEvent::Selected(option));
		self.notify_if_changed(&previous);
	}

	/// Commits the raw input as the value. Returns `false` when custom values
	/// are disabled, the input is blank, or an option already matches it.
	pub fn on_create_custom(&mut self) -> bool {
		if !self.can_create_custom() {
			return false;
		}
		if self.spec.mode == FieldMode::Remote {
			self.scheduler.cancel();
			self.awaiting = None;
		}
		let previous = self.state.selected_value.clone();
		self.dispatch(FieldEvent::CustomCommitted);
		self.notify_if_changed(&previous);
		true
	}

	pub fn can_create_custom(&self) -> bool {
		self.spec.allow_custom && !self.is_disabled() && !self.state.input_text.trim().is_empty() && !self.state.has_exact_match()
	}

	pub fn on_blur(&mut self) {
		let value = &self.state.selected_value;
		let validation_message = if self.spec.required && value.is_empty() {
			Some(self.spec.required_message.clone())
		} else {
			self.spec.validator.as_ref().and_then(|validate| validate(value))
		};
		self.dispatch(FieldEvent::Blurred { validation_message });
	}

	pub fn on_key(&mut self, key: Key) -> KeyDisposition {
		if self.is_disabled() {
			return KeyDisposition::PassThrough;
		}
		let (action, disposition) = resolve(key, self.state.is_open, self.state.highlighted, self.spec.allow_custom);
		trace!(field = %self.spec.id, ?key, ?action, "field key");
		match action {
			KeyAction::Open => self.dispatch(FieldEvent::Opened),
			KeyAction::Close => self.dispatch(FieldEvent::Closed),
			KeyAction::HighlightNext => self.dispatch(FieldEvent::HighlightNext),
			KeyAction::HighlightPrev => self.dispatch(FieldEvent::HighlightPrev),
			KeyAction::Select(idx) => {
				if let Some(option) = self.state.ranked_options.get(idx).cloned() {
					self.on_select(option);
				}
			}
			KeyAction::CreateCustom => {
				self.on_create_custom();
			}
			KeyAction::Ignore => {}
		}
		disposition
	}

	/// Replaces the parent-derived filters. Does not fetch; see [`Self::refresh`].
	pub fn apply_filters(&mut self, filters: ParentFilterMap) {
		self.parent_filters = filters;
	}

	/// Clears value, input and options and cancels any pending fetch.
	///
	/// Fires `on_change("")` when a value was selected, but does not notify the
	/// coordinator: resets are how the coordinator propagates changes.
	pub fn reset(&mut self) {
		self.scheduler.cancel();
		self.awaiting = None;
		let had_value = !self.state.selected_value.is_empty();
		self.dispatch(FieldEvent::Reset);
		if had_value && let Some(on_change) = self.on_change.as_mut() {
			on_change("");
		}
	}

	/// [`Self::reset`] as a user action: dependents are notified.
	pub fn clear(&mut self) {
		let previous = self.state.selected_value.clone();
		self.reset();
		if !previous.is_empty() {
			self.send_notice();
		}
	}

	/// Loads options for the current filters: a prefetched field fetches its
	/// full set immediately, a remote field re-runs its current query.
	pub fn refresh(&mut self) {
		if self.is_disabled() {
			self.scheduler.cancel();
			self.awaiting = None;
			self.dispatch(FieldEvent::OptionsCleared);
			return;
		}

		match self.spec.mode {
			FieldMode::Prefetched => {
				let handle = self.scheduler.prefetch(self.request(""));
				self.awaiting = Some(handle.generation());
			}
			FieldMode::Remote => match self.scheduler.schedule(self.request(&self.state.input_text)) {
				Some(handle) => self.awaiting = Some(handle.generation()),
				None => {
					self.awaiting = None;
					self.dispatch(FieldEvent::OptionsCleared);
				}
			},
		}
	}

	/// Applies every outcome already delivered. Returns how many were applied.
	pub fn pump(&mut self) -> usize {
		let mut applied = 0;
		while let Ok(outcome) = self.outcomes.try_recv() {
			if self.apply(outcome) {
				applied += 1;
			}
		}
		applied
	}

	/// Waits until the awaited attempt settles, applying its outcomes.
	pub async fn settle(&mut self) {
		while self.awaiting.is_some() {
			let Some(outcome) = self.outcomes.recv().await else {
				break;
			};
			self.apply(outcome);
		}
	}

	pub fn is_settled(&self) -> bool {
		self.awaiting.is_none()
	}

	pub fn view(&self) -> FieldView {
		let options = self
			.state
			.ranked_options
			.iter()
			.enumerate()
			.map(|(idx, option)| OptionView {
				value: option.value.clone(),
				label: option.label.clone(),
				segments: highlight_segments(&option.label, &self.state.input_text),
				highlighted: self.state.highlighted == Some(idx),
				selected: !self.state.selected_value.is_empty() && option.value == self.state.selected_value,
			})
			.collect();

		FieldView {
			id: self.spec.id.clone(),
			input_text: self.state.input_text.clone(),
			selected_value: self.state.selected_value.clone(),
			disabled: self.is_disabled(),
			is_open: self.state.is_open,
			is_loading: self.state.is_loading,
			options,
			highlighted: self.state.highlighted,
			total: self.state.total,
			error: self.state.last_error.clone(),
			validation_message: self.state.validation_message.clone(),
			can_create_custom: self.can_create_custom(),
		}
	}

	fn apply(&mut self, outcome: FetchOutcome) -> bool {
		if self.awaiting != Some(outcome.generation) {
			trace!(field = %self.spec.id, generation = outcome.generation, "dropping stale fetch outcome");
			return false;
		}

		match outcome.event {
			FetchEvent::Started => self.dispatch(FieldEvent::LoadStarted),
			FetchEvent::Loaded { options, total, .. } => self.dispatch(FieldEvent::OptionsLoaded { options, total }),
			FetchEvent::Failed(error) => {
				self.dispatch(FieldEvent::LoadFailed(error.to_string()));
				if let Some(on_error) = self.on_error.as_mut() {
					on_error(&error);
				}
			}
			FetchEvent::Settled => self.awaiting = None,
		}
		true
	}

	fn dispatch(&mut self, event: FieldEvent) {
		trace!(field = %self.spec.id, ?event, "field transition");
		self.state = std::mem::take(&mut self.state).transition(event);
	}

	fn notify_if_changed(&mut self, previous: &str) {
		if self.state.selected_value == previous {
			return;
		}
		debug!(field = %self.spec.id, value = %self.state.selected_value, "field value changed");
		if let Some(on_change) = self.on_change.as_mut() {
			on_change(&self.state.selected_value);
		}
		self.send_notice();
	}

	fn send_notice(&self) {
		if let Some(notices) = &self.notices {
			let _ = notices.send(FieldNotice {
				field: self.spec.id.clone(),
				value: self.state.selected_value.clone(),
			});
		}
	}
}
