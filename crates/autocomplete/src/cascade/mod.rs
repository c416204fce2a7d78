//! Parent to child resets across a set of fields.
//!
//! A field depends on another when one of its [`ParentBinding`]s names it.
//! Fields report user-driven value changes on a shared notice channel; the
//! coordinator drains it after every operation and, for each changed field,
//! first resets every descendant and only then lets the ones whose required
//! parents still have values fetch again.
//!
//! [`ParentBinding`]: crate::ParentBinding

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::CascadeError;
use crate::field::{FieldController, FieldMode, FieldNotice, FieldSpec, Key, KeyDisposition};
use crate::option::{FieldId, FilterValue, OptionItem, ParentFilterMap};

type Result<T> = std::result::Result<T, CascadeError>;

pub struct CascadeCoordinator {
	/// Registration order; parents always precede their children.
	fields: IndexMap<FieldId, FieldController>,
	notice_tx: mpsc::UnboundedSender<FieldNotice>,
	notice_rx: mpsc::UnboundedReceiver<FieldNotice>,
}

impl Default for CascadeCoordinator {
	fn default() -> Self {
		Self::new()
	}
}

impl CascadeCoordinator {
	pub fn new() -> Self {
		let (notice_tx, notice_rx) = mpsc::unbounded_channel();
		Self {
			fields: IndexMap::new(),
			notice_tx,
			notice_rx,
		}
	}

	/// Adds a field. Its parents must already be registered.
	///
	/// The field receives its parent filters immediately and, when enabled, a
	/// prefetched field starts loading its options.
	pub fn register(&mut self, mut field: FieldController) -> Result<()> {
		let id = field.id().clone();
		if self.fields.contains_key(&id) {
			return Err(CascadeError::DuplicateField(id));
		}
		for binding in &field.spec().parents {
			if binding.field == id {
				return Err(CascadeError::Cycle(id));
			}
			if !self.fields.contains_key(&binding.field) {
				return Err(CascadeError::UnknownParent {
					field: id,
					parent: binding.field.clone(),
				});
			}
		}

		field.set_notifier(self.notice_tx.clone());
		field.apply_filters(self.resolve_filters(field.spec()));
		if field.spec().mode == FieldMode::Prefetched {
			field.refresh();
		}
		debug!(field = %id, parents = field.spec().parents.len(), "field registered");
		self.fields.insert(id, field);
		Ok(())
	}

	pub fn field(&self, id: &FieldId) -> Option<&FieldController> {
		self.fields.get(id)
	}

	pub fn fields(&self) -> impl Iterator<Item = &FieldController> {
		self.fields.values()
	}

	pub fn input(&mut self, id: &FieldId, text: impl Into<String>) -> Result<()> {
		self.field_mut(id)?.on_input_change(text);
		self.propagate();
		Ok(())
	}

	pub fn select(&mut self, id: &FieldId, option: OptionItem) -> Result<()> {
		self.field_mut(id)?.on_select(option);
		self.propagate();
		Ok(())
	}

	pub fn create_custom(&mut self, id: &FieldId) -> Result<bool> {
		let created = self.field_mut(id)?.on_create_custom();
		self.propagate();
		Ok(created)
	}

	pub fn key(&mut self, id: &FieldId, key: Key) -> Result<KeyDisposition> {
		let disposition = self.field_mut(id)?.on_key(key);
		self.propagate();
		Ok(disposition)
	}

	pub fn blur(&mut self, id: &FieldId) -> Result<()> {
		self.field_mut(id)?.on_blur();
		Ok(())
	}

	/// Clears a field's value as a user action, resetting its descendants.
	pub fn clear(&mut self, id: &FieldId) -> Result<()> {
		self.field_mut(id)?.clear();
		self.propagate();
		Ok(())
	}

	/// Applies delivered fetch outcomes on every field.
	pub fn pump(&mut self) -> usize {
		self.fields.values_mut().map(FieldController::pump).sum()
	}

	pub async fn settle(&mut self, id: &FieldId) -> Result<()> {
		self.field_mut(id)?.settle().await;
		Ok(())
	}

	pub async fn settle_all(&mut self) {
		for field in self.fields.values_mut() {
			field.settle().await;
		}
	}

	/// Fields with a binding on `id`, in registration order.
	pub fn dependents_of(&self, id: &FieldId) -> Vec<FieldId> {
		self.fields
			.values()
			.filter(|field| field.spec().depends_on(id))
			.map(|field| field.id().clone())
			.collect()
	}

	/// Every field reachable through bindings from `id`, parents before children.
	pub fn descendants_of(&self, id: &FieldId) -> Vec<FieldId> {
		let mut seen = HashSet::new();
		let mut order = Vec::new();
		let mut queue = VecDeque::from([id.clone()]);
		while let Some(current) = queue.pop_front() {
			for child in self.dependents_of(&current) {
				if seen.insert(child.clone()) {
					order.push(child.clone());
					queue.push_back(child);
				}
			}
		}
		order
	}

	fn field_mut(&mut self, id: &FieldId) -> Result<&mut FieldController> {
		self.fields.get_mut(id).ok_or_else(|| CascadeError::UnknownField(id.clone()))
	}

	fn resolve_filters(&self, spec: &FieldSpec) -> ParentFilterMap {
		spec.parents
			.iter()
			.map(|binding| {
				let value = self
					.fields
					.get(&binding.field)
					.map(|parent| parent.state().selected_value.as_str())
					.filter(|value| !value.is_empty())
					.map_or(FilterValue::Null, FilterValue::from);
				(binding.filter.clone(), value)
			})
			.collect()
	}

	fn propagate(&mut self) {
		while let Ok(notice) = self.notice_rx.try_recv() {
			self.cascade_from(&notice.field);
		}
	}

	fn cascade_from(&mut self, parent: &FieldId) {
		let descendants = self.descendants_of(parent);
		if descendants.is_empty() {
			return;
		}
		debug!(field = %parent, dependents = descendants.len(), "resetting dependent fields");

		// Every descendant is cleared before any of them may fetch again.
		for id in &descendants {
			if let Some(field) = self.fields.get_mut(id) {
				field.reset();
			}
		}

		for id in &descendants {
			let Some(spec) = self.fields.get(id).map(|field| field.spec().clone()) else {
				continue;
			};
			let filters = self.resolve_filters(&spec);
			if let Some(field) = self.fields.get_mut(id) {
				field.apply_filters(filters);
				if !field.is_disabled() {
					field.refresh();
				}
			}
		}
	}
}

#[cfg(test)]
mod tests;
