use std::fmt;
use std::sync::Arc;

use crate::option::{FieldId, FilterValue, ParentFilterMap};

/// Validation hook run on blur against the selected value; returns the
/// message to show, or `None` when the value is acceptable.
pub type ValidateFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// How a field obtains and filters its options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldMode {
	/// Every query goes to the endpoint; options are shown in response order.
	#[default]
	Remote,
	/// The full option set is fetched once and filtered locally per keystroke.
	Prefetched,
}

/// A filter whose value is another field's selected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentBinding {
	/// Query parameter name.
	pub filter: String,
	pub field: FieldId,
	/// The child is disabled while this parent has no value.
	pub required: bool,
}

/// Static description of one field.
#[derive(Clone)]
pub struct FieldSpec {
	pub id: FieldId,
	pub endpoint: String,
	pub mode: FieldMode,
	pub parents: Vec<ParentBinding>,
	/// Filters sent with every request, overridden by parent bindings of the same name.
	pub static_filters: ParentFilterMap,
	pub allow_custom: bool,
	pub required: bool,
	pub required_message: String,
	pub validator: Option<ValidateFn>,
}

impl fmt::Debug for FieldSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldSpec")
			.field("id", &self.id)
			.field("endpoint", &self.endpoint)
			.field("mode", &self.mode)
			.field("parents", &self.parents)
			.field("static_filters", &self.static_filters)
			.field("allow_custom", &self.allow_custom)
			.field("required", &self.required)
			.field("validator", &self.validator.is_some())
			.finish_non_exhaustive()
	}
}

impl FieldSpec {
	pub fn new(id: impl Into<FieldId>, endpoint: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			endpoint: endpoint.into(),
			mode: FieldMode::Remote,
			parents: Vec::new(),
			static_filters: ParentFilterMap::new(),
			allow_custom: false,
			required: false,
			required_message: "This field is required".to_string(),
			validator: None,
		}
	}

	pub fn prefetched(mut self) -> Self {
		self.mode = FieldMode::Prefetched;
		self
	}

	/// Adds a required parent binding.
	pub fn parent(mut self, filter: impl Into<String>, field: impl Into<FieldId>) -> Self {
		self.parents.push(ParentBinding {
			filter: filter.into(),
			field: field.into(),
			required: true,
		});
		self
	}

	/// Adds a parent binding that filters when set but never disables the field.
	pub fn optional_parent(mut self, filter: impl Into<String>, field: impl Into<FieldId>) -> Self {
		self.parents.push(ParentBinding {
			filter: filter.into(),
			field: field.into(),
			required: false,
		});
		self
	}

	pub fn static_filter(mut self, name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
		self.static_filters.insert(name.into(), value.into());
		self
	}

	pub fn allow_custom(mut self, allow: bool) -> Self {
		self.allow_custom = allow;
		self
	}

	pub fn required(mut self, message: impl Into<String>) -> Self {
		self.required = true;
		self.required_message = message.into();
		self
	}

	pub fn validator(mut self, validate: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
		self.validator = Some(Arc::new(validate));
		self
	}

	pub fn depends_on(&self, field: &FieldId) -> bool {
		self.parents.iter().any(|binding| &binding.field == field)
	}
}
