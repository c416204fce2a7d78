use crate::option::FieldId;
use crate::ranking::Segment;

/// Read model of a field for a rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
	pub id: FieldId,
	pub input_text: String,
	pub selected_value: String,
	pub disabled: bool,
	pub is_open: bool,
	pub is_loading: bool,
	pub options: Vec<OptionView>,
	pub highlighted: Option<usize>,
	pub total: Option<u64>,
	pub error: Option<String>,
	pub validation_message: Option<String>,
	/// Enter on the current input would create a custom value.
	pub can_create_custom: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionView {
	pub value: String,
	pub label: String,
	/// Label split by what matched the current input.
	pub segments: Vec<Segment>,
	pub highlighted: bool,
	pub selected: bool,
}
