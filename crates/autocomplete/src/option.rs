use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable identity of a field within a cascade.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for FieldId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for FieldId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for FieldId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

/// One selectable option as returned by an endpoint.
///
/// `value` identifies the option within one endpoint and filter scope; `label`
/// is what the user sees and what ranking matches against first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionItem {
	pub value: String,
	pub label: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<Map<String, Value>>,
}

impl OptionItem {
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
			metadata: None,
		}
	}

	pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
		self.metadata = Some(metadata);
		self
	}
}

/// A primitive filter value sent alongside the query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
	#[default]
	Null,
	Bool(bool),
	Number(serde_json::Number),
	String(String),
}

impl FilterValue {
	/// True for `Null` and the empty string, the two ways a parent reports "no value".
	pub fn is_absent(&self) -> bool {
		match self {
			Self::Null => true,
			Self::String(value) => value.is_empty(),
			Self::Bool(_) | Self::Number(_) => false,
		}
	}

	/// Query-string rendering; `None` for `Null`, which is omitted from requests.
	pub fn as_query_value(&self) -> Option<String> {
		match self {
			Self::Null => None,
			Self::Bool(value) => Some(value.to_string()),
			Self::Number(value) => Some(value.to_string()),
			Self::String(value) => Some(value.clone()),
		}
	}
}

impl From<&FilterValue> for Value {
	fn from(value: &FilterValue) -> Self {
		match value {
			FilterValue::Null => Value::Null,
			FilterValue::Bool(value) => Value::Bool(*value),
			FilterValue::Number(value) => Value::Number(value.clone()),
			FilterValue::String(value) => Value::String(value.clone()),
		}
	}
}

impl From<&str> for FilterValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for FilterValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<bool> for FilterValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for FilterValue {
	fn from(value: i64) -> Self {
		Self::Number(value.into())
	}
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

/// Filter name to value, sent as query parameters and folded into cache keys.
pub type ParentFilterMap = BTreeMap<String, FilterValue>;
