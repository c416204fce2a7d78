use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::option::ParentFilterMap;

/// Deterministic cache key for one endpoint, filter set and query.
///
/// Filters and the query are rendered as one JSON object with sorted keys, so
/// maps that differ only in insertion order produce the same key. A filter
/// named `q` is shadowed by the query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
	pub fn new(endpoint: &str, filters: &ParentFilterMap, query: &str) -> Self {
		let mut params: BTreeMap<&str, Value> = filters.iter().map(|(name, value)| (name.as_str(), Value::from(value))).collect();
		params.insert("q", Value::String(query.to_owned()));

		let object: Map<String, Value> = params.into_iter().map(|(name, value)| (name.to_owned(), value)).collect();
		Self(format!("{endpoint}?{}", Value::Object(object)))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for CacheKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
