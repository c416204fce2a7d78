//! Transport seam between fields and their option endpoints.

#[cfg(feature = "http")]
mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

#[cfg(feature = "http")]
pub use self::http::HttpSource;
use crate::cache::CacheKey;
use crate::error::FetchError;
use crate::option::{OptionItem, ParentFilterMap};

/// One option query: `GET <endpoint>?q=<query>&<filter>=<value>...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRequest {
	pub endpoint: String,
	pub query: String,
	pub filters: ParentFilterMap,
}

impl OptionRequest {
	pub fn new(endpoint: impl Into<String>, query: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
			query: query.into(),
			filters: ParentFilterMap::new(),
		}
	}

	pub fn with_filters(mut self, filters: ParentFilterMap) -> Self {
		self.filters = filters;
		self
	}

	pub fn cache_key(&self) -> CacheKey {
		CacheKey::new(&self.endpoint, &self.filters, &self.query)
	}

	/// Query parameters in request order: `q` first, then filters by name.
	/// Null filters and a filter shadowed by `q` are left out.
	pub fn query_pairs(&self) -> Vec<(&str, String)> {
		let mut pairs = vec![("q", self.query.clone())];
		pairs.extend(
			self.filters
				.iter()
				.filter(|(name, _)| name.as_str() != "q")
				.filter_map(|(name, value)| Some((name.as_str(), value.as_query_value()?))),
		);
		pairs
	}

	/// Absolute request URL. The endpoint must be an absolute URL; any query it
	/// already carries is replaced.
	pub fn url(&self) -> Result<Url, FetchError> {
		let mut url = Url::parse(&self.endpoint).map_err(|error| FetchError::InvalidEndpoint {
			endpoint: self.endpoint.clone(),
			reason: error.to_string(),
		})?;
		url.query_pairs_mut().clear().extend_pairs(self.query_pairs());
		Ok(url)
	}
}

/// Response body of an option query: `{ data, etag, total? }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionPage {
	#[serde(default)]
	pub data: Vec<OptionItem>,
	#[serde(default, rename = "etag")]
	pub validator: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total: Option<u64>,
}

/// Outcome of a conditional existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
	NotModified,
	Modified,
}

/// Fetches option pages for a field.
#[async_trait]
pub trait OptionSource: Send + Sync {
	async fn fetch(&self, request: &OptionRequest) -> Result<OptionPage, FetchError>;

	/// Conditional check carrying a previously seen validator. Sources without
	/// conditional requests report every entry as modified.
	async fn revalidate(&self, request: &OptionRequest, validator: &str) -> Result<Freshness, FetchError> {
		let _ = (request, validator);
		Ok(Freshness::Modified)
	}
}
