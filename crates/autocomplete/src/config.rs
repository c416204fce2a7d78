//! Engine configuration, loadable from TOML.
//!
//! ```toml
//! [cache]
//! ttl_ms = 300000
//! max_entries = 50
//! prefix = "autocomplete_cache_"
//!
//! [scheduler]
//! debounce_ms = 300
//! min_chars = 2
//! request_timeout_ms = 10000
//! revalidate_on_hit = false
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutocompleteConfig {
	pub cache: CacheConfig,
	pub scheduler: SchedulerConfig,
}

impl AutocompleteConfig {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.cache.max_entries == 0 {
			return Err(ConfigError::Invalid("cache.max_entries must be at least 1".into()));
		}
		if self.scheduler.request_timeout_ms == 0 {
			return Err(ConfigError::Invalid("scheduler.request_timeout_ms must be positive".into()));
		}
		Ok(())
	}
}

/// Cache layer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
	/// Maximum entry age. Zero or negative values make entries stale as soon as
	/// any time has passed (negative: immediately).
	pub ttl_ms: i64,
	pub max_entries: usize,
	/// Namespace prefix for every key this cache writes to the store.
	pub prefix: String,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self {
			ttl_ms: 5 * 60 * 1000,
			max_entries: 50,
			prefix: "autocomplete_cache_".to_string(),
		}
	}
}

/// Per-field fetch scheduling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
	pub debounce_ms: u64,
	/// Queries shorter than this (in chars) never reach the network.
	pub min_chars: usize,
	pub request_timeout_ms: u64,
	/// Confirm cache hits with a conditional request and refetch when stale.
	pub revalidate_on_hit: bool,
}

impl SchedulerConfig {
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.request_timeout_ms)
	}
}

impl Default for SchedulerConfig {
	fn default() -> Self {
		Self {
			debounce_ms: 300,
			min_chars: 2,
			request_timeout_ms: 10_000,
			revalidate_on_hit: false,
		}
	}
}
