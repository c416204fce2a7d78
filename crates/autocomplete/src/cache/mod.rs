//! Time- and capacity-bounded option cache over a shared [`KeyValueStore`].
//!
//! Entries are JSON documents stored under `<prefix><CacheKey>`. Keys outside
//! the prefix are never read, evicted or cleared. Storage and serialization
//! failures never escape: reads degrade to a miss and writes are dropped.

mod key;
mod store;

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use self::key::CacheKey;
pub use self::store::{KeyValueStore, MemoryStore};
use crate::clock::Clock;
use crate::config::CacheConfig;
use crate::option::OptionItem;
use crate::source::{Freshness, OptionRequest, OptionSource};

/// A stored option snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
	pub data: Vec<OptionItem>,
	/// Opaque response version, empty when the endpoint sent none.
	pub validator: String,
	/// Milliseconds since the Unix epoch.
	pub stored_at: i64,
	pub key: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total: Option<u64>,
}

/// Diagnostics snapshot of the cache namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
	pub count: usize,
	/// Sum of serialized entry lengths in bytes.
	pub total_bytes: usize,
	pub oldest: Option<i64>,
	pub newest: Option<i64>,
}

/// Only the timestamp is needed to order entries for eviction.
#[derive(Deserialize)]
struct StoredAt {
	#[serde(rename = "storedAt")]
	stored_at: i64,
}

struct StoredEntry {
	storage_key: String,
	/// `None` for entries that do not parse; they are evicted first.
	stored_at: Option<i64>,
	bytes: usize,
}

#[derive(Debug)]
pub struct OptionCache {
	store: Arc<dyn KeyValueStore>,
	clock: Arc<dyn Clock>,
	config: CacheConfig,
	/// Serializes evict-then-insert so concurrent writers cannot overshoot capacity.
	write_lock: Mutex<()>,
}

impl OptionCache {
	pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, config: CacheConfig) -> Self {
		Self {
			store,
			clock,
			config,
			write_lock: Mutex::new(()),
		}
	}

	pub fn config(&self) -> &CacheConfig {
		&self.config
	}

	/// Returns the live entry for `key`.
	///
	/// Expired and unparsable entries are removed and reported as a miss.
	pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
		let storage_key = self.storage_key(key);
		let raw = self.store.get(&storage_key)?;

		let entry: CacheEntry = match serde_json::from_str(&raw) {
			Ok(entry) => entry,
			Err(error) => {
				warn!(%key, %error, "removing malformed cache entry");
				self.store.remove(&storage_key);
				return None;
			}
		};

		if self.is_expired(entry.stored_at) {
			debug!(%key, stored_at = entry.stored_at, "cache entry expired");
			self.store.remove(&storage_key);
			return None;
		}

		debug!(%key, "cache hit");
		Some(entry)
	}

	/// Stores a snapshot, evicting the oldest entries first when a new key
	/// would exceed `max_entries`.
	///
	/// A storage failure triggers one retry after evicting half the capacity;
	/// if that also fails the write is dropped.
	pub fn put(&self, key: &CacheKey, data: Vec<OptionItem>, validator: impl Into<String>, total: Option<u64>) {
		let _guard = self.write_lock.lock();
		let storage_key = self.storage_key(key);
		let entry = CacheEntry {
			data,
			validator: validator.into(),
			stored_at: self.clock.now_ms(),
			key: key.as_str().to_owned(),
			total,
		};
		let raw = match serde_json::to_string(&entry) {
			Ok(raw) => raw,
			Err(error) => {
				warn!(%key, %error, "dropping unserializable cache entry");
				return;
			}
		};

		if self.store.get(&storage_key).is_none() {
			let count = self.entries().len();
			let limit = self.config.max_entries.saturating_sub(1);
			if count > limit {
				self.evict_oldest(count - limit);
			}
		}

		let Err(error) = self.store.set(&storage_key, raw.clone()) else {
			debug!(%key, "cache entry stored");
			return;
		};

		debug!(%key, %error, "cache write failed, evicting half and retrying");
		self.evict_oldest((self.config.max_entries / 2).max(1));
		if let Err(error) = self.store.set(&storage_key, raw) {
			warn!(%key, %error, "dropping cache write after eviction retry");
		}
	}

	/// Removes every entry in this cache's namespace.
	pub fn clear(&self) {
		let _guard = self.write_lock.lock();
		for entry in self.entries() {
			self.store.remove(&entry.storage_key);
		}
	}

	pub fn len(&self) -> usize {
		self.entries().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn stats(&self) -> CacheStats {
		let entries = self.entries();
		let stamps = entries.iter().filter_map(|entry| entry.stored_at);
		CacheStats {
			count: entries.len(),
			total_bytes: entries.iter().map(|entry| entry.bytes).sum(),
			oldest: stamps.clone().min(),
			newest: stamps.max(),
		}
	}

	/// Asks the source whether `validator` still describes the response for
	/// `request`. Any failure counts as "not current".
	pub async fn validate(&self, source: &dyn OptionSource, request: &OptionRequest, validator: &str) -> bool {
		if validator.is_empty() {
			return false;
		}
		match source.revalidate(request, validator).await {
			Ok(Freshness::NotModified) => true,
			Ok(Freshness::Modified) => false,
			Err(error) => {
				debug!(endpoint = %request.endpoint, %error, "revalidation failed");
				false
			}
		}
	}

	fn storage_key(&self, key: &CacheKey) -> String {
		format!("{}{}", self.config.prefix, key)
	}

	fn is_expired(&self, stored_at: i64) -> bool {
		self.clock.now_ms().saturating_sub(stored_at) > self.config.ttl_ms
	}

	fn entries(&self) -> Vec<StoredEntry> {
		self.store
			.keys()
			.into_iter()
			.filter(|key| key.starts_with(&self.config.prefix))
			.filter_map(|storage_key| {
				let raw = self.store.get(&storage_key)?;
				let stored_at = serde_json::from_str::<StoredAt>(&raw).ok().map(|stamp| stamp.stored_at);
				Some(StoredEntry {
					storage_key,
					stored_at,
					bytes: raw.len(),
				})
			})
			.collect()
	}

	fn evict_oldest(&self, count: usize) {
		let mut entries = self.entries();
		entries.sort_by_key(|entry| entry.stored_at);
		for entry in entries.iter().take(count) {
			self.store.remove(&entry.storage_key);
		}
		debug!(evicted = count.min(entries.len()), "evicted oldest cache entries");
	}
}
