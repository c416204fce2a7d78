use std::collections::BTreeMap;
use std::fmt;

use parking_lot::Mutex;

use crate::error::StorageError;

/// Minimal string key-value storage the cache layer persists into.
///
/// One store is typically shared by every field of a session, and may hold
/// keys that do not belong to the cache.
pub trait KeyValueStore: Send + Sync + fmt::Debug {
	fn get(&self, key: &str) -> Option<String>;
	fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
	fn remove(&self, key: &str);
	fn keys(&self) -> Vec<String>;
}

/// Session-scoped in-memory store with an optional byte quota.
///
/// The quota counts key and value bytes of every stored pair.
#[derive(Debug, Default)]
pub struct MemoryStore {
	entries: Mutex<BTreeMap<String, String>>,
	quota: Option<usize>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_quota(quota: usize) -> Self {
		Self {
			entries: Mutex::default(),
			quota: Some(quota),
		}
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}

	pub fn used_bytes(&self) -> usize {
		self.entries.lock().iter().map(|(key, value)| key.len() + value.len()).sum()
	}
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Option<String> {
		self.entries.lock().get(key).cloned()
	}

	fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
		let mut entries = self.entries.lock();
		if let Some(quota) = self.quota {
			let used: usize = entries
				.iter()
				.filter(|(existing, _)| existing.as_str() != key)
				.map(|(existing, value)| existing.len() + value.len())
				.sum();
			let needed = key.len() + value.len();
			if used + needed > quota {
				return Err(StorageError::QuotaExceeded {
					needed,
					available: quota.saturating_sub(used),
				});
			}
		}
		entries.insert(key.to_owned(), value);
		Ok(())
	}

	fn remove(&self, key: &str) {
		self.entries.lock().remove(key);
	}

	fn keys(&self) -> Vec<String> {
		self.entries.lock().keys().cloned().collect()
	}
}
