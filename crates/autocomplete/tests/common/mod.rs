#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cascade_autocomplete::{
	CacheConfig, FetchError, FieldController, FieldSpec, ManualClock, MemoryStore, OptionCache, OptionItem, OptionPage,
	OptionRequest, OptionSource, SchedulerConfig,
};
use parking_lot::Mutex;

// Library and unit-test dependencies these scenario binaries do not touch.
#[cfg(feature = "http")]
use reqwest as _;
use {
	cascade_matcher as _, cascade_worker as _, chrono as _, indexmap as _, proptest as _, serde as _, serde_json as _,
	tempfile as _, thiserror as _, toml as _, tracing as _, url as _,
};

/// Shared, ordered record of everything observable in a scenario.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
	pub fn push(&self, entry: impl Into<String>) {
		self.0.lock().push(entry.into());
	}

	pub fn entries(&self) -> Vec<String> {
		self.0.lock().clone()
	}

	pub fn position(&self, entry: &str) -> Option<usize> {
		self.0.lock().iter().position(|e| e == entry)
	}
}

/// Fake endpoint set: options per endpoint, filtered by query substring.
#[derive(Debug, Default)]
pub struct ScriptedSource {
	options: HashMap<String, Vec<OptionItem>>,
	delays: HashMap<String, Duration>,
	failing: HashMap<String, FetchError>,
	calls: Mutex<Vec<OptionRequest>>,
	log: EventLog,
}

impl ScriptedSource {
	pub fn new(log: EventLog) -> Self {
		Self {
			log,
			..Self::default()
		}
	}

	pub fn endpoint(mut self, endpoint: &str, labels: &[&str]) -> Self {
		let options = labels
			.iter()
			.map(|label| OptionItem::new(label.to_lowercase().replace(' ', "-"), *label))
			.collect();
		self.options.insert(endpoint.to_string(), options);
		self
	}

	/// Delays responses to `query` on every endpoint.
	pub fn delay(mut self, query: &str, delay: Duration) -> Self {
		self.delays.insert(query.to_string(), delay);
		self
	}

	pub fn fail(mut self, query: &str, error: FetchError) -> Self {
		self.failing.insert(query.to_string(), error);
		self
	}

	pub fn calls(&self) -> Vec<OptionRequest> {
		self.calls.lock().clone()
	}

	pub fn queries(&self) -> Vec<String> {
		self.calls.lock().iter().map(|request| request.query.clone()).collect()
	}
}

#[async_trait]
impl OptionSource for ScriptedSource {
	async fn fetch(&self, request: &OptionRequest) -> Result<OptionPage, FetchError> {
		self.calls.lock().push(request.clone());
		self.log.push(format!("fetch {} q={:?}", request.endpoint, request.query));
		if let Some(delay) = self.delays.get(&request.query) {
			tokio::time::sleep(*delay).await;
		}
		if let Some(error) = self.failing.get(&request.query) {
			return Err(error.clone());
		}

		let query = request.query.to_lowercase();
		let data: Vec<OptionItem> = self
			.options
			.get(&request.endpoint)
			.into_iter()
			.flatten()
			.filter(|option| option.label.to_lowercase().contains(&query))
			.cloned()
			.collect();
		Ok(OptionPage {
			total: Some(data.len() as u64),
			validator: format!("\"{}:{}\"", request.endpoint, request.query),
			data,
		})
	}
}

/// One browser session: a shared store and cache, one scripted source.
pub struct Session {
	pub store: Arc<MemoryStore>,
	pub clock: Arc<ManualClock>,
	pub cache: Arc<OptionCache>,
	pub source: Arc<ScriptedSource>,
	pub scheduler: SchedulerConfig,
	pub log: EventLog,
}

impl Session {
	pub fn new(source: ScriptedSource, log: EventLog) -> Self {
		Self::with_cache_config(source, log, CacheConfig::default())
	}

	pub fn with_cache_config(source: ScriptedSource, log: EventLog, cache: CacheConfig) -> Self {
		let store = Arc::new(MemoryStore::new());
		let clock = Arc::new(ManualClock::new(1_700_000_000_000));
		let cache = Arc::new(OptionCache::new(store.clone(), clock.clone(), cache));
		Self {
			store,
			clock,
			cache,
			source: Arc::new(source),
			scheduler: SchedulerConfig::default(),
			log,
		}
	}

	/// A field whose value changes are written to the log as `<id>=<value>`.
	pub fn field(&self, spec: FieldSpec) -> FieldController {
		let log = self.log.clone();
		let id = spec.id.clone();
		FieldController::new(spec, &self.scheduler, self.cache.clone(), self.source.clone())
			.on_change(move |value| log.push(format!("{id}={value}")))
	}
}

pub async fn advance(ms: u64) {
	tokio::time::advance(Duration::from_millis(ms)).await;
	for _ in 0..4 {
		tokio::task::yield_now().await;
	}
}
