//! Per-field fetch scheduling with debounce, cache short-circuit and
//! last-call-wins cancellation.
//!
//! Each [`FetchScheduler::schedule`] call starts a new attempt under a fresh
//! generation and cancels the previous one. The attempt runs as a worker task
//! that reports progress as [`FetchOutcome`]s on the scheduler's channel; a
//! cancelled attempt stops reporting at its next resumption point, and
//! receivers additionally drop outcomes whose generation is not current.

use std::sync::Arc;
use std::time::Duration;

use cascade_worker::{GenerationClock, GenerationToken, TaskClass};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until, timeout};
use tracing::{debug, warn};

use crate::cache::OptionCache;
use crate::config::SchedulerConfig;
use crate::error::FetchError;
use crate::option::{FieldId, OptionItem};
use crate::source::{OptionRequest, OptionSource};

/// Lifecycle of one scheduled attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
	Idle,
	/// Waiting out the debounce delay.
	Pending,
	/// Consulting the cache or waiting on the network.
	InFlight,
	Settled,
	Cancelled,
}

/// Where a set of loaded options came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
	Cache,
	Network,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent {
	/// A network request is about to be sent.
	Started,
	Loaded {
		options: Vec<OptionItem>,
		total: Option<u64>,
		origin: LoadOrigin,
	},
	Failed(FetchError),
	/// Terminal event of an attempt that was not cancelled.
	Settled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
	pub field: FieldId,
	pub generation: u64,
	pub query: String,
	pub event: FetchEvent,
}

/// Cancellation handle for one scheduled attempt.
#[derive(Debug, Clone)]
pub struct FetchHandle {
	token: GenerationToken,
	phase: Arc<Mutex<FetchPhase>>,
}

impl FetchHandle {
	fn new(token: GenerationToken) -> Self {
		Self {
			token,
			phase: Arc::new(Mutex::new(FetchPhase::Pending)),
		}
	}

	pub fn generation(&self) -> u64 {
		self.token.generation()
	}

	pub fn phase(&self) -> FetchPhase {
		*self.phase.lock()
	}

	pub fn is_cancelled(&self) -> bool {
		self.token.is_cancelled()
	}

	/// Cancels the attempt. A settled attempt keeps its phase.
	pub fn cancel(&self) {
		{
			let mut phase = self.phase.lock();
			if *phase != FetchPhase::Settled {
				*phase = FetchPhase::Cancelled;
			}
		}
		self.token.cancel();
	}

	/// Moves to `next` unless the attempt was cancelled.
	fn advance(&self, next: FetchPhase) -> bool {
		let mut phase = self.phase.lock();
		if *phase == FetchPhase::Cancelled || self.token.is_cancelled() {
			return false;
		}
		*phase = next;
		true
	}
}

pub struct FetchScheduler {
	field: FieldId,
	config: SchedulerConfig,
	cache: Arc<OptionCache>,
	source: Arc<dyn OptionSource>,
	clock: GenerationClock,
	current: Option<FetchHandle>,
	outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
}

impl FetchScheduler {
	pub fn new(
		field: FieldId,
		config: SchedulerConfig,
		cache: Arc<OptionCache>,
		source: Arc<dyn OptionSource>,
	) -> (Self, mpsc::UnboundedReceiver<FetchOutcome>) {
		let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
		let scheduler = Self {
			field,
			config,
			cache,
			source,
			clock: GenerationClock::new(),
			current: None,
			outcome_tx,
		};
		(scheduler, outcome_rx)
	}

	/// Debounced fetch for typed input.
	///
	/// Always cancels the previous attempt. Returns `None` without scheduling
	/// when the query is shorter than `min_chars`.
	pub fn schedule(&mut self, request: OptionRequest) -> Option<FetchHandle> {
		self.cancel();
		let len = request.query.chars().count();
		if len < self.config.min_chars {
			debug!(field = %self.field, len, min_chars = self.config.min_chars, "query below minimum length");
			return None;
		}
		Some(self.start(request, self.config.debounce(), TaskClass::Interactive))
	}

	/// Immediate fetch that ignores the debounce and minimum length, used to
	/// load a prefetched field's full option set.
	pub fn prefetch(&mut self, request: OptionRequest) -> FetchHandle {
		self.cancel();
		self.start(request, Duration::ZERO, TaskClass::Background)
	}

	pub fn cancel(&mut self) {
		if let Some(handle) = self.current.take() {
			if handle.phase() != FetchPhase::Settled {
				debug!(field = %self.field, generation = handle.generation(), "fetch cancelled");
			}
			handle.cancel();
		}
	}

	pub fn current(&self) -> Option<&FetchHandle> {
		self.current.as_ref()
	}

	pub fn phase(&self) -> FetchPhase {
		self.current.as_ref().map_or(FetchPhase::Idle, FetchHandle::phase)
	}

	/// Most recently issued generation, 0 before the first attempt.
	pub fn generation(&self) -> u64 {
		self.clock.current()
	}

	fn start(&mut self, request: OptionRequest, debounce: Duration, class: TaskClass) -> FetchHandle {
		let handle = FetchHandle::new(self.clock.issue());
		debug!(
			field = %self.field,
			generation = handle.generation(),
			query = %request.query,
			"fetch scheduled"
		);

		let attempt = Attempt {
			field: self.field.clone(),
			request,
			debounce_until: (!debounce.is_zero()).then(|| Instant::now() + debounce),
			request_timeout: self.config.request_timeout(),
			revalidate_on_hit: self.config.revalidate_on_hit,
			cache: Arc::clone(&self.cache),
			source: Arc::clone(&self.source),
			handle: handle.clone(),
			outcome_tx: self.outcome_tx.clone(),
		};
		cascade_worker::spawn(class, attempt.run());

		self.current = Some(handle.clone());
		handle
	}
}

impl Drop for FetchScheduler {
	fn drop(&mut self) {
		self.cancel();
	}
}

struct Attempt {
	field: FieldId,
	request: OptionRequest,
	/// Armed when the attempt is scheduled, not when the task first runs.
	debounce_until: Option<Instant>,
	request_timeout: Duration,
	revalidate_on_hit: bool,
	cache: Arc<OptionCache>,
	source: Arc<dyn OptionSource>,
	handle: FetchHandle,
	outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
}

impl Attempt {
	async fn run(self) {
		let token = self.handle.token.clone();
		if let Some(deadline) = self.debounce_until {
			tokio::select! {
				_ = token.cancelled() => return,
				_ = sleep_until(deadline) => {}
			}
		}
		if !self.handle.advance(FetchPhase::InFlight) {
			return;
		}

		let key = self.request.cache_key();
		if let Some(entry) = self.cache.get(&key) {
			debug!(field = %self.field, generation = token.generation(), "serving options from cache");
			self.emit(FetchEvent::Loaded {
				options: entry.data,
				total: entry.total,
				origin: LoadOrigin::Cache,
			});
			if !self.revalidate_on_hit {
				self.settle();
				return;
			}

			let fresh = tokio::select! {
				_ = token.cancelled() => return,
				fresh = self.cache.validate(self.source.as_ref(), &self.request, &entry.validator) => fresh,
			};
			if fresh {
				self.settle();
				return;
			}
			debug!(field = %self.field, generation = token.generation(), "cached options are stale, refetching");
		}

		self.emit(FetchEvent::Started);
		let result = tokio::select! {
			_ = token.cancelled() => return,
			result = timeout(self.request_timeout, self.source.fetch(&self.request)) => {
				result.unwrap_or(Err(FetchError::Timeout(self.request_timeout)))
			}
		};
		if token.is_cancelled() {
			return;
		}

		match result {
			Ok(page) => {
				debug!(
					field = %self.field,
					generation = token.generation(),
					count = page.data.len(),
					"options fetched"
				);
				self.cache.put(&key, page.data.clone(), page.validator, page.total);
				self.emit(FetchEvent::Loaded {
					options: page.data,
					total: page.total,
					origin: LoadOrigin::Network,
				});
			}
			Err(error) => {
				warn!(field = %self.field, generation = token.generation(), %error, "option fetch failed");
				self.emit(FetchEvent::Failed(error));
			}
		}
		self.settle();
	}

	fn emit(&self, event: FetchEvent) {
		let _ = self.outcome_tx.send(FetchOutcome {
			field: self.field.clone(),
			generation: self.handle.generation(),
			query: self.request.query.clone(),
			event,
		});
	}

	fn settle(&self) {
		if self.handle.advance(FetchPhase::Settled) {
			self.emit(FetchEvent::Settled);
		}
	}
}
