use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Wall-clock source for cache timestamps, in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync + fmt::Debug {
	fn now_ms(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now_ms(&self) -> i64 {
		chrono::Utc::now().timestamp_millis()
	}
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
	now: AtomicI64,
}

impl ManualClock {
	pub fn new(start_ms: i64) -> Self {
		Self {
			now: AtomicI64::new(start_ms),
		}
	}

	pub fn set(&self, now_ms: i64) {
		self.now.store(now_ms, Ordering::Release);
	}

	pub fn advance(&self, by: Duration) {
		let by = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
		self.now.fetch_add(by, Ordering::AcqRel);
	}
}

impl Clock for ManualClock {
	fn now_ms(&self) -> i64 {
		self.now.load(Ordering::Acquire)
	}
}
