use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Issues monotonically increasing generations. Clones share one counter.
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	last: Arc<AtomicU64>,
}

impl GenerationClock {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next generation; the first is 1.
	pub fn next(&self) -> u64 {
		self.last.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}

	/// Most recently issued generation, 0 before the first.
	pub fn current(&self) -> u64 {
		self.last.load(Ordering::Acquire)
	}

	/// Starts a new generation with its own cancellation signal.
	pub fn issue(&self) -> GenerationToken {
		GenerationToken::new(self.next(), CancellationToken::new())
	}
}

/// Cancellation signal tagged with the generation it belongs to.
///
/// Work holding a token checks it at every resumption point and stops without
/// side effects once it is cancelled.
#[derive(Debug, Clone)]
pub struct GenerationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl GenerationToken {
	pub fn new(generation: u64, cancel: CancellationToken) -> Self {
		Self { generation, cancel }
	}

	pub const fn generation(&self) -> u64 {
		self.generation
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Resolves once [`Self::cancel`] is called on this token or a clone.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}
}
