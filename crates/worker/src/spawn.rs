use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::TaskClass;

/// Runtime used when a task is spawned from plain synchronous code.
fn fallback_runtime() -> &'static Runtime {
	static FALLBACK: OnceLock<Runtime> = OnceLock::new();
	FALLBACK.get_or_init(|| {
		Builder::new_multi_thread()
			.worker_threads(2)
			.thread_name("cascade-worker")
			.enable_all()
			.build()
			.expect("cascade-worker: building the fallback runtime failed")
	})
}

/// Spawns `fut` on the caller's runtime, or on a shared fallback runtime when
/// called outside of one.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = %class, "worker.spawn");
	match Handle::try_current() {
		Ok(handle) => handle.spawn(fut),
		Err(_) => fallback_runtime().spawn(fut),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test(flavor = "current_thread")]
	async fn runs_on_the_ambient_runtime() {
		let handle = spawn(TaskClass::Interactive, async { 7 });
		assert_eq!(handle.await.ok(), Some(7));
	}

	#[test]
	fn falls_back_outside_a_runtime() {
		let (tx, rx) = std::sync::mpsc::channel();
		spawn(TaskClass::Background, async move {
			let _ = tx.send(std::thread::current().name().map(str::to_owned));
		});
		assert_eq!(rx.recv().ok().flatten().as_deref(), Some("cascade-worker"));
	}

	#[test]
	fn class_names() {
		assert_eq!(TaskClass::Interactive.to_string(), "interactive");
		assert_eq!(TaskClass::Background.name(), "background");
	}
}
