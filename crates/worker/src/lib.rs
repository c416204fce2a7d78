//! Worker primitives shared by the autocomplete engine.
//!
//! * [`spawn`] runs a future on the ambient tokio runtime, falling back to a
//!   small global runtime when called outside one.
//! * [`GenerationClock`] and [`GenerationToken`] give each scheduled attempt a
//!   monotonic generation and a cooperative cancellation signal, so completion
//!   handlers can tell whether their result has been superseded.

mod class;
mod spawn;
mod token;

pub use class::TaskClass;
pub use spawn::spawn;
pub use token::{GenerationClock, GenerationToken};
