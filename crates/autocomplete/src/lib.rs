//! Cascading autocomplete engine.
//!
//! A field is a search-and-select control backed by a remote option endpoint.
//! [`FieldController`] owns one field: it debounces input through a
//! [`FetchScheduler`], serves repeat queries from the shared [`OptionCache`],
//! ranks locally held options with [`ranking::combined_search`] and tracks
//! selection, validation and keyboard state as a pure [`FieldState`] machine.
//!
//! [`CascadeCoordinator`] links fields whose requests are filtered by another
//! field's selected value. When a parent's value changes, every descendant is
//! reset before any of them starts a new fetch.

mod cache;
mod cascade;
mod clock;
mod config;
mod error;
mod field;
mod option;
pub mod ranking;
mod scheduler;
mod source;

pub use cache::{CacheEntry, CacheKey, CacheStats, KeyValueStore, MemoryStore, OptionCache};
pub use cascade::CascadeCoordinator;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AutocompleteConfig, CacheConfig, SchedulerConfig};
pub use error::{CascadeError, ConfigError, FetchError, StorageError};
pub use field::{
	FieldController, FieldEvent, FieldMode, FieldNotice, FieldSpec, FieldState, FieldView, Key, KeyDisposition, OptionView,
	ParentBinding, ValidateFn,
};
pub use option::{FieldId, FilterValue, OptionItem, ParentFilterMap};
pub use scheduler::{FetchEvent, FetchHandle, FetchOutcome, FetchPhase, FetchScheduler, LoadOrigin};
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{Freshness, OptionPage, OptionRequest, OptionSource};
