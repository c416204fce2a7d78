//! Error types for fetching, storage, configuration and cascade wiring.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::option::FieldId;

/// A failed option request. Cancellation is never reported as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
	/// The endpoint answered with a non-success status.
	#[error("request failed with status {status}")]
	Status {
		/// HTTP status code.
		status: u16,
	},

	/// The request never produced a response.
	#[error("transport error: {0}")]
	Transport(String),

	/// The response body was not an option page.
	#[error("invalid response body: {0}")]
	Decode(String),

	/// The endpoint did not respond within the configured bound.
	#[error("request timed out after {0:?}")]
	Timeout(Duration),

	/// The endpoint and query could not be turned into a URL.
	#[error("invalid endpoint {endpoint}: {reason}")]
	InvalidEndpoint {
		/// Endpoint as configured on the field.
		endpoint: String,
		/// Parser message.
		reason: String,
	},
}

/// Failures of a [`KeyValueStore`](crate::KeyValueStore) write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
	#[error("storage quota exceeded: {needed} bytes needed, {available} available")]
	QuotaExceeded { needed: usize, available: usize },

	#[error("storage backend error: {0}")]
	Backend(String),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A value parsed but is out of range.
	#[error("invalid configuration: {0}")]
	Invalid(String),
}

/// Errors raised while wiring or driving a cascade of fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CascadeError {
	#[error("unknown field: {0}")]
	UnknownField(FieldId),

	#[error("field already registered: {0}")]
	DuplicateField(FieldId),

	#[error("field {field} depends on unregistered parent {parent}")]
	UnknownParent { field: FieldId, parent: FieldId },

	#[error("field {0} depends on itself")]
	Cycle(FieldId),
}
