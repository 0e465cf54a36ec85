//! Configuration error types.

use thiserror::Error;

/// Errors raised while reading settings.
#[derive(Debug, Error)]
pub enum ConfError {
	/// Required variable is not set.
	#[error("Missing environment variable: {0}")]
	MissingVariable(String),

	/// Variable name is unusable (empty, contains `=` or control characters).
	#[error("Invalid environment variable name '{name}': {reason}")]
	InvalidVariableName {
		/// Offending name.
		name: String,
		/// Why the name was rejected.
		reason: String,
	},

	/// Variable is set but its value cannot be parsed.
	///
	/// Only the length of the value is kept so secrets never end up in logs.
	#[error("Failed to parse {key} (value length {value_len}): {error}")]
	ParseError {
		/// Variable name.
		key: String,
		/// Length of the rejected value.
		value_len: usize,
		/// Parser message.
		error: String,
	},

	/// Settings are individually valid but inconsistent.
	#[error("Invalid settings: {0}")]
	Invalid(String),
}

/// Result type for configuration operations.
pub type ConfResult<T> = Result<T, ConfError>;
