//! Environment variable handling
//!
//! Typed lookups with an optional key prefix and per-call defaults.

use crate::error::{ConfError, ConfResult};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable reader with prefix support
#[derive(Debug, Clone, Default)]
pub struct Env {
	/// Optional prefix for environment variables (e.g., "FOTOBUDKA_")
	pub prefix: Option<String>,
}

impl Env {
	/// Create a reader without a prefix
	pub fn new() -> Self {
		Self { prefix: None }
	}

	/// Set a prefix for all lookups
	///
	/// # Examples
	///
	/// ```
	/// use fotobudka_conf::Env;
	///
	/// let env = Env::new().with_prefix("FOTOBUDKA_");
	/// assert_eq!(env.prefix.as_deref(), Some("FOTOBUDKA_"));
	/// ```
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	/// Load a `.env` file from the current directory or its parents.
	///
	/// A missing file is not an error; variables already present in the
	/// process environment win over the file.
	pub fn load_dotenv(&self) {
		match dotenv::dotenv() {
			Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
			Err(e) if e.not_found() => tracing::debug!("No .env file found"),
			Err(e) => tracing::warn!("Failed to load .env file: {}", e),
		}
	}

	fn key_name(&self, key: &str) -> String {
		match &self.prefix {
			Some(prefix) => format!("{}{}", prefix, key),
			None => key.to_string(),
		}
	}

	fn raw(&self, key: &str) -> ConfResult<(String, Option<String>)> {
		let full_key = self.key_name(key);
		validate_env_var_name(&full_key)?;
		let value = env::var(&full_key).ok();
		Ok((full_key, value))
	}

	/// Read a string value
	pub fn str(&self, key: &str) -> ConfResult<String> {
		self.str_with_default(key, None)
	}

	/// Read a string value with a default
	pub fn str_with_default(&self, key: &str, default: Option<&str>) -> ConfResult<String> {
		match self.raw(key)? {
			(_, Some(value)) => Ok(value),
			(full_key, None) => default
				.map(str::to_string)
				.ok_or(ConfError::MissingVariable(full_key)),
		}
	}

	/// Read an optional string value; empty strings count as unset
	pub fn optional_str(&self, key: &str) -> ConfResult<Option<String>> {
		let (_, value) = self.raw(key)?;
		Ok(value.filter(|v| !v.trim().is_empty()))
	}

	/// Read and parse a value with a default
	///
	/// # Examples
	///
	/// ```
	/// use fotobudka_conf::Env;
	///
	/// let env = Env::new().with_prefix("FOTOBUDKA_DOCTEST_UNSET_");
	/// let port: u16 = env.parse_with_default("PORT", 3001).unwrap();
	/// assert_eq!(port, 3001);
	/// ```
	pub fn parse_with_default<T>(&self, key: &str, default: T) -> ConfResult<T>
	where
		T: FromStr,
		T::Err: std::fmt::Display,
	{
		match self.raw(key)? {
			(full_key, Some(value)) => {
				value
					.trim()
					.parse::<T>()
					.map_err(|e| ConfError::ParseError {
						key: full_key,
						value_len: value.len(),
						error: e.to_string(),
					})
			}
			(_, None) => Ok(default),
		}
	}

	/// Read a path value with a default
	pub fn path_with_default(&self, key: &str, default: &str) -> ConfResult<PathBuf> {
		self.str_with_default(key, Some(default)).map(PathBuf::from)
	}
}

/// Validate an environment variable name before lookup.
///
/// `std::env::var` panics on names containing `=` or NUL, so those are
/// rejected up front.
pub fn validate_env_var_name(name: &str) -> ConfResult<()> {
	if name.is_empty() {
		return Err(ConfError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not be empty".to_string(),
		});
	}

	if let Some(pos) = name.find(|c: char| c.is_control()) {
		return Err(ConfError::InvalidVariableName {
			name: name.to_string(),
			reason: format!(
				"environment variable name contains control character at position {}",
				pos
			),
		});
	}

	if name.contains('=') {
		return Err(ConfError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not contain '='".to_string(),
		});
	}

	Ok(())
}
