//! Error types for storage and media operations.

use thiserror::Error;

/// Errors produced by storage backends and the media library.
#[derive(Debug, Error)]
pub enum StorageError {
	/// File does not exist.
	#[error("File not found: {0}")]
	NotFound(String),

	/// Backend refused access.
	#[error("Permission denied: {0}")]
	PermissionDenied(String),

	/// Backend misconfiguration.
	#[error("Configuration error: {0}")]
	ConfigError(String),

	/// Path escapes the storage root or is otherwise unusable.
	#[error("Invalid path: {0}")]
	InvalidPath(String),

	/// Upload request carried no file.
	#[error("No file uploaded")]
	MissingFile,

	/// Upload has an extension other than `.webp` / `.webm`.
	#[error("Only .webp and .webm files are allowed (got '{0}')")]
	InvalidExtension(String),

	/// Upload exceeds the configured size limit.
	#[error("File too large: {size} bytes exceeds the {limit} byte limit")]
	FileTooLarge {
		/// Size of the rejected upload.
		size: u64,
		/// Configured limit.
		limit: u64,
	},

	/// Unknown media type or category.
	#[error("Invalid media parameter: {0}")]
	InvalidMediaParameter(String),

	/// Any other I/O failure.
	#[error("I/O error: {0}")]
	IoError(std::io::Error),
}

impl From<std::io::Error> for StorageError {
	fn from(err: std::io::Error) -> Self {
		match err.kind() {
			std::io::ErrorKind::NotFound => StorageError::NotFound(err.to_string()),
			std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(err.to_string()),
			_ => StorageError::IoError(err),
		}
	}
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
