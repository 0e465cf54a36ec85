//! Storage backend trait definition.

use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage backend trait for file operations under a single root.
///
/// Names are `/`-separated paths relative to the backend root. Backends
/// reject names that would escape the root.
///
/// # Examples
///
/// ```rust,no_run
/// use fotobudka_storages::{StorageBackend, Result};
///
/// async fn example(storage: &dyn StorageBackend) -> Result<()> {
/// 	storage.save("assets/main/images/hero.webp", b"RIFF....WEBP").await?;
///
/// 	if storage.exists("assets/main/images/hero.webp").await? {
/// 		let size = storage.size("assets/main/images/hero.webp").await?;
/// 		println!("File size: {} bytes", size);
/// 	}
///
/// 	Ok(())
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
	/// Save a file, creating parent directories and overwriting any
	/// existing file of the same name.
	///
	/// Returns the name the file was stored under.
	///
	/// # Errors
	///
	/// Returns `StorageError::PermissionDenied` if write access is denied.
	async fn save(&self, name: &str, content: &[u8]) -> Result<String>;

	/// Read a file.
	///
	/// # Errors
	///
	/// Returns `StorageError::NotFound` if the file doesn't exist.
	async fn open(&self, name: &str) -> Result<Vec<u8>>;

	/// Delete a file.
	///
	/// # Errors
	///
	/// Returns `StorageError::NotFound` if the file doesn't exist.
	async fn delete(&self, name: &str) -> Result<()>;

	/// Check if a regular file exists.
	async fn exists(&self, name: &str) -> Result<bool>;

	/// File size in bytes.
	async fn size(&self, name: &str) -> Result<u64>;

	/// Last modified timestamp.
	async fn get_modified_time(&self, name: &str) -> Result<DateTime<Utc>>;

	/// Names of the regular files directly inside `dir`.
	///
	/// A missing directory lists as empty.
	async fn list(&self, dir: &str) -> Result<Vec<String>>;

	/// Create `dir` and any missing parents.
	async fn create_dir(&self, dir: &str) -> Result<()>;
}
