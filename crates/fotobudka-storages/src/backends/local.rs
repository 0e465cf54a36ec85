//! Local file system storage backend implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::config::LocalConfig;
use crate::{Result, StorageBackend, StorageError};

/// Local file system storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
	base_path: PathBuf,
}

impl LocalStorage {
	/// Create a new local storage backend.
	///
	/// # Errors
	///
	/// Returns `StorageError::ConfigError` if the base path is missing (and
	/// `create_if_missing` is off) or is not a directory.
	pub fn new(config: LocalConfig) -> Result<Self> {
		let base_path = PathBuf::from(config.base_path);

		if !base_path.exists() {
			if !config.create_if_missing {
				return Err(StorageError::ConfigError(format!(
					"Base path does not exist: {}",
					base_path.display()
				)));
			}
			std::fs::create_dir_all(&base_path)?;
			tracing::info!("Created storage root {}", base_path.display());
		}

		if !base_path.is_dir() {
			return Err(StorageError::ConfigError(format!(
				"Base path is not a directory: {}",
				base_path.display()
			)));
		}

		Ok(Self { base_path })
	}

	/// Root directory of this backend.
	pub fn base_path(&self) -> &Path {
		&self.base_path
	}

	/// Resolve a relative name under the root, refusing anything that
	/// could leave it.
	fn get_path(&self, name: &str) -> Result<PathBuf> {
		let relative = Path::new(name.trim_start_matches('/'));
		for component in relative.components() {
			match component {
				Component::Normal(_) | Component::CurDir => {}
				_ => return Err(StorageError::InvalidPath(name.to_string())),
			}
		}
		Ok(self.base_path.join(relative))
	}
}

#[async_trait]
impl StorageBackend for LocalStorage {
	async fn save(&self, name: &str, content: &[u8]) -> Result<String> {
		let path = self.get_path(name)?;

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).await?;
		}

		fs::write(&path, content).await?;
		tracing::debug!(name, bytes = content.len(), "Saved file");

		Ok(name.to_string())
	}

	async fn open(&self, name: &str) -> Result<Vec<u8>> {
		let path = self.get_path(name)?;

		if !path.is_file() {
			return Err(StorageError::NotFound(name.to_string()));
		}

		let content = fs::read(&path).await?;
		Ok(content)
	}

	async fn delete(&self, name: &str) -> Result<()> {
		let path = self.get_path(name)?;

		if !path.is_file() {
			return Err(StorageError::NotFound(name.to_string()));
		}

		fs::remove_file(&path).await?;
		tracing::debug!(name, "Deleted file");
		Ok(())
	}

	async fn exists(&self, name: &str) -> Result<bool> {
		let path = self.get_path(name)?;
		Ok(path.is_file())
	}

	async fn size(&self, name: &str) -> Result<u64> {
		let path = self.get_path(name)?;

		if !path.exists() {
			return Err(StorageError::NotFound(name.to_string()));
		}

		let metadata = fs::metadata(&path).await?;
		Ok(metadata.len())
	}

	async fn get_modified_time(&self, name: &str) -> Result<DateTime<Utc>> {
		let path = self.get_path(name)?;

		if !path.exists() {
			return Err(StorageError::NotFound(name.to_string()));
		}

		let metadata = fs::metadata(&path).await?;
		let modified = metadata.modified()?;

		let datetime: DateTime<Utc> = modified.into();
		Ok(datetime)
	}

	async fn list(&self, dir: &str) -> Result<Vec<String>> {
		let path = self.get_path(dir)?;

		if !path.is_dir() {
			return Ok(Vec::new());
		}

		let mut names = Vec::new();
		let mut entries = fs::read_dir(&path).await?;
		while let Some(entry) = entries.next_entry().await? {
			if !entry.file_type().await?.is_file() {
				continue;
			}
			if let Some(name) = entry.file_name().to_str() {
				names.push(name.to_string());
			}
		}
		names.sort();
		Ok(names)
	}

	async fn create_dir(&self, dir: &str) -> Result<()> {
		let path = self.get_path(dir)?;
		fs::create_dir_all(&path).await?;
		Ok(())
	}
}
