//! Shared fixtures for storage and media tests.

#![allow(dead_code)]

use fotobudka_storages::config::LocalConfig;
use fotobudka_storages::{MediaLibrary, StorageBackend, StorageConfig, create_storage};
use rstest::fixture;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Temporary public root with a local backend over it.
pub struct LocalTestDir {
	temp_dir: TempDir,
	backend: Arc<dyn StorageBackend>,
}

impl LocalTestDir {
	/// Create a new temp dir and a backend rooted at it.
	pub async fn new() -> Self {
		let temp_dir = TempDir::new().expect("Failed to create temp dir");
		let base_path = temp_dir.path().to_str().unwrap().to_string();

		let backend = create_storage(StorageConfig::Local(LocalConfig::new(base_path)))
			.await
			.expect("Failed to create local backend");

		Self { temp_dir, backend }
	}

	/// Get the storage backend.
	pub fn backend(&self) -> Arc<dyn StorageBackend> {
		Arc::clone(&self.backend)
	}

	/// Media library over the backend.
	pub fn media(&self) -> MediaLibrary {
		MediaLibrary::new(self.backend())
	}

	/// Get the temp directory path.
	pub fn path(&self) -> &Path {
		self.temp_dir.path()
	}
}

/// Local test directory fixture.
#[fixture]
pub async fn local_temp_dir() -> LocalTestDir {
	LocalTestDir::new().await
}

/// Fake `.webp` payload.
#[fixture]
pub fn webp_bytes() -> Vec<u8> {
	let mut bytes = b"RIFF\x24\x00\x00\x00WEBPVP8 ".to_vec();
	bytes.extend(std::iter::repeat_n(0u8, 32));
	bytes
}

/// Fake `.webm` payload.
#[fixture]
pub fn webm_bytes() -> Vec<u8> {
	let mut bytes = vec![0x1a, 0x45, 0xdf, 0xa3];
	bytes.extend(std::iter::repeat_n(0x42u8, 128));
	bytes
}
