//! # fotobudka-storages
//!
//! File storage for the fotobudka site: a storage backend abstraction with a
//! local file system implementation, and the media library that accepts
//! admin uploads into the public asset tree.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fotobudka_conf::SiteSettings;
//! use fotobudka_storages::{
//! 	IncomingFile, MediaCategory, MediaLibrary, MediaType, StorageConfig, create_storage,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! 	let settings = SiteSettings::from_env()?;
//! 	let storage = create_storage(StorageConfig::from_settings(&settings)).await?;
//! 	let media = MediaLibrary::new(storage).with_max_upload_bytes(settings.max_upload_bytes);
//!
//! 	let bytes = std::fs::read("hero.webm")?;
//! 	let uploaded = media
//! 		.upload(
//! 			Some(IncomingFile::new("hero.webm", &bytes)),
//! 			MediaType::Main,
//! 			MediaCategory::Videos,
//! 		)
//! 		.await?;
//! 	println!("stored at {}", uploaded.path);
//! 	Ok(())
//! }
//! ```

pub mod backend;
pub mod backends;
pub mod config;
pub mod error;
pub mod factory;
pub mod media;

pub use backend::StorageBackend;
pub use config::StorageConfig;
pub use error::{Result, StorageError};
pub use factory::create_storage;
pub use media::{
	ALLOWED_EXTENSIONS, IncomingFile, MediaCategory, MediaFile, MediaLibrary, MediaType,
	UploadedMedia,
};
