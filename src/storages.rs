//! Storage backends and the media library.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fotobudka::storages::{MediaLibrary, StorageConfig, create_storage};
//!
//! # async fn example() -> fotobudka::storages::Result<()> {
//! let backend = create_storage(StorageConfig::local("public")).await?;
//! MediaLibrary::new(backend).ensure_directories().await?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "storages")]
pub use fotobudka_storages::*;
