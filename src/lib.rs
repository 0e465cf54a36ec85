//! # Fotobudka
//!
//! Content core of the OG Events photo-booth website: city landing pages that
//! share one template, the admin editing protocol, media uploads and the
//! sitemap.
//!
//! ## Feature Flags
//!
//! - `cms` - Pages, editor, resolution, admin session guard
//! - `sql` - SQL-backed page store (SQLite or PostgreSQL through sqlx)
//! - `storages` - Media library over a storage backend
//! - `conf` - Environment-driven site settings
//! - `full` (default) - Everything above
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use fotobudka::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = SiteSettings::from_env()?;
//! let repository = Arc::new(PageRepository::from_settings(&settings).await?);
//!
//! let resolver = PageResolver::new(repository.clone())
//! 	.with_default_title(settings.default_seo_title.clone());
//! match resolver.view("/gdansk").await {
//! 	PageView::Ready(page) => println!("{}", page.effective_title()),
//! 	PageView::NotFound => println!("404"),
//! 	PageView::Loading => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "cms")]
pub mod cms;
#[cfg(feature = "conf")]
pub mod conf;
#[cfg(feature = "storages")]
pub mod storages;

/// Commonly used items from every enabled crate.
pub mod prelude {
	#[cfg(feature = "cms")]
	pub use fotobudka_cms::prelude::*;

	#[cfg(feature = "conf")]
	pub use fotobudka_conf::{ConfError, ConfResult, SiteSettings};

	#[cfg(feature = "storages")]
	pub use fotobudka_storages::{
		IncomingFile, MediaCategory, MediaFile, MediaLibrary, MediaType, StorageBackend,
		StorageConfig, StorageError, UploadedMedia, create_storage,
	};
}
