//! # Fotobudka CMS
//!
//! Content core of the OG Events photo-booth site: city landing pages that
//! share one template, the admin editing protocol and the admin session
//! guard.
//!
//! ## Architecture
//!
//! ```text
//! fotobudka-cms
//! ├── pages      - PageRecord model and storage row mapping
//! ├── cache      - Time-bounded cache of the full page set
//! ├── store      - Storage collaborator (in-memory, SQL)
//! ├── repository - Cached reads, write-through updates, subpage lifecycle
//! ├── editor     - Typed nested-field editing of a working copy
//! ├── resolve    - Slug to page resolution for rendering
//! ├── admin      - Admin session guard and identity providers
//! ├── slug       - Slug normalisation
//! └── sitemap    - sitemap.xml generation
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fotobudka_cms::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> CmsResult<()> {
//! let repository = Arc::new(PageRepository::new(Arc::new(InMemoryPageStore::new())));
//! repository.create_main_page(PageRecord::main_page("Fotobudka Chojnice")).await?;
//!
//! let gdansk = repository.add_subpage("Gdańsk", "gdansk").await?;
//! let edited = editor::set_field(&gdansk, PageField::Seo, "Fotobudka Gdańsk".into(), Some("title"))?;
//! repository.update(gdansk.id, edited).await?;
//!
//! let resolver = PageResolver::new(repository);
//! assert!(resolver.resolve("/gdansk").await.is_some());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod admin;
pub mod cache;
pub mod editor;
pub mod pages;
pub mod repository;
pub mod resolve;
pub mod sitemap;
pub mod slug;
pub mod store;

// Prelude for convenient imports
pub mod prelude {
	//! Convenient re-exports of commonly used items

	pub use crate::admin::{
		AdminSession, AdminSessionGuard, CredentialIdentityProvider, GuardDecision,
		IdentityProvider, SessionEvent, SessionState,
	};
	pub use crate::cache::{Clock, ManualClock, PageCache, SystemClock};
	pub use crate::editor::{self, ArrayField, NestedArrayPath, PageEditor, PageField};
	pub use crate::error::{CmsError, CmsResult};
	pub use crate::pages::{PageId, PageRecord, PageRow};
	pub use crate::repository::PageRepository;
	pub use crate::resolve::{PageResolver, PageView, ResolvedPage};
	pub use crate::sitemap::{ChangeFrequency, Priority, Sitemap, SitemapItem};
	pub use crate::store::{InMemoryPageStore, PageStore};

	#[cfg(feature = "sql")]
	pub use crate::store::SqlPageStore;
}

/// CMS error types
pub mod error {
	use thiserror::Error;

	/// CMS-related errors
	#[derive(Error, Debug)]
	pub enum CmsError {
		/// No page with the given id or slug
		#[error("Page not found: {0}")]
		PageNotFound(String),

		/// The main page (`/`) does not exist
		#[error("Main page not found")]
		MainPageMissing,

		/// Attempted to delete the main page
		#[error("The main page cannot be deleted")]
		MainPageProtected,

		/// Another page already uses this slug
		#[error("Slug already in use: {0}")]
		DuplicateSlug(String),

		/// Input rejected before reaching storage
		#[error("Invalid {field}: {message}")]
		Validation {
			/// Offending field
			field: String,
			/// What is wrong with it
			message: String,
		},

		/// Unknown editable path
		#[error("Invalid path: {0}")]
		InvalidPath(String),

		/// An edit produced a record that no longer fits the page schema
		#[error("Invalid value: {0}")]
		InvalidValue(String),

		/// Storage collaborator failure
		#[error("Storage error: {0}")]
		Storage(String),

		/// Wrong admin login or password
		#[error("Invalid login or password")]
		InvalidCredentials,

		/// Missing or inconsistent configuration
		#[error("Configuration error: {0}")]
		Configuration(String),

		/// JSON encoding or decoding failure
		#[error("Serialization error: {0}")]
		Serialization(#[from] serde_json::Error),
	}

	impl CmsError {
		/// Shorthand for [`CmsError::Validation`].
		pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
			CmsError::Validation {
				field: field.into(),
				message: message.into(),
			}
		}

		/// Neutral text suitable for showing to an admin user.
		pub fn user_message(&self) -> &'static str {
			match self {
				CmsError::PageNotFound(_) => "The page no longer exists.",
				CmsError::MainPageMissing => "The main page is missing.",
				CmsError::MainPageProtected => "The main page cannot be deleted.",
				CmsError::DuplicateSlug(_) => "A page with this address already exists.",
				CmsError::Validation { .. } | CmsError::InvalidPath(_) | CmsError::InvalidValue(_) => {
					"Some of the entered values are invalid."
				}
				CmsError::InvalidCredentials => "Invalid login or password.",
				CmsError::Storage(_) | CmsError::Configuration(_) | CmsError::Serialization(_) => {
					"Could not save changes. Please try again."
				}
			}
		}
	}

	/// Result type for CMS operations
	pub type CmsResult<T> = Result<T, CmsError>;
}
