//! Page repository
//!
//! Reads go through a [`PageCache`] of the full page set; every successful
//! write clears it. Storage failures are logged here, at the boundary, and
//! returned as [`CmsError::Storage`].

use crate::cache::{DEFAULT_CACHE_TTL, PageCache};
use crate::error::{CmsError, CmsResult};
use crate::pages::{MAIN_PAGE_SLUG, PageId, PageRecord, PageRow, Seo};
use crate::slug::{normalize_slug, validate_slug};
use crate::store::PageStore;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Cached access to page records.
pub struct PageRepository {
	store: Arc<dyn PageStore>,
	cache: PageCache,
}

impl std::fmt::Debug for PageRepository {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PageRepository")
			.field("cache", &self.cache)
			.finish_non_exhaustive()
	}
}

impl PageRepository {
	/// Repository with the default five minute cache.
	pub fn new(store: Arc<dyn PageStore>) -> Self {
		Self::with_cache(store, PageCache::new(DEFAULT_CACHE_TTL))
	}

	/// Repository with an explicit cache (custom clock or window).
	pub fn with_cache(store: Arc<dyn PageStore>, cache: PageCache) -> Self {
		Self { store, cache }
	}

	/// Connect to the configured database, create the pages table and
	/// apply the configured cache window.
	#[cfg(feature = "sql")]
	pub async fn from_settings(settings: &fotobudka_conf::SiteSettings) -> CmsResult<Self> {
		let store = crate::store::SqlPageStore::new(
			&settings.database_url,
			settings.database_max_connections,
		)
		.await
		.inspect_err(|e| tracing::error!("Failed to open page store: {}", e))?;
		store.create_table().await?;

		Ok(Self::with_cache(
			Arc::new(store),
			PageCache::new(settings.pages_cache_ttl),
		))
	}

	/// All pages, main page first, then in creation order.
	///
	/// Served from cache while it is fresh.
	pub async fn load_all(&self) -> CmsResult<Vec<PageRecord>> {
		if let Some(pages) = self.cache.get() {
			tracing::trace!(count = pages.len(), "Serving pages from cache");
			return Ok(pages);
		}

		let generation = self.cache.generation();
		let rows = self.store.select_all().await.inspect_err(|e| {
			tracing::error!("Failed to load pages: {}", e);
		})?;
		let pages: Vec<PageRecord> = rows.into_iter().map(PageRecord::from_row).collect();

		self.cache.populate(&pages, generation);
		tracing::debug!(count = pages.len(), "Loaded pages from storage");
		Ok(pages)
	}

	/// Like [`PageRepository::load_all`], but a storage failure yields an
	/// empty list.
	pub async fn load_all_or_empty(&self) -> Vec<PageRecord> {
		self.load_all().await.unwrap_or_default()
	}

	/// Page with exactly this slug.
	pub async fn get_by_slug(&self, slug: &str) -> CmsResult<Option<PageRecord>> {
		Ok(self
			.load_all()
			.await?
			.into_iter()
			.find(|page| page.slug == slug))
	}

	/// Page with this id.
	pub async fn get_by_id(&self, id: PageId) -> CmsResult<Option<PageRecord>> {
		Ok(self.load_all().await?.into_iter().find(|page| page.id == id))
	}

	/// Replace the stored content of page `id` with `record`.
	///
	/// The record's own `id` is ignored. The main page keeps slug `/` and
	/// no other page may take it.
	pub async fn update(&self, id: PageId, record: PageRecord) -> CmsResult<()> {
		record.validate()?;

		let pages = self.load_all().await?;
		if pages.iter().any(|page| page.id != id && page.slug == record.slug) {
			return Err(CmsError::DuplicateSlug(record.slug));
		}
		let changes_main = pages
			.iter()
			.find(|page| page.id == id)
			.is_some_and(|current| current.is_main() != record.is_main());
		if changes_main {
			return Err(CmsError::validation(
				"slug",
				"only the main page is served at '/'",
			));
		}

		let mut row = PageRow::from_record(&record);
		row.id = id;
		row.updated_at = Some(Utc::now());

		let affected = self.store.update(id, row).await.inspect_err(|e| {
			tracing::error!(page_id = %id, "Failed to update page: {}", e);
		})?;
		if affected == 0 {
			return Err(CmsError::PageNotFound(id.to_string()));
		}

		self.cache.clear();
		tracing::info!(page_id = %id, slug = %record.slug, "Page updated");
		Ok(())
	}

	/// Create a city subpage from the main page's content.
	///
	/// Navigation, videos, welcome copy, stats, gallery, locations and
	/// footer are copied from the main page; SEO starts at its defaults.
	pub async fn add_subpage(&self, name: &str, slug: &str) -> CmsResult<PageRecord> {
		let name = name.trim();
		if name.is_empty() {
			return Err(CmsError::validation("name", "must not be empty"));
		}
		let slug = normalize_slug(slug);
		validate_slug(&slug)?;
		if slug == MAIN_PAGE_SLUG {
			return Err(CmsError::DuplicateSlug(slug));
		}

		let pages = self.load_all().await?;
		if pages.iter().any(|page| page.slug == slug) {
			return Err(CmsError::DuplicateSlug(slug));
		}
		let template = pages
			.iter()
			.find(|page| page.is_main())
			.ok_or(CmsError::MainPageMissing)?;

		let record = PageRecord {
			id: Uuid::new_v4(),
			name: name.to_string(),
			slug,
			seo: Seo::default(),
			..template.clone()
		};
		let inserted = self
			.store
			.insert(PageRow::from_record(&record))
			.await
			.inspect_err(|e| tracing::error!("Failed to add page '{}': {}", record.slug, e))?;

		self.cache.clear();
		tracing::info!(page_id = %record.id, slug = %record.slug, "Subpage created");
		Ok(PageRecord::from_row(inserted))
	}

	/// Seed the main page.
	///
	/// The record's slug is forced to `/`. Fails with
	/// [`CmsError::DuplicateSlug`] when a main page already exists.
	pub async fn create_main_page(&self, mut record: PageRecord) -> CmsResult<PageRecord> {
		record.slug = MAIN_PAGE_SLUG.to_string();
		record.validate()?;

		let pages = self.load_all().await?;
		if pages.iter().any(PageRecord::is_main) {
			return Err(CmsError::DuplicateSlug(record.slug));
		}

		let inserted = self
			.store
			.insert(PageRow::from_record(&record))
			.await
			.inspect_err(|e| tracing::error!("Failed to create main page: {}", e))?;

		self.cache.clear();
		tracing::info!(page_id = %record.id, "Main page created");
		Ok(PageRecord::from_row(inserted))
	}

	/// Delete a subpage. The main page is never deleted.
	pub async fn remove_subpage(&self, id: PageId) -> CmsResult<()> {
		let affected = self
			.store
			.delete_unless_main(id)
			.await
			.inspect_err(|e| tracing::error!(page_id = %id, "Failed to delete page: {}", e))?;

		if affected == 0 {
			let is_main = self
				.store
				.select_all()
				.await
				.inspect_err(|e| {
					tracing::error!(page_id = %id, "Failed to check page after refused delete: {}", e);
				})?
				.iter()
				.any(|row| row.id == id && row.is_main);
			if is_main {
				tracing::warn!(page_id = %id, "Refused to delete the main page");
				return Err(CmsError::MainPageProtected);
			}
			return Err(CmsError::PageNotFound(id.to_string()));
		}

		self.cache.clear();
		tracing::info!(page_id = %id, "Subpage deleted");
		Ok(())
	}

	/// Drop the cached page set.
	pub fn clear_cache(&self) {
		self.cache.clear();
	}
}
