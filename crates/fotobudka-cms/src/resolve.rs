//! Page resolution for rendering
//!
//! Maps a request path to the page that should be rendered. Resolution is
//! fail-soft: a storage failure is logged and the page is treated as
//! absent, so the site shows its not-found view instead of an error.

use crate::pages::PageRecord;
use crate::repository::PageRepository;
use fotobudka_conf::DEFAULT_SEO_TITLE;
use std::sync::Arc;

/// A page ready for rendering, with SEO fallbacks applied on read.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPage {
	record: PageRecord,
	default_title: String,
}

impl ResolvedPage {
	/// Wrap a record using the site-wide default title.
	pub fn new(record: PageRecord) -> Self {
		Self::with_default_title(record, DEFAULT_SEO_TITLE)
	}

	/// Wrap a record with a specific fallback title.
	pub fn with_default_title(record: PageRecord, default_title: impl Into<String>) -> Self {
		Self {
			record,
			default_title: default_title.into(),
		}
	}

	/// Underlying record.
	pub fn record(&self) -> &PageRecord {
		&self.record
	}

	/// Take the underlying record.
	pub fn into_record(self) -> PageRecord {
		self.record
	}

	/// `<title>` to render: the page's own, or the default when blank.
	pub fn effective_title(&self) -> &str {
		let title = self.record.seo.title.trim();
		if title.is_empty() {
			&self.default_title
		} else {
			&self.record.seo.title
		}
	}

	/// Meta description to render; empty when the page has none.
	pub fn effective_description(&self) -> &str {
		&self.record.seo.description
	}

	/// True for the page served at `/`.
	pub fn is_main(&self) -> bool {
		self.record.is_main()
	}
}

/// What the page view should show.
#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
	/// Resolution still in progress
	Loading,
	/// No page for this path
	NotFound,
	/// Page found
	Ready(ResolvedPage),
}

impl PageView {
	/// View for a finished resolution.
	pub fn from_resolution(page: Option<PageRecord>) -> Self {
		match page {
			Some(record) => PageView::Ready(ResolvedPage::new(record)),
			None => PageView::NotFound,
		}
	}

	/// True while resolution has not finished.
	pub fn is_loading(&self) -> bool {
		matches!(self, PageView::Loading)
	}
}

/// Resolves request paths against the repository.
#[derive(Debug, Clone)]
pub struct PageResolver {
	repository: Arc<PageRepository>,
	default_title: String,
}

impl PageResolver {
	/// Resolver with the site-wide default title.
	pub fn new(repository: Arc<PageRepository>) -> Self {
		Self {
			repository,
			default_title: DEFAULT_SEO_TITLE.to_string(),
		}
	}

	/// Override the fallback title (from settings).
	pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
		self.default_title = title.into();
		self
	}

	/// Page for `slug`, or `None` when absent or storage failed.
	pub async fn resolve(&self, slug: &str) -> Option<PageRecord> {
		match self.repository.get_by_slug(slug).await {
			Ok(page) => {
				if page.is_none() {
					tracing::debug!(slug, "No page for slug");
				}
				page
			}
			Err(e) => {
				tracing::warn!(slug, error = %e, "Page resolution failed, treating as absent");
				None
			}
		}
	}

	/// Resolve `slug` straight into a view.
	pub async fn view(&self, slug: &str) -> PageView {
		match self.resolve(slug).await {
			Some(record) => {
				PageView::Ready(ResolvedPage::with_default_title(record, &self.default_title))
			}
			None => PageView::NotFound,
		}
	}

	/// Slugs of every page, main page first.
	pub async fn routes(&self) -> Vec<String> {
		self.repository
			.load_all_or_empty()
			.await
			.into_iter()
			.map(|page| page.slug)
			.collect()
	}
}
