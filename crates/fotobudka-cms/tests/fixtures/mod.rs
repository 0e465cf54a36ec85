//! Shared fixtures for CMS tests.

#![allow(dead_code)]

use fotobudka_cms::cache::{ManualClock, PageCache};
use fotobudka_cms::pages::{GalleryImage, PageRecord, PageRow, VideoItem};
use fotobudka_cms::repository::PageRepository;
use fotobudka_cms::store::InMemoryPageStore;
use rstest::fixture;
use std::sync::Arc;
use std::time::Duration;

/// Cache window used by the fixtures.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Main page with every section filled in.
pub fn main_page_record() -> PageRecord {
	let mut page = PageRecord::main_page("Fotobudka Chojnice");
	page.seo.title = "Fotobudka Chojnice | OG Events".to_string();
	page.seo.description = "Fotobudka na wesela i imprezy".to_string();
	page.navigation.facebook_url = "https://facebook.com/ogevents".to_string();
	page.videos = vec![VideoItem {
		src: "/assets/main/videos/hero.webm".to_string(),
		alt: "Fotobudka w akcji".to_string(),
		start_time: Some(2.5),
	}];
	page.welcome_section.welcome_text = "Witaj".to_string();
	page.stats.clients_count = "500+".to_string();
	page.gallery.images = vec![
		GalleryImage {
			src: "/assets/main/images/a.webp".to_string(),
			alt: "A".to_string(),
		},
		GalleryImage {
			src: "/assets/main/images/b.webp".to_string(),
			alt: "B".to_string(),
		},
	];
	page.locations.cities = vec!["Chojnice".to_string(), "Gdańsk".to_string()];
	page.footer.phone_number = "+48 500 600 700".to_string();
	page
}

/// In-memory site with a manual clock driving the page cache.
pub struct TestSite {
	pub store: Arc<InMemoryPageStore>,
	pub clock: Arc<ManualClock>,
	pub repository: Arc<PageRepository>,
	pub main: PageRecord,
}

impl TestSite {
	/// Site holding only `main`.
	pub fn with_main(main: PageRecord) -> Self {
		let store = Arc::new(InMemoryPageStore::with_rows([PageRow::from_record(&main)]));
		Self::over(store, Some(main))
	}

	/// Site holding `main` followed by `subpages`, in that creation order.
	pub fn with_pages(main: PageRecord, subpages: &[PageRecord]) -> Self {
		let rows = std::iter::once(&main)
			.chain(subpages)
			.map(PageRow::from_record)
			.collect::<Vec<_>>();
		let store = Arc::new(InMemoryPageStore::with_rows(rows));
		Self::over(store, Some(main))
	}

	/// Site with no pages at all.
	pub fn empty() -> Self {
		Self::over(Arc::new(InMemoryPageStore::new()), None)
	}

	fn over(store: Arc<InMemoryPageStore>, main: Option<PageRecord>) -> Self {
		let clock = Arc::new(ManualClock::new());
		let cache = PageCache::with_clock(CACHE_TTL, clock.clone());
		let repository = Arc::new(PageRepository::with_cache(store.clone(), cache));
		Self {
			store,
			clock,
			repository,
			main: main.unwrap_or_else(main_page_record),
		}
	}
}

/// Site seeded with [`main_page_record`].
#[fixture]
pub fn site() -> TestSite {
	TestSite::with_main(main_page_record())
}

/// Main page plus two city subpages.
#[fixture]
pub fn three_page_site() -> TestSite {
	let main = main_page_record();
	let subpages = [
		PageRecord::new("Gdańsk", "/gdansk"),
		PageRecord::new("Sopot", "/sopot"),
	];
	TestSite::with_pages(main, &subpages)
}

/// Site without a main page.
#[fixture]
pub fn empty_site() -> TestSite {
	TestSite::empty()
}
