//! Integration tests for the page repository.

mod fixtures;

use async_trait::async_trait;
use fixtures::{TestSite, empty_site, site, three_page_site};
use fotobudka_cms::error::{CmsError, CmsResult};
use fotobudka_cms::pages::{GalleryImage, PageId, PageRecord, PageRow};
use fotobudka_cms::repository::PageRepository;
use fotobudka_cms::store::PageStore;
use fotobudka_conf::DEFAULT_SEO_TITLE;
use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

mod cache_tests {
	use super::*;

	#[rstest]
	#[tokio::test]
	async fn test_reads_within_window_hit_cache(three_page_site: TestSite) {
		// Arrange
		let site = three_page_site;
		let first = site.repository.load_all().await.unwrap();

		// Act
		site.clock.advance(Duration::from_secs(4 * 60));
		let pages = site.repository.load_all().await.unwrap();

		// Assert
		assert_eq!(first.len(), 3);
		assert_eq!(pages.len(), 3);
		assert_eq!(pages, first);
		assert_eq!(site.store.select_calls(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_reads_after_window_refetch(three_page_site: TestSite) {
		// Arrange
		let site = three_page_site;
		site.repository.load_all().await.unwrap();

		// Act
		site.clock.advance(Duration::from_secs(6 * 60));
		let pages = site.repository.load_all().await.unwrap();

		// Assert
		assert_eq!(pages.len(), 3);
		assert_eq!(site.store.select_calls(), 2);
		let slugs: Vec<&str> = pages.iter().map(|page| page.slug.as_str()).collect();
		assert_eq!(slugs, ["/", "/gdansk", "/sopot"]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_write_clears_cache(site: TestSite) {
		// Arrange
		site.repository.load_all().await.unwrap();
		let mut edited = site.main.clone();
		edited.seo.title = "Nowy tytuł".to_string();

		// Act
		site.repository.update(site.main.id, edited).await.unwrap();
		let main = site
			.repository
			.get_by_slug("/")
			.await
			.unwrap()
			.expect("main page");

		// Assert
		assert_eq!(main.seo.title, "Nowy tytuł");
		assert_eq!(site.store.select_calls(), 2);
	}

	#[rstest]
	#[tokio::test]
	async fn test_explicit_clear_forces_refetch(site: TestSite) {
		site.repository.load_all().await.unwrap();

		site.repository.clear_cache();
		site.repository.load_all().await.unwrap();

		assert_eq!(site.store.select_calls(), 2);
	}

	#[rstest]
	#[tokio::test]
	async fn test_empty_result_is_not_cached(empty_site: TestSite) {
		empty_site.repository.load_all().await.unwrap();
		empty_site.repository.load_all().await.unwrap();

		assert_eq!(empty_site.store.select_calls(), 2);
	}
}

mod subpage_tests {
	use super::*;

	#[rstest]
	#[tokio::test]
	async fn test_add_subpage_copies_main_content(site: TestSite) {
		// Act
		let page = site.repository.add_subpage("Gdańsk", "gdansk").await.unwrap();

		// Assert
		assert_eq!(page.name, "Gdańsk");
		assert_eq!(page.slug, "/gdansk");
		assert_ne!(page.id, site.main.id);
		assert!(!page.is_main());
		assert_eq!(page.gallery, site.main.gallery);
		assert_eq!(page.videos, site.main.videos);
		assert_eq!(page.stats, site.main.stats);
		assert_eq!(page.locations, site.main.locations);
		assert_eq!(page.footer, site.main.footer);
		assert_eq!(page.seo.title, DEFAULT_SEO_TITLE);
		assert_eq!(page.seo.description, "");
	}

	#[rstest]
	#[tokio::test]
	async fn test_subpage_edits_do_not_touch_main(site: TestSite) {
		// Arrange
		let mut page = site.repository.add_subpage("Sopot", "/sopot").await.unwrap();

		// Act
		page.gallery.images.push(GalleryImage {
			src: "/assets/subpages/images/molo.webp".to_string(),
			alt: "Molo".to_string(),
		});
		page.gallery.images[0].alt = "Zmienione".to_string();
		site.repository.update(page.id, page).await.unwrap();

		// Assert
		let main = site.repository.get_by_id(site.main.id).await.unwrap().unwrap();
		assert_eq!(main.gallery, site.main.gallery);
	}

	#[rstest]
	#[tokio::test]
	async fn test_pages_listed_main_first_then_creation_order(site: TestSite) {
		site.repository.add_subpage("Gdańsk", "gdansk").await.unwrap();
		site.repository.add_subpage("Sopot", "sopot").await.unwrap();
		site.repository.add_subpage("Gdynia", "gdynia").await.unwrap();

		let slugs: Vec<String> = site
			.repository
			.load_all()
			.await
			.unwrap()
			.into_iter()
			.map(|page| page.slug)
			.collect();

		assert_eq!(slugs, ["/", "/gdansk", "/sopot", "/gdynia"]);
	}

	#[rstest]
	#[case("gdansk")]
	#[case("/gdansk")]
	#[case("/")]
	#[tokio::test]
	async fn test_add_subpage_rejects_taken_slug(#[case] slug: &str, site: TestSite) {
		site.repository.add_subpage("Gdańsk", "gdansk").await.unwrap();

		let result = site.repository.add_subpage("Duplikat", slug).await;

		assert!(matches!(result, Err(CmsError::DuplicateSlug(_))));
	}

	#[rstest]
	#[case("", "gdansk", "name")]
	#[case("   ", "gdansk", "name")]
	#[case("Gdańsk", "gdańsk bis", "slug")]
	#[case("Gdańsk", "a//b", "slug")]
	#[tokio::test]
	async fn test_add_subpage_validates_input(
		#[case] name: &str,
		#[case] slug: &str,
		#[case] expected_field: &str,
		site: TestSite,
	) {
		let result = site.repository.add_subpage(name, slug).await;

		match result {
			Err(CmsError::Validation { field, .. }) => assert_eq!(field, expected_field),
			other => panic!("expected validation error, got {:?}", other),
		}
		assert_eq!(site.store.select_calls(), 0);
	}

	#[rstest]
	#[tokio::test]
	async fn test_add_subpage_requires_main_page(empty_site: TestSite) {
		let result = empty_site.repository.add_subpage("Gdańsk", "gdansk").await;

		assert!(matches!(result, Err(CmsError::MainPageMissing)));
	}

	#[rstest]
	#[tokio::test]
	async fn test_remove_subpage(site: TestSite) {
		// Arrange
		let page = site.repository.add_subpage("Hel", "hel").await.unwrap();

		// Act
		site.repository.remove_subpage(page.id).await.unwrap();

		// Assert
		assert!(site.repository.get_by_slug("/hel").await.unwrap().is_none());
		assert!(site.store.row(page.id).is_none());
	}

	#[rstest]
	#[tokio::test]
	async fn test_remove_main_page_is_refused(site: TestSite) {
		let result = site.repository.remove_subpage(site.main.id).await;

		assert!(matches!(result, Err(CmsError::MainPageProtected)));
		assert!(site.store.row(site.main.id).is_some());
	}

	#[rstest]
	#[tokio::test]
	async fn test_remove_unknown_page(site: TestSite) {
		let result = site.repository.remove_subpage(Uuid::new_v4()).await;

		assert!(matches!(result, Err(CmsError::PageNotFound(_))));
	}
}

mod update_tests {
	use super::*;

	#[rstest]
	#[tokio::test]
	async fn test_update_ignores_record_id(site: TestSite) {
		// Arrange
		let mut edited = site.main.clone();
		edited.id = Uuid::new_v4();
		edited.welcome_section.subtitle = "Podtytuł".to_string();

		// Act
		site.repository.update(site.main.id, edited).await.unwrap();

		// Assert
		let main = site.repository.get_by_id(site.main.id).await.unwrap().unwrap();
		assert_eq!(main.welcome_section.subtitle, "Podtytuł");
		assert_eq!(site.repository.load_all().await.unwrap().len(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_update_keeps_created_at(site: TestSite) {
		let created_at = site.store.row(site.main.id).unwrap().created_at;

		site.repository
			.update(site.main.id, site.main.clone())
			.await
			.unwrap();

		let row = site.store.row(site.main.id).unwrap();
		assert_eq!(row.created_at, created_at);
		assert!(row.updated_at >= created_at);
	}

	#[rstest]
	#[tokio::test]
	async fn test_update_unknown_page(site: TestSite) {
		let ghost = PageRecord::new("Ghost", "/ghost");

		let result = site.repository.update(ghost.id, ghost).await;

		assert!(matches!(result, Err(CmsError::PageNotFound(_))));
	}

	#[rstest]
	#[tokio::test]
	async fn test_subpage_cannot_take_main_slug(site: TestSite) {
		let mut page = site.repository.add_subpage("Puck", "puck").await.unwrap();
		page.slug = "/".to_string();

		let result = site.repository.update(page.id, page).await;

		assert!(matches!(result, Err(CmsError::DuplicateSlug(_))));
	}

	#[rstest]
	#[tokio::test]
	async fn test_main_page_keeps_root_slug(site: TestSite) {
		let mut edited = site.main.clone();
		edited.slug = "/home".to_string();

		let result = site.repository.update(site.main.id, edited).await;

		assert!(matches!(result, Err(CmsError::Validation { .. })));
	}

	#[rstest]
	#[tokio::test]
	async fn test_update_rejects_negative_start_time(site: TestSite) {
		let mut edited = site.main.clone();
		edited.videos[0].start_time = Some(-1.0);

		let result = site.repository.update(site.main.id, edited).await;

		assert!(matches!(result, Err(CmsError::Validation { .. })));
	}

	#[rstest]
	#[tokio::test]
	async fn test_second_main_page_is_rejected(site: TestSite) {
		let result = site
			.repository
			.create_main_page(PageRecord::main_page("Druga"))
			.await;

		assert!(matches!(result, Err(CmsError::DuplicateSlug(_))));
	}

	#[rstest]
	#[tokio::test]
	async fn test_create_main_page_forces_root_slug(empty_site: TestSite) {
		let page = empty_site
			.repository
			.create_main_page(PageRecord::new("Start", "/start"))
			.await
			.unwrap();

		assert!(page.is_main());
		assert_eq!(empty_site.repository.load_all().await.unwrap().len(), 1);
	}
}

mod failure_tests {
	use super::*;

	/// Deletes nothing, and cannot be read back afterwards.
	struct UnreadableAfterDelete;

	#[async_trait]
	impl PageStore for UnreadableAfterDelete {
		async fn select_all(&self) -> CmsResult<Vec<PageRow>> {
			Err(CmsError::Storage("connection lost".to_string()))
		}

		async fn update(&self, _id: PageId, _row: PageRow) -> CmsResult<u64> {
			Ok(0)
		}

		async fn insert(&self, row: PageRow) -> CmsResult<PageRow> {
			Ok(row)
		}

		async fn delete_unless_main(&self, _id: PageId) -> CmsResult<u64> {
			Ok(0)
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_remove_reports_failed_follow_up_read() {
		// Arrange
		let repository = PageRepository::new(Arc::new(UnreadableAfterDelete));

		// Act
		let result = repository.remove_subpage(Uuid::new_v4()).await;

		// Assert
		match result {
			Err(CmsError::Storage(message)) => assert_eq!(message, "connection lost"),
			other => panic!("expected storage error, got {:?}", other),
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_storage_failure_is_reported(site: TestSite) {
		site.store.fail_with("database is locked");

		let result = site.repository.load_all().await;

		match result {
			Err(CmsError::Storage(message)) => assert_eq!(message, "database is locked"),
			other => panic!("expected storage error, got {:?}", other),
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_load_all_or_empty_swallows_failure(site: TestSite) {
		site.store.fail_with("database is locked");

		let pages = site.repository.load_all_or_empty().await;

		assert!(pages.is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_failed_write_keeps_cache(site: TestSite) {
		// Arrange
		site.repository.load_all().await.unwrap();
		site.store.fail_with("disk full");
		let mut edited = site.main.clone();
		edited.name = "Zmieniona".to_string();

		// Act
		let result = site.repository.update(site.main.id, edited).await;

		// Assert
		assert!(matches!(result, Err(CmsError::Storage(_))));
		site.store.recover();
		let main = site.repository.get_by_id(site.main.id).await.unwrap().unwrap();
		assert_eq!(main.name, site.main.name);
		assert_eq!(site.store.select_calls(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_recovers_after_failure(site: TestSite) {
		site.store.fail_with("connection reset");
		assert!(site.repository.load_all().await.is_err());

		site.store.recover();
		let pages = site.repository.load_all().await.unwrap();

		assert_eq!(pages.len(), 1);
	}
}
