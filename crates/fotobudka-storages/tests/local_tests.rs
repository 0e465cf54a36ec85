//! Integration tests for the LocalStorage backend.

mod fixtures;

use fixtures::{LocalTestDir, local_temp_dir};
use fotobudka_storages::StorageError;
use rstest::rstest;

mod crud_tests {
	use super::*;

	#[rstest]
	#[tokio::test]
	async fn test_save_and_open(#[future] local_temp_dir: LocalTestDir) {
		let dir = local_temp_dir.await;
		let backend = dir.backend();

		let name = backend
			.save("assets/main/images/hero.webp", b"image bytes")
			.await
			.expect("Failed to save file");

		assert_eq!(name, "assets/main/images/hero.webp");
		assert_eq!(backend.open(&name).await.unwrap(), b"image bytes");
		assert!(dir.path().join("assets/main/images/hero.webp").is_file());
	}

	#[rstest]
	#[tokio::test]
	async fn test_overwrite_file(#[future] local_temp_dir: LocalTestDir) {
		let dir = local_temp_dir.await;
		let backend = dir.backend();

		backend.save("clip.webm", b"original").await.unwrap();
		backend.save("clip.webm", b"replacement").await.unwrap();

		assert_eq!(backend.open("clip.webm").await.unwrap(), b"replacement");
		assert_eq!(backend.size("clip.webm").await.unwrap(), 11);
	}

	#[rstest]
	#[tokio::test]
	async fn test_delete_file(#[future] local_temp_dir: LocalTestDir) {
		let dir = local_temp_dir.await;
		let backend = dir.backend();
		backend.save("temp.webp", b"temporary").await.unwrap();

		backend.delete("temp.webp").await.expect("Failed to delete");

		assert!(!backend.exists("temp.webp").await.unwrap());
	}

	#[rstest]
	#[tokio::test]
	async fn test_exists_is_false_for_directories(#[future] local_temp_dir: LocalTestDir) {
		let dir = local_temp_dir.await;
		let backend = dir.backend();

		backend.create_dir("assets/main").await.unwrap();

		assert!(!backend.exists("assets/main").await.unwrap());
	}
}

mod listing_tests {
	use super::*;

	#[rstest]
	#[tokio::test]
	async fn test_list_returns_sorted_file_names(#[future] local_temp_dir: LocalTestDir) {
		let dir = local_temp_dir.await;
		let backend = dir.backend();
		backend.save("media/b.webp", b"b").await.unwrap();
		backend.save("media/a.webp", b"a").await.unwrap();
		backend.save("media/nested/c.webp", b"c").await.unwrap();

		let names = backend.list("media").await.unwrap();

		assert_eq!(names, vec!["a.webp".to_string(), "b.webp".to_string()]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_list_missing_dir_is_empty(#[future] local_temp_dir: LocalTestDir) {
		let dir = local_temp_dir.await;

		let names = dir.backend().list("does/not/exist").await.unwrap();

		assert!(names.is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_modified_time_is_recent(#[future] local_temp_dir: LocalTestDir) {
		let dir = local_temp_dir.await;
		let backend = dir.backend();
		let before = chrono::Utc::now() - chrono::Duration::seconds(5);

		backend.save("fresh.webp", b"x").await.unwrap();
		let modified = backend.get_modified_time("fresh.webp").await.unwrap();

		assert!(modified >= before);
	}
}

mod error_tests {
	use super::*;

	#[rstest]
	#[tokio::test]
	async fn test_open_missing_is_not_found(#[future] local_temp_dir: LocalTestDir) {
		let dir = local_temp_dir.await;

		let result = dir.backend().open("missing.webp").await;

		assert!(matches!(result, Err(StorageError::NotFound(_))));
	}

	#[rstest]
	#[tokio::test]
	async fn test_delete_missing_is_not_found(#[future] local_temp_dir: LocalTestDir) {
		let dir = local_temp_dir.await;

		let result = dir.backend().delete("missing.webp").await;

		assert!(matches!(result, Err(StorageError::NotFound(_))));
	}

	#[rstest]
	#[tokio::test]
	async fn test_escaping_root_is_rejected(#[future] local_temp_dir: LocalTestDir) {
		let dir = local_temp_dir.await;

		let result = dir.backend().save("../escape.webp", b"x").await;

		assert!(matches!(result, Err(StorageError::InvalidPath(_))));
		assert!(!dir.path().parent().unwrap().join("escape.webp").exists());
	}
}
