//! Media library
//!
//! Admin uploads land under `assets/{main|subpages}/{images|videos}/` in the
//! public web root, keeping the uploaded file name. Only `.webp` and `.webm`
//! files are accepted, and the public path returned by [`MediaLibrary::upload`]
//! is what page records store in their `src` fields.

use crate::{Result, StorageBackend, StorageError};
use chrono::{DateTime, Utc};
use fotobudka_conf::DEFAULT_MAX_UPLOAD_BYTES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Extensions accepted for upload and shown in listings.
pub const ALLOWED_EXTENSIONS: &[&str] = &["webp", "webm"];

const ASSETS_DIR: &str = "assets";

/// Which part of the site a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
	/// Main page assets
	Main,
	/// Assets shared by city subpages
	Subpages,
}

impl MediaType {
	/// All media types.
	pub const ALL: [MediaType; 2] = [MediaType::Main, MediaType::Subpages];

	/// Directory segment.
	pub fn as_str(&self) -> &'static str {
		match self {
			MediaType::Main => "main",
			MediaType::Subpages => "subpages",
		}
	}
}

impl fmt::Display for MediaType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for MediaType {
	type Err = StorageError;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"main" => Ok(MediaType::Main),
			"subpages" => Ok(MediaType::Subpages),
			other => Err(StorageError::InvalidMediaParameter(format!(
				"unknown media type '{}'",
				other
			))),
		}
	}
}

/// Kind of file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
	/// `.webp` images
	Images,
	/// `.webm` videos
	Videos,
}

impl MediaCategory {
	/// All categories.
	pub const ALL: [MediaCategory; 2] = [MediaCategory::Images, MediaCategory::Videos];

	/// Directory segment.
	pub fn as_str(&self) -> &'static str {
		match self {
			MediaCategory::Images => "images",
			MediaCategory::Videos => "videos",
		}
	}
}

impl fmt::Display for MediaCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for MediaCategory {
	type Err = StorageError;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"images" => Ok(MediaCategory::Images),
			"videos" => Ok(MediaCategory::Videos),
			other => Err(StorageError::InvalidMediaParameter(format!(
				"unknown media category '{}'",
				other
			))),
		}
	}
}

/// Split an upload target such as `/assets/main/images` into its type and
/// category. Any path mentioning `main` targets the main page; the last
/// segment names the category.
///
/// # Examples
///
/// ```
/// use fotobudka_storages::{MediaCategory, MediaType};
/// use fotobudka_storages::media::parse_target_dir;
///
/// let (media_type, category) = parse_target_dir("/assets/subpages/videos").unwrap();
/// assert_eq!(media_type, MediaType::Subpages);
/// assert_eq!(category, MediaCategory::Videos);
/// ```
pub fn parse_target_dir(target: &str) -> Result<(MediaType, MediaCategory)> {
	let media_type = if target.contains("main") {
		MediaType::Main
	} else {
		MediaType::Subpages
	};
	let category = target
		.trim_end_matches('/')
		.rsplit('/')
		.next()
		.unwrap_or_default()
		.parse::<MediaCategory>()?;
	Ok((media_type, category))
}

/// A file received from the admin surface.
#[derive(Debug, Clone, Copy)]
pub struct IncomingFile<'a> {
	/// Original file name
	pub name: &'a str,
	/// File bytes
	pub content: &'a [u8],
}

impl<'a> IncomingFile<'a> {
	/// Wrap a name and content.
	pub fn new(name: &'a str, content: &'a [u8]) -> Self {
		Self { name, content }
	}
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedMedia {
	/// Public path, e.g. `/assets/main/videos/hero.webm`
	pub path: String,
	/// Stored file name
	pub filename: String,
	/// Size in bytes
	pub size: u64,
}

/// A file present in the asset tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
	/// File name
	pub name: String,
	/// Public path
	pub path: String,
	/// Size in bytes
	pub size: u64,
	/// Last modification time
	pub modified: DateTime<Utc>,
}

/// Upload, listing and deletion of site media.
#[derive(Clone)]
pub struct MediaLibrary {
	storage: Arc<dyn StorageBackend>,
	max_upload_bytes: u64,
}

impl fmt::Debug for MediaLibrary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MediaLibrary")
			.field("max_upload_bytes", &self.max_upload_bytes)
			.finish_non_exhaustive()
	}
}

impl MediaLibrary {
	/// Library over a backend rooted at the public web directory.
	pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
		Self {
			storage,
			max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
		}
	}

	/// Override the upload size limit.
	pub fn with_max_upload_bytes(mut self, limit: u64) -> Self {
		self.max_upload_bytes = limit;
		self
	}

	/// Current upload size limit.
	pub fn max_upload_bytes(&self) -> u64 {
		self.max_upload_bytes
	}

	/// Store an uploaded file and return its public path.
	///
	/// An existing file with the same name is overwritten.
	///
	/// # Errors
	///
	/// - `StorageError::MissingFile` when no file (or an unnamed one) was sent
	/// - `StorageError::InvalidExtension` for anything but `.webp` / `.webm`
	/// - `StorageError::FileTooLarge` above the size limit
	/// - `StorageError::InvalidPath` when the name contains a path
	pub async fn upload(
		&self,
		file: Option<IncomingFile<'_>>,
		media_type: MediaType,
		category: MediaCategory,
	) -> Result<UploadedMedia> {
		let file = match file {
			Some(file) if !file.name.trim().is_empty() => file,
			_ => return Err(StorageError::MissingFile),
		};

		if !has_allowed_extension(file.name) {
			tracing::warn!(file = file.name, "Rejected upload with disallowed extension");
			return Err(StorageError::InvalidExtension(file.name.to_string()));
		}

		let size = file.content.len() as u64;
		if size > self.max_upload_bytes {
			tracing::warn!(file = file.name, size, "Rejected oversized upload");
			return Err(StorageError::FileTooLarge {
				size,
				limit: self.max_upload_bytes,
			});
		}

		if file.name.contains(['/', '\\']) || file.name.contains("..") {
			return Err(StorageError::InvalidPath(file.name.to_string()));
		}

		let relative = format!("{}/{}", asset_dir(media_type, category), file.name);
		self.storage.save(&relative, file.content).await?;

		tracing::info!(path = %relative, size, "Uploaded media file");
		Ok(UploadedMedia {
			path: format!("/{}", relative),
			filename: file.name.to_string(),
			size,
		})
	}

	/// List the `.webp` / `.webm` files of one asset directory, by name.
	pub async fn list(&self, media_type: MediaType, category: MediaCategory) -> Result<Vec<MediaFile>> {
		let dir = asset_dir(media_type, category);
		let mut files = Vec::new();

		for name in self.storage.list(&dir).await? {
			if !has_allowed_extension(&name) {
				continue;
			}
			let relative = format!("{}/{}", dir, name);
			files.push(MediaFile {
				size: self.storage.size(&relative).await?,
				modified: self.storage.get_modified_time(&relative).await?,
				path: format!("/{}", relative),
				name,
			});
		}

		Ok(files)
	}

	/// Delete a file by its public path.
	///
	/// # Errors
	///
	/// `StorageError::InvalidPath` for paths containing `..` or `~`,
	/// `StorageError::NotFound` when nothing is there.
	pub async fn delete(&self, public_path: &str) -> Result<()> {
		let trimmed = public_path.trim();
		if trimmed.is_empty() || trimmed.contains("..") || trimmed.contains('~') {
			return Err(StorageError::InvalidPath(public_path.to_string()));
		}

		let relative = trimmed.trim_start_matches('/');
		if !self.storage.exists(relative).await? {
			return Err(StorageError::NotFound(public_path.to_string()));
		}
		self.storage.delete(relative).await?;

		tracing::info!(path = public_path, "Deleted media file");
		Ok(())
	}

	/// Create every `assets/{type}/{category}` directory.
	pub async fn ensure_directories(&self) -> Result<()> {
		for media_type in MediaType::ALL {
			for category in MediaCategory::ALL {
				self.storage.create_dir(&asset_dir(media_type, category)).await?;
			}
		}
		tracing::debug!("Asset directories ready");
		Ok(())
	}
}

fn asset_dir(media_type: MediaType, category: MediaCategory) -> String {
	format!("{}/{}/{}", ASSETS_DIR, media_type, category)
}

fn has_allowed_extension(name: &str) -> bool {
	name.rsplit_once('.')
		.map(|(_, ext)| {
			let ext = ext.to_ascii_lowercase();
			ALLOWED_EXTENSIONS.contains(&ext.as_str())
		})
		.unwrap_or(false)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("hero.webm", true)]
	#[case("HERO.WEBP", true)]
	#[case("photo.jpg", false)]
	#[case("webm", false)]
	#[case("archive.webm.zip", false)]
	fn test_extension_filter(#[case] name: &str, #[case] allowed: bool) {
		assert_eq!(has_allowed_extension(name), allowed);
	}

	#[rstest]
	#[case("/assets/main/images", MediaType::Main, MediaCategory::Images)]
	#[case("/assets/subpages/videos/", MediaType::Subpages, MediaCategory::Videos)]
	fn test_parse_target_dir(
		#[case] target: &str,
		#[case] media_type: MediaType,
		#[case] category: MediaCategory,
	) {
		assert_eq!(parse_target_dir(target).unwrap(), (media_type, category));
	}

	#[rstest]
	fn test_parse_target_dir_rejects_unknown_category() {
		assert!(matches!(
			parse_target_dir("/assets/main/audio"),
			Err(StorageError::InvalidMediaParameter(_))
		));
	}
}
