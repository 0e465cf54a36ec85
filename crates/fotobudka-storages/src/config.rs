//! Configuration types for storage backends.

#[cfg(feature = "local")]
use fotobudka_conf::SiteSettings;

/// Configuration for local file system backend.
#[cfg(feature = "local")]
#[derive(Debug, Clone)]
pub struct LocalConfig {
	/// Base directory path for file storage
	pub base_path: String,
	/// Create the base directory when it does not exist yet
	pub create_if_missing: bool,
}

#[cfg(feature = "local")]
impl LocalConfig {
	/// Configuration for an existing directory.
	pub fn new(base_path: impl Into<String>) -> Self {
		Self {
			base_path: base_path.into(),
			create_if_missing: false,
		}
	}
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub enum StorageConfig {
	#[cfg(feature = "local")]
	Local(LocalConfig),
}

impl StorageConfig {
	/// Local storage rooted at `media_root`, created on demand.
	#[cfg(feature = "local")]
	pub fn local(media_root: impl Into<String>) -> Self {
		StorageConfig::Local(LocalConfig {
			base_path: media_root.into(),
			create_if_missing: true,
		})
	}

	/// Local storage rooted at the site's `MEDIA_ROOT`.
	#[cfg(feature = "local")]
	pub fn from_settings(settings: &SiteSettings) -> Self {
		Self::local(settings.media_root.to_string_lossy().into_owned())
	}
}
