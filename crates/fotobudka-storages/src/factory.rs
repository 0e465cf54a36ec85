//! Factory function for creating storage backends.

use crate::{Result, StorageBackend, StorageConfig};
use std::sync::Arc;

/// Create a storage backend from configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use fotobudka_conf::SiteSettings;
/// use fotobudka_storages::{create_storage, StorageConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// 	let settings = SiteSettings::from_env()?;
/// 	let config = StorageConfig::from_settings(&settings);
/// 	let storage = create_storage(config).await?;
/// 	Ok(())
/// }
/// ```
pub async fn create_storage(config: StorageConfig) -> Result<Arc<dyn StorageBackend>> {
	match config {
		#[cfg(feature = "local")]
		StorageConfig::Local(local_config) => {
			let storage = crate::backends::local::LocalStorage::new(local_config)?;
			Ok(Arc::new(storage))
		}
	}
}
