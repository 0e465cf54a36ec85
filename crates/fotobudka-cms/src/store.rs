//! Storage collaborator for page rows
//!
//! The repository talks to storage only through [`PageStore`]. Two
//! implementations ship with the crate: [`InMemoryPageStore`] for tests and
//! embedded use, and `SqlPageStore` (feature `sql`) over any sqlx database.

use crate::error::CmsResult;
use crate::pages::{PageId, PageRow};
use async_trait::async_trait;

mod memory;
#[cfg(feature = "sql")]
mod sql;

pub use memory::InMemoryPageStore;
#[cfg(feature = "sql")]
pub use sql::SqlPageStore;

/// Name of the pages table.
pub const PAGES_TABLE: &str = "pages";

/// Row-level page storage.
#[async_trait]
pub trait PageStore: Send + Sync {
	/// All rows, main page first, then in creation order.
	async fn select_all(&self) -> CmsResult<Vec<PageRow>>;

	/// Replace every column of row `id` except its creation time.
	///
	/// Returns the number of rows affected.
	async fn update(&self, id: PageId, row: PageRow) -> CmsResult<u64>;

	/// Insert a row and return it as stored (timestamps filled in).
	async fn insert(&self, row: PageRow) -> CmsResult<PageRow>;

	/// Delete row `id` unless it is the main page.
	///
	/// Returns the number of rows affected.
	async fn delete_unless_main(&self, id: PageId) -> CmsResult<u64>;
}
