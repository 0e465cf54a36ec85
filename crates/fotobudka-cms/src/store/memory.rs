//! In-memory page store

use super::PageStore;
use crate::error::{CmsError, CmsResult};
use crate::pages::{PageId, PageRow};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Page store kept in process memory.
///
/// Failures can be injected with [`InMemoryPageStore::fail_with`] to
/// exercise error paths; every call then fails until
/// [`InMemoryPageStore::recover`].
#[derive(Debug, Default)]
pub struct InMemoryPageStore {
	rows: RwLock<Vec<PageRow>>,
	failure: Mutex<Option<String>>,
	select_calls: AtomicUsize,
}

impl InMemoryPageStore {
	/// Empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Store preloaded with rows, inserted in order.
	pub fn with_rows(rows: impl IntoIterator<Item = PageRow>) -> Self {
		let store = Self::new();
		{
			let mut stored = store.rows.write();
			for row in rows {
				stored.push(stamp(row));
			}
		}
		store
	}

	/// Make every following call fail with `message`.
	pub fn fail_with(&self, message: impl Into<String>) {
		*self.failure.lock() = Some(message.into());
	}

	/// Stop injecting failures.
	pub fn recover(&self) {
		*self.failure.lock() = None;
	}

	/// Number of `select_all` calls that reached the store.
	pub fn select_calls(&self) -> usize {
		self.select_calls.load(Ordering::SeqCst)
	}

	/// Raw stored row, bypassing ordering.
	pub fn row(&self, id: PageId) -> Option<PageRow> {
		self.rows.read().iter().find(|row| row.id == id).cloned()
	}

	fn check(&self) -> CmsResult<()> {
		match self.failure.lock().as_ref() {
			Some(message) => Err(CmsError::Storage(message.clone())),
			None => Ok(()),
		}
	}
}

fn stamp(mut row: PageRow) -> PageRow {
	let now = Utc::now();
	row.created_at.get_or_insert(now);
	row.updated_at.get_or_insert(now);
	row
}

#[async_trait]
impl PageStore for InMemoryPageStore {
	async fn select_all(&self) -> CmsResult<Vec<PageRow>> {
		self.select_calls.fetch_add(1, Ordering::SeqCst);
		self.check()?;

		let mut rows = self.rows.read().clone();
		// Stable sort keeps insertion order for equal timestamps.
		rows.sort_by(|a, b| {
			b.is_main
				.cmp(&a.is_main)
				.then_with(|| a.created_at.cmp(&b.created_at))
		});
		Ok(rows)
	}

	async fn update(&self, id: PageId, row: PageRow) -> CmsResult<u64> {
		self.check()?;

		let mut rows = self.rows.write();
		if rows.iter().any(|r| r.id != id && r.slug == row.slug) {
			return Err(CmsError::Storage(format!(
				"unique constraint violated on slug '{}'",
				row.slug
			)));
		}
		let Some(existing) = rows.iter_mut().find(|r| r.id == id) else {
			return Ok(0);
		};
		let created_at = existing.created_at;
		*existing = PageRow {
			id,
			created_at,
			updated_at: Some(row.updated_at.unwrap_or_else(Utc::now)),
			..row
		};
		Ok(1)
	}

	async fn insert(&self, row: PageRow) -> CmsResult<PageRow> {
		self.check()?;

		let mut rows = self.rows.write();
		if rows.iter().any(|r| r.id == row.id || r.slug == row.slug) {
			return Err(CmsError::Storage(format!(
				"unique constraint violated inserting page '{}'",
				row.slug
			)));
		}
		let row = stamp(row);
		rows.push(row.clone());
		Ok(row)
	}

	async fn delete_unless_main(&self, id: PageId) -> CmsResult<u64> {
		self.check()?;

		let mut rows = self.rows.write();
		let before = rows.len();
		rows.retain(|r| r.id != id || r.is_main);
		Ok((before - rows.len()) as u64)
	}
}
