//! Page set cache
//!
//! Holds the last full page list together with the instant it was fetched.
//! Any write clears it; a fetch that started before the clear is not allowed
//! to repopulate it.

use crate::pages::PageRecord;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default staleness window (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Source of the current instant.
pub trait Clock: Send + Sync {
	/// Current instant.
	fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> Instant {
		Instant::now()
	}
}

/// Manually advanced clock for tests.
///
/// ```
/// use fotobudka_cms::cache::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(60));
/// assert_eq!(clock.now() - start, Duration::from_secs(60));
/// ```
#[derive(Debug)]
pub struct ManualClock {
	now: Mutex<Instant>,
}

impl ManualClock {
	/// Clock frozen at the current instant.
	pub fn new() -> Self {
		Self {
			now: Mutex::new(Instant::now()),
		}
	}

	/// Move the clock forward.
	pub fn advance(&self, by: Duration) {
		*self.now.lock() += by;
	}
}

impl Default for ManualClock {
	fn default() -> Self {
		Self::new()
	}
}

impl Clock for ManualClock {
	fn now(&self) -> Instant {
		*self.now.lock()
	}
}

struct CacheState {
	pages: Vec<PageRecord>,
	fetched_at: Option<Instant>,
	generation: u64,
}

/// Time-bounded cache of the full page set.
pub struct PageCache {
	state: Mutex<CacheState>,
	clock: Arc<dyn Clock>,
	ttl: Duration,
}

impl std::fmt::Debug for PageCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.lock();
		f.debug_struct("PageCache")
			.field("pages", &state.pages.len())
			.field("generation", &state.generation)
			.field("ttl", &self.ttl)
			.finish()
	}
}

impl PageCache {
	/// Cache on the system clock.
	pub fn new(ttl: Duration) -> Self {
		Self::with_clock(ttl, Arc::new(SystemClock))
	}

	/// Cache on an injected clock.
	pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
		Self {
			state: Mutex::new(CacheState {
				pages: Vec::new(),
				fetched_at: None,
				generation: 0,
			}),
			clock,
			ttl,
		}
	}

	/// Staleness window.
	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Cached pages if present and younger than the window.
	pub fn get(&self) -> Option<Vec<PageRecord>> {
		let state = self.state.lock();
		let fetched_at = state.fetched_at?;
		if state.pages.is_empty() {
			return None;
		}
		if self.clock.now().saturating_duration_since(fetched_at) >= self.ttl {
			return None;
		}
		Some(state.pages.clone())
	}

	/// Token to pass to [`PageCache::populate`] after fetching.
	pub fn generation(&self) -> u64 {
		self.state.lock().generation
	}

	/// Store a fetched set unless the cache was cleared since `generation`
	/// was read. Empty sets are never stored. Returns whether it was stored.
	pub fn populate(&self, pages: &[PageRecord], generation: u64) -> bool {
		let mut state = self.state.lock();
		if state.generation != generation || pages.is_empty() {
			return false;
		}
		state.pages = pages.to_vec();
		state.fetched_at = Some(self.clock.now());
		true
	}

	/// Drop the cached set.
	pub fn clear(&self) {
		let mut state = self.state.lock();
		state.pages.clear();
		state.fetched_at = None;
		state.generation = state.generation.wrapping_add(1);
	}
}

impl Default for PageCache {
	fn default() -> Self {
		Self::new(DEFAULT_CACHE_TTL)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn clock() -> Arc<ManualClock> {
		Arc::new(ManualClock::new())
	}

	fn pages() -> Vec<PageRecord> {
		vec![PageRecord::main_page("Main")]
	}

	#[rstest]
	fn test_empty_cache_misses(clock: Arc<ManualClock>) {
		let cache = PageCache::with_clock(DEFAULT_CACHE_TTL, clock);
		assert!(cache.get().is_none());
	}

	#[rstest]
	fn test_fresh_entry_hits_until_ttl(clock: Arc<ManualClock>) {
		let cache = PageCache::with_clock(DEFAULT_CACHE_TTL, clock.clone());
		cache.populate(&pages(), cache.generation());

		clock.advance(Duration::from_secs(4 * 60));
		assert!(cache.get().is_some());

		clock.advance(Duration::from_secs(2 * 60));
		assert!(cache.get().is_none());
	}

	#[rstest]
	fn test_empty_set_is_not_cached(clock: Arc<ManualClock>) {
		let cache = PageCache::with_clock(DEFAULT_CACHE_TTL, clock);

		assert!(!cache.populate(&[], cache.generation()));
		assert!(cache.get().is_none());
	}

	#[rstest]
	fn test_populate_after_clear_is_ignored(clock: Arc<ManualClock>) {
		let cache = PageCache::with_clock(DEFAULT_CACHE_TTL, clock);
		let generation = cache.generation();

		cache.clear();

		assert!(!cache.populate(&pages(), generation));
		assert!(cache.get().is_none());
	}
}
