//! XML sitemap generation
//!
//! Builds a `sitemap.xml` for the site's pages following the
//! [sitemaps.org](https://www.sitemaps.org/protocol.html) protocol.
//!
//! ```rust
//! use fotobudka_cms::sitemap::{ChangeFrequency, Priority, Sitemap, SitemapItem};
//!
//! let mut sitemap = Sitemap::new();
//! sitemap
//! 	.add_item(
//! 		SitemapItem::new("https://example.com/")
//! 			.with_changefreq(ChangeFrequency::Weekly)
//! 			.with_priority(Priority::new(1.0).unwrap()),
//! 	)
//! 	.unwrap();
//! let xml = sitemap.to_xml().unwrap();
//! assert!(xml.contains("<loc>https://example.com/</loc>"));
//! ```

use crate::error::{CmsError, CmsResult};
use crate::pages::PageRecord;
use chrono::{DateTime, Utc};
use std::fmt;
use std::fmt::Write as _;

/// Maximum number of URLs in one sitemap file.
pub const MAX_URLS: usize = 50_000;

/// Maximum length of a `<loc>` value.
pub const MAX_URL_LENGTH: usize = 2048;

const XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// How often a page is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
	/// Changes on every access
	Always,
	/// Hourly
	Hourly,
	/// Daily
	Daily,
	/// Weekly
	Weekly,
	/// Monthly
	Monthly,
	/// Yearly
	Yearly,
	/// Archived content
	Never,
}

impl ChangeFrequency {
	/// Protocol value.
	pub fn as_str(&self) -> &'static str {
		match self {
			ChangeFrequency::Always => "always",
			ChangeFrequency::Hourly => "hourly",
			ChangeFrequency::Daily => "daily",
			ChangeFrequency::Weekly => "weekly",
			ChangeFrequency::Monthly => "monthly",
			ChangeFrequency::Yearly => "yearly",
			ChangeFrequency::Never => "never",
		}
	}
}

impl fmt::Display for ChangeFrequency {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// URL priority relative to the rest of the site, 0.0 to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Priority(f32);

impl Priority {
	/// Validated priority.
	pub fn new(value: f32) -> CmsResult<Self> {
		if !(0.0..=1.0).contains(&value) {
			return Err(CmsError::InvalidValue(format!(
				"sitemap priority must be between 0.0 and 1.0, got {}",
				value
			)));
		}
		Ok(Self(value))
	}

	/// Numeric value.
	pub fn value(&self) -> f32 {
		self.0
	}
}

impl Default for Priority {
	fn default() -> Self {
		Self(0.5)
	}
}

impl fmt::Display for Priority {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:.1}", self.0)
	}
}

/// One `<url>` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapItem {
	/// Absolute URL
	pub loc: String,
	/// Last modification time, rendered as a date
	pub lastmod: Option<DateTime<Utc>>,
	/// Expected change frequency
	pub changefreq: Option<ChangeFrequency>,
	/// Relative priority
	pub priority: Option<Priority>,
}

impl SitemapItem {
	/// Entry with only a location.
	pub fn new(loc: impl Into<String>) -> Self {
		Self {
			loc: loc.into(),
			lastmod: None,
			changefreq: None,
			priority: None,
		}
	}

	/// Set the last modification time.
	pub fn with_lastmod(mut self, lastmod: DateTime<Utc>) -> Self {
		self.lastmod = Some(lastmod);
		self
	}

	/// Set the change frequency.
	pub fn with_changefreq(mut self, changefreq: ChangeFrequency) -> Self {
		self.changefreq = Some(changefreq);
		self
	}

	/// Set the priority.
	pub fn with_priority(mut self, priority: Priority) -> Self {
		self.priority = Some(priority);
		self
	}

	/// Check the location is an absolute http(s) URL of acceptable length.
	pub fn validate(&self) -> CmsResult<()> {
		if !(self.loc.starts_with("http://") || self.loc.starts_with("https://")) {
			return Err(CmsError::InvalidValue(format!(
				"sitemap location must be an absolute http(s) URL: {}",
				self.loc
			)));
		}
		if self.loc.len() > MAX_URL_LENGTH {
			return Err(CmsError::InvalidValue(format!(
				"sitemap location exceeds {} characters",
				MAX_URL_LENGTH
			)));
		}
		Ok(())
	}

	/// Render as a `<url>` element.
	pub fn to_xml(&self) -> CmsResult<String> {
		self.validate()?;

		let mut xml = String::from("  <url>\n");
		// Writing to a String cannot fail
		let _ = writeln!(xml, "    <loc>{}</loc>", escape_xml(&self.loc));
		if let Some(lastmod) = self.lastmod {
			let _ = writeln!(xml, "    <lastmod>{}</lastmod>", lastmod.format("%Y-%m-%d"));
		}
		if let Some(changefreq) = self.changefreq {
			let _ = writeln!(xml, "    <changefreq>{}</changefreq>", changefreq);
		}
		if let Some(priority) = self.priority {
			let _ = writeln!(xml, "    <priority>{}</priority>", priority);
		}
		xml.push_str("  </url>\n");
		Ok(xml)
	}
}

/// A `<urlset>` document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sitemap {
	/// Entries in output order
	pub items: Vec<SitemapItem>,
}

impl Sitemap {
	/// Empty sitemap.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a validated entry.
	pub fn add_item(&mut self, item: SitemapItem) -> CmsResult<()> {
		item.validate()?;
		if self.items.len() >= MAX_URLS {
			return Err(CmsError::InvalidValue(format!(
				"a sitemap holds at most {} URLs",
				MAX_URLS
			)));
		}
		self.items.push(item);
		Ok(())
	}

	/// Sitemap for the site's pages.
	///
	/// The main page comes first with priority 1.0, weekly. Subpages follow
	/// in the given order, monthly, at 0.8 for the first four, 0.7 through
	/// the tenth and 0.6 after that.
	pub fn for_pages(
		base_url: &str,
		pages: &[PageRecord],
		lastmod: DateTime<Utc>,
	) -> CmsResult<Self> {
		let base = base_url.trim_end_matches('/');
		let mut sitemap = Self::new();

		if let Some(main) = pages.iter().find(|page| page.is_main()) {
			sitemap.add_item(
				SitemapItem::new(format!("{}{}", base, main.slug))
					.with_lastmod(lastmod)
					.with_changefreq(ChangeFrequency::Weekly)
					.with_priority(Priority(1.0)),
			)?;
		}

		for (index, page) in pages.iter().filter(|page| !page.is_main()).enumerate() {
			sitemap.add_item(
				SitemapItem::new(format!("{}{}", base, page.slug))
					.with_lastmod(lastmod)
					.with_changefreq(ChangeFrequency::Monthly)
					.with_priority(subpage_priority(index)),
			)?;
		}

		tracing::debug!(urls = sitemap.items.len(), "Built sitemap");
		Ok(sitemap)
	}

	/// Render the whole document.
	pub fn to_xml(&self) -> CmsResult<String> {
		let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
		let _ = writeln!(xml, "<urlset xmlns=\"{}\">", XMLNS);
		for item in &self.items {
			xml.push_str(&item.to_xml()?);
		}
		xml.push_str("</urlset>\n");
		Ok(xml)
	}
}

fn subpage_priority(index: usize) -> Priority {
	match index {
		0..4 => Priority(0.8),
		4..10 => Priority(0.7),
		_ => Priority(0.6),
	}
}

fn escape_xml(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());
	for c in value.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&apos;"),
			_ => escaped.push(c),
		}
	}
	escaped
}
