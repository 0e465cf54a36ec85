//! Page content model
//!
//! A [`PageRecord`] is the full content of one landing page. Records are
//! plain values: cloning produces an independent deep copy, so edits never
//! alias the cached or stored state.
//!
//! [`PageRow`] mirrors the storage row, with the structural sections kept as
//! JSON documents. Converting a row back into a record fills in defaults for
//! missing columns.

use crate::error::{CmsError, CmsResult};
use chrono::{DateTime, Utc};
use fotobudka_conf::DEFAULT_SEO_TITLE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Page identifier
pub type PageId = Uuid;

/// Slug of the main page.
pub const MAIN_PAGE_SLUG: &str = "/";

/// Search engine metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Seo {
	/// `<title>` text
	pub title: String,
	/// Meta description
	pub description: String,
}

impl Default for Seo {
	fn default() -> Self {
		Self {
			title: DEFAULT_SEO_TITLE.to_string(),
			description: String::new(),
		}
	}
}

/// Social links in the top navigation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Navigation {
	/// Facebook profile URL
	pub facebook_url: String,
	/// Instagram profile URL
	pub instagram_url: String,
}

/// Background video reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoItem {
	/// Public path of the video
	pub src: String,
	/// Alternative text
	pub alt: String,
	/// Playback start offset in seconds
	#[serde(skip_serializing_if = "Option::is_none")]
	pub start_time: Option<f64>,
}

/// Hero copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WelcomeSection {
	/// Headline
	pub welcome_text: String,
	/// Line under the headline
	pub subtitle: String,
}

/// Marketing counters, kept as display text ("500+").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
	/// Number of clients
	pub clients_count: String,
	/// Years in business
	pub years_on_market: String,
	/// Number of smiles
	pub smiles_count: String,
}

impl Default for Stats {
	fn default() -> Self {
		Self {
			clients_count: "0".to_string(),
			years_on_market: "0".to_string(),
			smiles_count: "0".to_string(),
		}
	}
}

/// Gallery image reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryImage {
	/// Public path of the image
	pub src: String,
	/// Alternative text
	pub alt: String,
}

/// Gallery section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Gallery {
	/// Images in display order
	pub images: Vec<GalleryImage>,
}

/// Service area section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Locations {
	/// City names in display order
	pub cities: Vec<String>,
}

/// Footer contact block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Footer {
	/// Facebook profile URL
	pub facebook_url: String,
	/// Facebook link label
	pub facebook_text: String,
	/// Instagram profile URL
	pub instagram_url: String,
	/// Instagram link label
	pub instagram_text: String,
	/// Contact phone number
	pub phone_number: String,
}

/// Full content of one landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
	/// Identifier assigned at creation
	pub id: PageId,
	/// Label shown in the admin page list
	pub name: String,
	/// URL path; `/` for the main page
	pub slug: String,
	/// SEO metadata
	#[serde(default)]
	pub seo: Seo,
	/// Navigation links
	#[serde(default)]
	pub navigation: Navigation,
	/// Background videos
	#[serde(default)]
	pub videos: Vec<VideoItem>,
	/// Hero copy
	#[serde(default)]
	pub welcome_section: WelcomeSection,
	/// Counters
	#[serde(default)]
	pub stats: Stats,
	/// Gallery
	#[serde(default)]
	pub gallery: Gallery,
	/// Service area
	#[serde(default)]
	pub locations: Locations,
	/// Footer
	#[serde(default)]
	pub footer: Footer,
}

impl PageRecord {
	/// Empty record with a fresh id.
	pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
		Self {
			id: Uuid::new_v4(),
			name: name.into(),
			slug: slug.into(),
			seo: Seo::default(),
			navigation: Navigation::default(),
			videos: Vec::new(),
			welcome_section: WelcomeSection::default(),
			stats: Stats::default(),
			gallery: Gallery::default(),
			locations: Locations::default(),
			footer: Footer::default(),
		}
	}

	/// Empty main page record.
	pub fn main_page(name: impl Into<String>) -> Self {
		Self::new(name, MAIN_PAGE_SLUG)
	}

	/// True for the page served at `/`.
	pub fn is_main(&self) -> bool {
		self.slug == MAIN_PAGE_SLUG
	}

	/// Check the field-level invariants that storage cannot enforce.
	pub fn validate(&self) -> CmsResult<()> {
		if self.name.trim().is_empty() {
			return Err(CmsError::validation("name", "must not be empty"));
		}
		crate::slug::validate_slug(&self.slug)?;
		for (index, video) in self.videos.iter().enumerate() {
			let valid = video
				.start_time
				.is_none_or(|start| start.is_finite() && start >= 0.0);
			if !valid {
				return Err(CmsError::validation(
					format!("videos[{}].startTime", index),
					"must be a non-negative number of seconds",
				));
			}
		}
		Ok(())
	}

	/// Build a record from a storage row, defaulting missing columns.
	///
	/// A column holding JSON that does not match its section is logged and
	/// replaced by the section default.
	pub fn from_row(row: PageRow) -> Self {
		let id = row.id;
		Self {
			id,
			name: row.name,
			slug: row.slug,
			seo: Seo {
				title: row
					.seo_title
					.unwrap_or_else(|| DEFAULT_SEO_TITLE.to_string()),
				description: row.seo_description.unwrap_or_default(),
			},
			navigation: decode_column(id, "navigation", row.navigation),
			videos: decode_column(id, "videos", row.videos),
			welcome_section: decode_column(id, "welcome_section", row.welcome_section),
			stats: decode_column(id, "stats", row.stats),
			gallery: decode_column(id, "gallery", row.gallery),
			locations: decode_column(id, "locations", row.locations),
			footer: decode_column(id, "footer", row.footer),
		}
	}
}

fn decode_column<T>(id: PageId, column: &str, value: Option<Value>) -> T
where
	T: DeserializeOwned + Default,
{
	match value {
		None | Some(Value::Null) => T::default(),
		Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
			tracing::warn!(page_id = %id, column, error = %e, "Malformed page column, using default");
			T::default()
		}),
	}
}

fn encode<T: Serialize>(value: &T) -> Option<Value> {
	// Plain structs of strings, numbers and vectors always encode.
	serde_json::to_value(value).ok()
}

/// Storage row for a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRow {
	/// Primary key
	pub id: PageId,
	/// Page label
	pub name: String,
	/// Unique slug
	pub slug: String,
	/// Set for the `/` page only
	pub is_main: bool,
	/// SEO title column
	pub seo_title: Option<String>,
	/// SEO description column
	pub seo_description: Option<String>,
	/// JSON navigation section
	pub navigation: Option<Value>,
	/// JSON videos array
	pub videos: Option<Value>,
	/// JSON welcome section
	pub welcome_section: Option<Value>,
	/// JSON stats section
	pub stats: Option<Value>,
	/// JSON gallery section
	pub gallery: Option<Value>,
	/// JSON locations section
	pub locations: Option<Value>,
	/// JSON footer section
	pub footer: Option<Value>,
	/// Insertion time; drives list order
	pub created_at: Option<DateTime<Utc>>,
	/// Last write time
	pub updated_at: Option<DateTime<Utc>>,
}

impl PageRow {
	/// Encode a record as a row without timestamps.
	pub fn from_record(record: &PageRecord) -> Self {
		Self {
			id: record.id,
			name: record.name.clone(),
			slug: record.slug.clone(),
			is_main: record.is_main(),
			seo_title: Some(record.seo.title.clone()),
			seo_description: Some(record.seo.description.clone()),
			navigation: encode(&record.navigation),
			videos: encode(&record.videos),
			welcome_section: encode(&record.welcome_section),
			stats: encode(&record.stats),
			gallery: encode(&record.gallery),
			locations: encode(&record.locations),
			footer: encode(&record.footer),
			created_at: None,
			updated_at: None,
		}
	}

	/// Row with only the required columns set.
	pub fn bare(id: PageId, name: impl Into<String>, slug: impl Into<String>) -> Self {
		let slug = slug.into();
		Self {
			id,
			name: name.into(),
			is_main: slug == MAIN_PAGE_SLUG,
			slug,
			seo_title: None,
			seo_description: None,
			navigation: None,
			videos: None,
			welcome_section: None,
			stats: None,
			gallery: None,
			locations: None,
			footer: None,
			created_at: None,
			updated_at: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_bare_row_gets_defaults() {
		let id = Uuid::new_v4();

		let record = PageRecord::from_row(PageRow::bare(id, "Sopot", "/sopot"));

		assert_eq!(record.seo.title, DEFAULT_SEO_TITLE);
		assert_eq!(record.seo.description, "");
		assert_eq!(record.stats.clients_count, "0");
		assert_eq!(record.stats.years_on_market, "0");
		assert_eq!(record.stats.smiles_count, "0");
		assert!(record.videos.is_empty());
		assert!(record.gallery.images.is_empty());
		assert!(record.locations.cities.is_empty());
		assert_eq!(record.footer.phone_number, "");
	}

	#[rstest]
	fn test_malformed_column_is_defaulted() {
		let mut row = PageRow::bare(Uuid::new_v4(), "Hel", "/hel");
		row.gallery = Some(json!("not a gallery"));
		row.locations = Some(json!({"cities": ["Hel", "Puck"]}));

		let record = PageRecord::from_row(row);

		assert!(record.gallery.images.is_empty());
		assert_eq!(record.locations.cities, vec!["Hel", "Puck"]);
	}

	#[rstest]
	fn test_row_round_trip() {
		let mut record = PageRecord::new("Gdynia", "/gdynia");
		record.videos.push(VideoItem {
			src: "/assets/subpages/videos/a.webm".to_string(),
			alt: "Booth".to_string(),
			start_time: Some(3.5),
		});
		record.seo.description = String::new();

		let round_tripped = PageRecord::from_row(PageRow::from_record(&record));

		assert_eq!(round_tripped, record);
	}

	#[rstest]
	fn test_json_uses_camel_case() {
		let mut record = PageRecord::new("Ustka", "/ustka");
		record.videos.push(VideoItem {
			start_time: Some(1.0),
			..Default::default()
		});

		let value = serde_json::to_value(&record).unwrap();

		assert!(value.get("welcomeSection").is_some());
		assert_eq!(value["videos"][0]["startTime"], json!(1.0));
		assert!(value["footer"].get("phoneNumber").is_some());
	}

	#[rstest]
	#[case(Some(-1.0), false)]
	#[case(Some(f64::NAN), false)]
	#[case(Some(0.0), true)]
	#[case(None, true)]
	fn test_start_time_validation(#[case] start_time: Option<f64>, #[case] valid: bool) {
		let mut record = PageRecord::new("Tczew", "/tczew");
		record.videos.push(VideoItem {
			start_time,
			..Default::default()
		});

		assert_eq!(record.validate().is_ok(), valid);
	}
}
