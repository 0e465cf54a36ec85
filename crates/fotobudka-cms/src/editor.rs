//! Nested field editing
//!
//! The admin panel edits a page through a small set of typed paths: a
//! top-level field (optionally one sub-field of it), an element of the
//! `videos` array, or an element of one of the dot-path arrays
//! `gallery.images` and `locations.cities`.
//!
//! Every operation takes the current record and returns a new one; the input
//! is never modified. Edits are applied to the record's JSON tree and the
//! result is decoded back into a [`PageRecord`], so a value of the wrong
//! shape is rejected with [`CmsError::InvalidValue`]. An index past the end
//! of an array is ignored with a warning and the record comes back
//! unchanged.
//!
//! ```
//! use fotobudka_cms::editor::{self, NestedArrayPath};
//! use fotobudka_cms::pages::PageRecord;
//! use serde_json::json;
//!
//! let page = PageRecord::main_page("Fotobudka");
//! let page = editor::append_nested_array_item(
//! 	&page,
//! 	NestedArrayPath::GalleryImages,
//! 	NestedArrayPath::GalleryImages.default_item(),
//! )
//! .unwrap();
//! let page = editor::set_nested_array_element(
//! 	&page,
//! 	NestedArrayPath::GalleryImages,
//! 	0,
//! 	json!("/assets/main/images/booth.webp"),
//! 	Some("src"),
//! )
//! .unwrap();
//! assert_eq!(page.gallery.images[0].src, "/assets/main/images/booth.webp");
//! ```

use crate::error::{CmsError, CmsResult};
use crate::pages::{PageId, PageRecord};
use crate::repository::PageRepository;
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

/// Editable top-level fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageField {
	/// `name`
	Name,
	/// `slug`
	Slug,
	/// `seo`
	Seo,
	/// `navigation`
	Navigation,
	/// `videos`
	Videos,
	/// `welcomeSection`
	WelcomeSection,
	/// `stats`
	Stats,
	/// `gallery`
	Gallery,
	/// `locations`
	Locations,
	/// `footer`
	Footer,
}

impl PageField {
	/// Every editable field.
	pub const ALL: [PageField; 10] = [
		PageField::Name,
		PageField::Slug,
		PageField::Seo,
		PageField::Navigation,
		PageField::Videos,
		PageField::WelcomeSection,
		PageField::Stats,
		PageField::Gallery,
		PageField::Locations,
		PageField::Footer,
	];

	/// JSON key of the field.
	pub fn key(&self) -> &'static str {
		match self {
			PageField::Name => "name",
			PageField::Slug => "slug",
			PageField::Seo => "seo",
			PageField::Navigation => "navigation",
			PageField::Videos => "videos",
			PageField::WelcomeSection => "welcomeSection",
			PageField::Stats => "stats",
			PageField::Gallery => "gallery",
			PageField::Locations => "locations",
			PageField::Footer => "footer",
		}
	}

	/// Keys that may be written individually.
	pub fn sub_fields(&self) -> &'static [&'static str] {
		match self {
			PageField::Name | PageField::Slug | PageField::Videos => &[],
			PageField::Seo => &["title", "description"],
			PageField::Navigation => &["facebookUrl", "instagramUrl"],
			PageField::WelcomeSection => &["welcomeText", "subtitle"],
			PageField::Stats => &["clientsCount", "yearsOnMarket", "smilesCount"],
			PageField::Gallery => &["images"],
			PageField::Locations => &["cities"],
			PageField::Footer => &[
				"facebookUrl",
				"facebookText",
				"instagramUrl",
				"instagramText",
				"phoneNumber",
			],
		}
	}
}

impl PageField {
	/// True when the write target holds plain text: `name`, `slug`, or one
	/// key of a section whose keys are all strings.
	pub fn is_text(&self, sub_field: Option<&str>) -> bool {
		match (self, sub_field) {
			(PageField::Name | PageField::Slug, None) => true,
			(
				PageField::Seo
				| PageField::Navigation
				| PageField::WelcomeSection
				| PageField::Stats
				| PageField::Footer,
				Some(key),
			) => self.sub_fields().contains(&key),
			_ => false,
		}
	}
}

impl fmt::Display for PageField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.key())
	}
}

impl FromStr for PageField {
	type Err = CmsError;

	fn from_str(s: &str) -> CmsResult<Self> {
		PageField::ALL
			.into_iter()
			.find(|field| field.key() == s)
			.ok_or_else(|| CmsError::InvalidPath(s.to_string()))
	}
}

/// Top-level array fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayField {
	/// `videos`
	Videos,
}

impl ArrayField {
	/// JSON key of the array.
	pub fn key(&self) -> &'static str {
		match self {
			ArrayField::Videos => "videos",
		}
	}

	/// Element keys that may be written individually.
	pub fn sub_fields(&self) -> &'static [&'static str] {
		match self {
			ArrayField::Videos => &["src", "alt", "startTime"],
		}
	}

	/// Element appended by the admin "add" button.
	pub fn default_item(&self) -> Value {
		match self {
			ArrayField::Videos => json!({"src": "", "alt": "", "startTime": 0}),
		}
	}
}

impl FromStr for ArrayField {
	type Err = CmsError;

	fn from_str(s: &str) -> CmsResult<Self> {
		match s {
			"videos" => Ok(ArrayField::Videos),
			other => Err(CmsError::InvalidPath(other.to_string())),
		}
	}
}

/// Arrays addressed by a dot path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestedArrayPath {
	/// `gallery.images`
	GalleryImages,
	/// `locations.cities`
	LocationCities,
}

impl NestedArrayPath {
	/// Dot-path form.
	pub fn as_str(&self) -> &'static str {
		match self {
			NestedArrayPath::GalleryImages => "gallery.images",
			NestedArrayPath::LocationCities => "locations.cities",
		}
	}

	fn segments(&self) -> [&'static str; 2] {
		match self {
			NestedArrayPath::GalleryImages => ["gallery", "images"],
			NestedArrayPath::LocationCities => ["locations", "cities"],
		}
	}

	/// Element keys that may be written individually.
	pub fn sub_fields(&self) -> &'static [&'static str] {
		match self {
			NestedArrayPath::GalleryImages => &["src", "alt"],
			NestedArrayPath::LocationCities => &[],
		}
	}

	/// Element appended by the admin "add" button.
	pub fn default_item(&self) -> Value {
		match self {
			NestedArrayPath::GalleryImages => json!({"src": "", "alt": ""}),
			NestedArrayPath::LocationCities => json!(""),
		}
	}
}

impl fmt::Display for NestedArrayPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for NestedArrayPath {
	type Err = CmsError;

	fn from_str(s: &str) -> CmsResult<Self> {
		match s {
			"gallery.images" => Ok(NestedArrayPath::GalleryImages),
			"locations.cities" => Ok(NestedArrayPath::LocationCities),
			other => Err(CmsError::InvalidPath(other.to_string())),
		}
	}
}

/// Set a top-level field, or one key of it when `sub_field` is given.
pub fn set_field(
	record: &PageRecord,
	field: PageField,
	value: Value,
	sub_field: Option<&str>,
) -> CmsResult<PageRecord> {
	check_sub_field(field.key(), field.sub_fields(), sub_field)?;
	edit(record, |tree| {
		write(child_mut(tree, field.key()), sub_field, value);
		true
	})
}

/// Set element `index` of a top-level array, or one key of it.
pub fn set_array_element(
	record: &PageRecord,
	field: ArrayField,
	index: usize,
	value: Value,
	sub_field: Option<&str>,
) -> CmsResult<PageRecord> {
	check_sub_field(field.key(), field.sub_fields(), sub_field)?;
	edit(record, |tree| {
		set_element(child_mut(tree, field.key()), field.key(), index, value, sub_field)
	})
}

/// Set element `index` of a dot-path array, or one key of it.
pub fn set_nested_array_element(
	record: &PageRecord,
	path: NestedArrayPath,
	index: usize,
	value: Value,
	sub_field: Option<&str>,
) -> CmsResult<PageRecord> {
	check_sub_field(path.as_str(), path.sub_fields(), sub_field)?;
	edit(record, |tree| {
		set_element(descend(tree, &path.segments()), path.as_str(), index, value, sub_field)
	})
}

/// Append `item` to a top-level array.
pub fn append_array_item(
	record: &PageRecord,
	field: ArrayField,
	item: Value,
) -> CmsResult<PageRecord> {
	edit(record, |tree| {
		with_array(child_mut(tree, field.key()), |items| items.push(item));
		true
	})
}

/// Append `item` to a dot-path array.
pub fn append_nested_array_item(
	record: &PageRecord,
	path: NestedArrayPath,
	item: Value,
) -> CmsResult<PageRecord> {
	edit(record, |tree| {
		with_array(descend(tree, &path.segments()), |items| items.push(item));
		true
	})
}

/// Remove element `index` of a top-level array.
pub fn remove_array_item(
	record: &PageRecord,
	field: ArrayField,
	index: usize,
) -> CmsResult<PageRecord> {
	edit(record, |tree| {
		remove_element(child_mut(tree, field.key()), field.key(), index)
	})
}

/// Remove element `index` of a dot-path array.
pub fn remove_nested_array_item(
	record: &PageRecord,
	path: NestedArrayPath,
	index: usize,
) -> CmsResult<PageRecord> {
	edit(record, |tree| {
		remove_element(descend(tree, &path.segments()), path.as_str(), index)
	})
}

/// Read the value at a dot path such as `seo.title` or
/// `gallery.images.0.src`. Missing segments yield `None`.
pub fn get_path(record: &PageRecord, dot_path: &str) -> Option<Value> {
	let tree = serde_json::to_value(record).ok()?;
	let mut node = &tree;
	for segment in dot_path.split('.') {
		node = match node {
			Value::Object(map) => map.get(segment)?,
			Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
			_ => return None,
		};
	}
	Some(node.clone())
}

fn check_sub_field(path: &str, allowed: &[&str], sub_field: Option<&str>) -> CmsResult<()> {
	match sub_field {
		Some(key) if !allowed.contains(&key) => {
			Err(CmsError::InvalidPath(format!("{}.{}", path, key)))
		}
		_ => Ok(()),
	}
}

/// Apply `change` to the record's JSON tree and decode the result.
/// `change` returns `false` when it left the tree untouched.
fn edit(record: &PageRecord, change: impl FnOnce(&mut Value) -> bool) -> CmsResult<PageRecord> {
	let mut tree = serde_json::to_value(record)?;
	if !change(&mut tree) {
		return Ok(record.clone());
	}
	let mut edited: PageRecord =
		serde_json::from_value(tree).map_err(|e| CmsError::InvalidValue(e.to_string()))?;
	// The id is not editable
	edited.id = record.id;
	Ok(edited)
}

fn child_mut<'a>(node: &'a mut Value, key: &str) -> &'a mut Value {
	if !node.is_object() {
		*node = Value::Object(Map::new());
	}
	&mut node[key]
}

fn descend<'a>(node: &'a mut Value, segments: &[&str]) -> &'a mut Value {
	segments
		.iter()
		.fold(node, |current, segment| child_mut(current, segment))
}

fn with_array<R>(node: &mut Value, f: impl FnOnce(&mut Vec<Value>) -> R) -> R {
	if let Value::Array(items) = node {
		return f(items);
	}
	let mut items = Vec::new();
	let result = f(&mut items);
	*node = Value::Array(items);
	result
}

fn write(target: &mut Value, sub_field: Option<&str>, value: Value) {
	match sub_field {
		None => *target = value,
		Some(key) => *child_mut(target, key) = value,
	}
}

fn set_element(
	array: &mut Value,
	path: &str,
	index: usize,
	value: Value,
	sub_field: Option<&str>,
) -> bool {
	with_array(array, |items| {
		let len = items.len();
		match items.get_mut(index) {
			Some(item) => {
				write(item, sub_field, value);
				true
			}
			None => {
				tracing::warn!(path, index, len, "Ignoring write past the end of array");
				false
			}
		}
	})
}

fn remove_element(array: &mut Value, path: &str, index: usize) -> bool {
	with_array(array, |items| {
		if index < items.len() {
			items.remove(index);
			true
		} else {
			tracing::warn!(path, index, len = items.len(), "Ignoring removal past the end of array");
			false
		}
	})
}

/// Working copy of one page in the admin panel.
///
/// Edits replace the working copy; [`PageEditor::save`] writes it through
/// the repository and makes it the new saved snapshot.
#[derive(Debug, Clone)]
pub struct PageEditor {
	saved: PageRecord,
	working: PageRecord,
}

impl PageEditor {
	/// Start editing `record`.
	pub fn new(record: PageRecord) -> Self {
		Self {
			working: record.clone(),
			saved: record,
		}
	}

	/// Id of the page being edited.
	pub fn page_id(&self) -> PageId {
		self.saved.id
	}

	/// Current working copy.
	pub fn working(&self) -> &PageRecord {
		&self.working
	}

	/// Last saved snapshot.
	pub fn saved(&self) -> &PageRecord {
		&self.saved
	}

	/// Replace the working copy with the result of `edit`. On error the
	/// working copy is left as it was.
	///
	/// ```
	/// use fotobudka_cms::editor::{self, PageEditor, PageField};
	/// use fotobudka_cms::pages::PageRecord;
	/// use serde_json::json;
	///
	/// let mut session = PageEditor::new(PageRecord::main_page("Main"));
	/// session
	/// 	.apply(|page| editor::set_field(page, PageField::Stats, json!("1000+"), Some("clientsCount")))
	/// 	.unwrap();
	/// assert!(session.is_dirty());
	/// assert_eq!(session.working().stats.clients_count, "1000+");
	/// ```
	pub fn apply<F>(&mut self, edit: F) -> CmsResult<()>
	where
		F: FnOnce(&PageRecord) -> CmsResult<PageRecord>,
	{
		self.working = edit(&self.working)?;
		Ok(())
	}

	/// True when the working copy differs from the saved snapshot.
	pub fn is_dirty(&self) -> bool {
		self.working != self.saved
	}

	/// Throw away unsaved edits.
	pub fn discard(&mut self) {
		self.working = self.saved.clone();
	}

	/// Write the working copy through `repository`.
	pub async fn save(&mut self, repository: &PageRepository) -> CmsResult<()> {
		repository
			.update(self.saved.id, self.working.clone())
			.await?;
		self.saved = self.working.clone();
		Ok(())
	}
}
