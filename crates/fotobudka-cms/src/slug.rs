//! Slug helpers

use crate::error::{CmsError, CmsResult};
use crate::pages::MAIN_PAGE_SLUG;

/// Prefix a slug with `/` unless it already has one.
///
/// ```
/// use fotobudka_cms::slug::normalize_slug;
///
/// assert_eq!(normalize_slug("gdansk"), "/gdansk");
/// assert_eq!(normalize_slug("/gdansk"), "/gdansk");
/// ```
pub fn normalize_slug(slug: &str) -> String {
	let slug = slug.trim();
	if slug.starts_with('/') {
		slug.to_string()
	} else {
		format!("/{}", slug)
	}
}

/// Suggest a slug for a page name: transliterated, lowercase, hyphenated,
/// with a leading `/`.
///
/// ```
/// use fotobudka_cms::slug::slug_from_name;
///
/// assert_eq!(slug_from_name("Starogard Gdański"), "/starogard-gdanski");
/// ```
pub fn slug_from_name(name: &str) -> String {
	format!("/{}", slug::slugify(name))
}

/// Check that a slug is usable as a page path.
pub fn validate_slug(slug: &str) -> CmsResult<()> {
	if slug == MAIN_PAGE_SLUG {
		return Ok(());
	}
	let Some(path) = slug.strip_prefix('/') else {
		return Err(CmsError::validation("slug", "must start with '/'"));
	};
	if path.is_empty() {
		return Err(CmsError::validation("slug", "must not be empty"));
	}
	if path.starts_with('/') || path.contains("//") {
		return Err(CmsError::validation("slug", "must not contain empty segments"));
	}
	if let Some(c) = path
		.chars()
		.find(|c| c.is_whitespace() || matches!(c, '?' | '#' | '%' | '\\'))
	{
		return Err(CmsError::validation(
			"slug",
			format!("must not contain {:?}", c),
		));
	}
	Ok(())
}
