//! Site settings

use crate::env::Env;
use crate::error::{ConfError, ConfResult};
use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

/// Title used when a page has no SEO title of its own.
pub const DEFAULT_SEO_TITLE: &str = "Fotobudka Chojnice - OG Events";

/// Public address of the production site.
pub const DEFAULT_SITE_BASE_URL: &str = "https://fotobudka-ogeventspot.pl";

/// Upload ceiling (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Settings consumed by the page repository, media library and admin login.
#[derive(Debug, Clone)]
pub struct SiteSettings {
	/// Database URL for the page store (`sqlite::memory:`, `sqlite://pages.db`, `postgres://...`)
	pub database_url: String,
	/// Maximum pooled database connections
	pub database_max_connections: u32,
	/// Directory served as the public web root; uploads go under `assets/`
	pub media_root: PathBuf,
	/// How long a fetched page set is served from cache
	pub pages_cache_ttl: Duration,
	/// Fallback `<title>` for pages without one
	pub default_seo_title: String,
	/// Absolute site URL used in the sitemap
	pub site_base_url: String,
	/// Upload size limit in bytes
	pub max_upload_bytes: u64,
	/// Admin login name
	pub admin_login: Option<String>,
	/// Admin password
	pub admin_password: Option<SecretString>,
	/// Lifetime of an admin session
	pub session_ttl: Duration,
}

impl Default for SiteSettings {
	fn default() -> Self {
		Self {
			database_url: "sqlite::memory:".to_string(),
			database_max_connections: 5,
			media_root: PathBuf::from("public"),
			pages_cache_ttl: Duration::from_secs(5 * 60),
			default_seo_title: DEFAULT_SEO_TITLE.to_string(),
			site_base_url: DEFAULT_SITE_BASE_URL.to_string(),
			max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
			admin_login: None,
			admin_password: None,
			session_ttl: Duration::from_secs(24 * 60 * 60),
		}
	}
}

impl SiteSettings {
	/// Load settings from the environment, reading `.env` first.
	///
	/// # Environment Variables
	///
	/// - `DATABASE_URL` (default `sqlite::memory:`)
	/// - `DATABASE_MAX_CONNECTIONS` (default 5)
	/// - `MEDIA_ROOT` (default `public`)
	/// - `PAGES_CACHE_TTL_SECS` (default 300)
	/// - `DEFAULT_SEO_TITLE`
	/// - `SITE_BASE_URL`
	/// - `MAX_UPLOAD_BYTES` (default 52428800)
	/// - `ADMIN_LOGIN`, `ADMIN_PASSWORD`
	/// - `SESSION_TTL_SECS` (default 86400)
	pub fn from_env() -> ConfResult<Self> {
		let env = Env::new();
		env.load_dotenv();
		Self::from_env_with(&env)
	}

	/// Load settings through a specific reader (e.g. one with a prefix).
	pub fn from_env_with(env: &Env) -> ConfResult<Self> {
		let defaults = Self::default();

		let settings = Self {
			database_url: env.str_with_default("DATABASE_URL", Some(&defaults.database_url))?,
			database_max_connections: env
				.parse_with_default("DATABASE_MAX_CONNECTIONS", defaults.database_max_connections)?,
			media_root: env.path_with_default("MEDIA_ROOT", "public")?,
			pages_cache_ttl: Duration::from_secs(
				env.parse_with_default("PAGES_CACHE_TTL_SECS", defaults.pages_cache_ttl.as_secs())?,
			),
			default_seo_title: env
				.str_with_default("DEFAULT_SEO_TITLE", Some(DEFAULT_SEO_TITLE))?,
			site_base_url: env.str_with_default("SITE_BASE_URL", Some(DEFAULT_SITE_BASE_URL))?,
			max_upload_bytes: env
				.parse_with_default("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
			admin_login: env.optional_str("ADMIN_LOGIN")?,
			admin_password: env.optional_str("ADMIN_PASSWORD")?.map(SecretString::from),
			session_ttl: Duration::from_secs(
				env.parse_with_default("SESSION_TTL_SECS", defaults.session_ttl.as_secs())?,
			),
		};

		settings.validate()?;
		tracing::debug!(
			database_url = %redact_url(&settings.database_url),
			media_root = %settings.media_root.display(),
			"Loaded site settings"
		);
		Ok(settings)
	}

	/// Check cross-field consistency.
	pub fn validate(&self) -> ConfResult<()> {
		if self.database_max_connections == 0 {
			return Err(ConfError::Invalid(
				"DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
			));
		}
		if self.max_upload_bytes == 0 {
			return Err(ConfError::Invalid(
				"MAX_UPLOAD_BYTES must be greater than zero".to_string(),
			));
		}
		if !self.site_base_url.starts_with("http://") && !self.site_base_url.starts_with("https://")
		{
			return Err(ConfError::Invalid(format!(
				"SITE_BASE_URL must be an absolute http(s) URL, got '{}'",
				self.site_base_url
			)));
		}
		if self.admin_login.is_some() != self.admin_password.is_some() {
			return Err(ConfError::Invalid(
				"ADMIN_LOGIN and ADMIN_PASSWORD must be set together".to_string(),
			));
		}
		Ok(())
	}

	/// True when admin credentials are configured.
	pub fn admin_configured(&self) -> bool {
		self.admin_login.is_some() && self.admin_password.is_some()
	}
}

/// Strip credentials from a database URL for logging.
fn redact_url(url: &str) -> String {
	match (url.find("://"), url.rfind('@')) {
		(Some(scheme_end), Some(at)) if at > scheme_end => {
			format!("{}://***{}", &url[..scheme_end], &url[at..])
		}
		_ => url.to_string(),
	}
}
