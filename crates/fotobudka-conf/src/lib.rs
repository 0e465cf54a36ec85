//! # fotobudka-conf
//!
//! Settings for the fotobudka site, read from the process environment and an
//! optional `.env` file.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fotobudka_conf::SiteSettings;
//!
//! let settings = SiteSettings::from_env().expect("invalid settings");
//! println!("pages are cached for {:?}", settings.pages_cache_ttl);
//! ```

pub mod env;
pub mod error;
pub mod settings;

pub use env::Env;
pub use error::{ConfError, ConfResult};
pub use settings::{
	DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_SEO_TITLE, DEFAULT_SITE_BASE_URL, SiteSettings,
};
