//! Integration tests for loading SiteSettings from the environment.

use fotobudka_conf::{ConfError, DEFAULT_SEO_TITLE, Env, SiteSettings};
use rstest::*;
use secrecy::ExposeSecret;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const PREFIX: &str = "FOTOBUDKA_SETTINGS_TEST_";

const KEYS: &[&str] = &[
	"DATABASE_URL",
	"DATABASE_MAX_CONNECTIONS",
	"MEDIA_ROOT",
	"PAGES_CACHE_TTL_SECS",
	"DEFAULT_SEO_TITLE",
	"SITE_BASE_URL",
	"MAX_UPLOAD_BYTES",
	"ADMIN_LOGIN",
	"ADMIN_PASSWORD",
	"SESSION_TTL_SECS",
];

fn clear_env() {
	for key in KEYS {
		unsafe {
			env::remove_var(format!("{}{}", PREFIX, key));
		}
	}
}

fn set(key: &str, value: &str) {
	unsafe {
		env::set_var(format!("{}{}", PREFIX, key), value);
	}
}

#[fixture]
fn prefixed_env() -> Env {
	clear_env();
	Env::new().with_prefix(PREFIX)
}

#[rstest]
#[serial(site_settings_env)]
fn test_defaults_when_nothing_is_set(prefixed_env: Env) {
	let settings = SiteSettings::from_env_with(&prefixed_env).unwrap();

	assert_eq!(settings.database_url, "sqlite::memory:");
	assert_eq!(settings.media_root, PathBuf::from("public"));
	assert_eq!(settings.pages_cache_ttl, Duration::from_secs(300));
	assert_eq!(settings.default_seo_title, DEFAULT_SEO_TITLE);
	assert_eq!(settings.max_upload_bytes, 50 * 1024 * 1024);
	assert!(!settings.admin_configured());
}

#[rstest]
#[serial(site_settings_env)]
fn test_values_are_read_from_env(prefixed_env: Env) {
	set("DATABASE_URL", "sqlite://pages.db");
	set("MEDIA_ROOT", "/srv/www/public");
	set("PAGES_CACHE_TTL_SECS", "60");
	set("ADMIN_LOGIN", "admin@ogevents.pl");
	set("ADMIN_PASSWORD", "hunter2");

	let settings = SiteSettings::from_env_with(&prefixed_env).unwrap();
	clear_env();

	assert_eq!(settings.database_url, "sqlite://pages.db");
	assert_eq!(settings.media_root, PathBuf::from("/srv/www/public"));
	assert_eq!(settings.pages_cache_ttl, Duration::from_secs(60));
	assert_eq!(settings.admin_login.as_deref(), Some("admin@ogevents.pl"));
	assert_eq!(
		settings.admin_password.as_ref().unwrap().expose_secret(),
		"hunter2"
	);
}

#[rstest]
#[serial(site_settings_env)]
fn test_password_is_redacted_in_debug(prefixed_env: Env) {
	set("ADMIN_LOGIN", "admin");
	set("ADMIN_PASSWORD", "very-secret-value");

	let settings = SiteSettings::from_env_with(&prefixed_env).unwrap();
	clear_env();

	let debug = format!("{:?}", settings);
	assert!(!debug.contains("very-secret-value"));
}

#[rstest]
#[serial(site_settings_env)]
fn test_unparseable_number_is_reported(prefixed_env: Env) {
	set("PAGES_CACHE_TTL_SECS", "five minutes");

	let err = SiteSettings::from_env_with(&prefixed_env).unwrap_err();
	clear_env();

	match err {
		ConfError::ParseError { key, value_len, .. } => {
			assert_eq!(key, format!("{}PAGES_CACHE_TTL_SECS", PREFIX));
			assert_eq!(value_len, "five minutes".len());
		}
		other => panic!("unexpected error: {other:?}"),
	}
}

#[rstest]
#[serial(site_settings_env)]
fn test_login_without_password_is_invalid(prefixed_env: Env) {
	set("ADMIN_LOGIN", "admin");

	let result = SiteSettings::from_env_with(&prefixed_env);
	clear_env();

	assert!(matches!(result, Err(ConfError::Invalid(_))));
}

#[rstest]
#[serial(site_settings_env)]
fn test_relative_base_url_is_invalid(prefixed_env: Env) {
	set("SITE_BASE_URL", "fotobudka-ogeventspot.pl");

	let result = SiteSettings::from_env_with(&prefixed_env);
	clear_env();

	assert!(matches!(result, Err(ConfError::Invalid(_))));
}
