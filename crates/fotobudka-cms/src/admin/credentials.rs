//! Login/password identity provider

use super::{AdminSession, IdentityProvider, SessionEvent};
use crate::error::{CmsError, CmsResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fotobudka_conf::SiteSettings;
use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

const EVENT_CAPACITY: usize = 16;

/// Single admin account configured through `ADMIN_LOGIN` / `ADMIN_PASSWORD`.
pub struct CredentialIdentityProvider {
	login: String,
	password: SecretString,
	session_ttl: Duration,
	session: Mutex<Option<AdminSession>>,
	events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for CredentialIdentityProvider {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CredentialIdentityProvider")
			.field("login", &self.login)
			.field("session_ttl", &self.session_ttl)
			.finish_non_exhaustive()
	}
}

impl CredentialIdentityProvider {
	/// Provider for one login/password pair.
	pub fn new(login: impl Into<String>, password: SecretString, session_ttl: Duration) -> Self {
		let (events, _) = broadcast::channel(EVENT_CAPACITY);
		Self {
			login: login.into(),
			password,
			session_ttl,
			session: Mutex::new(None),
			events,
		}
	}

	/// Provider from site settings.
	///
	/// # Errors
	///
	/// `CmsError::Configuration` when admin credentials are not set.
	pub fn from_settings(settings: &SiteSettings) -> CmsResult<Self> {
		match (&settings.admin_login, &settings.admin_password) {
			(Some(login), Some(password)) => {
				Ok(Self::new(login.clone(), password.clone(), settings.session_ttl))
			}
			_ => Err(CmsError::Configuration(
				"ADMIN_LOGIN and ADMIN_PASSWORD must be set".to_string(),
			)),
		}
	}

	fn notify(&self, event: SessionEvent) {
		// No subscribers is fine
		let _ = self.events.send(event);
	}
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
	chrono::Duration::from_std(ttl)
		.ok()
		.and_then(|ttl| now.checked_add_signed(ttl))
		.unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Compare secrets without leaking where they differ or how long they are.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
	use sha2::{Digest, Sha256};
	use subtle::ConstantTimeEq;

	let hash_a = Sha256::digest(a);
	let hash_b = Sha256::digest(b);
	hash_a.ct_eq(&hash_b).into()
}

#[async_trait]
impl IdentityProvider for CredentialIdentityProvider {
	async fn current_session(&self) -> CmsResult<Option<AdminSession>> {
		let expired = {
			let mut session = self.session.lock();
			match session.as_ref() {
				Some(current) if current.is_expired_at(Utc::now()) => {
					session.take();
					true
				}
				Some(current) => return Ok(Some(current.clone())),
				None => return Ok(None),
			}
		};
		if expired {
			tracing::info!(login = %self.login, "Admin session expired");
			self.notify(SessionEvent::SignedOut);
		}
		Ok(None)
	}

	fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
		self.events.subscribe()
	}

	async fn sign_in_with_credentials(
		&self,
		login: &str,
		password: &str,
	) -> CmsResult<AdminSession> {
		let login_ok = constant_time_eq(login.as_bytes(), self.login.as_bytes());
		let password_ok =
			constant_time_eq(password.as_bytes(), self.password.expose_secret().as_bytes());
		if !(login_ok & password_ok) {
			tracing::warn!("Rejected admin sign-in");
			return Err(CmsError::InvalidCredentials);
		}

		let now = Utc::now();
		let session = AdminSession {
			token: Uuid::new_v4(),
			login: self.login.clone(),
			issued_at: now,
			expires_at: expiry(now, self.session_ttl),
		};
		*self.session.lock() = Some(session.clone());

		tracing::info!(login = %self.login, "Admin signed in");
		self.notify(SessionEvent::SignedIn(session.clone()));
		Ok(session)
	}

	async fn sign_out(&self) -> CmsResult<()> {
		let previous = self.session.lock().take();
		if previous.is_some() {
			tracing::info!(login = %self.login, "Admin signed out");
			self.notify(SessionEvent::SignedOut);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_constant_time_eq() {
		assert!(constant_time_eq(b"hunter2", b"hunter2"));
		assert!(!constant_time_eq(b"hunter2", b"hunter3"));
		assert!(!constant_time_eq(b"", b"hunter2"));
	}

	#[rstest]
	fn test_expiry_saturates() {
		let now = Utc::now();
		assert_eq!(expiry(now, Duration::MAX), DateTime::<Utc>::MAX_UTC);
		assert_eq!(expiry(now, Duration::ZERO), now);
	}
}
