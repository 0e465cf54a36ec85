//! Admin session guard
//!
//! The admin panel is only shown to an authenticated session. The guard
//! starts out undecided, asks the identity provider for the current session
//! and then follows sign-in and sign-out notifications until it is dropped.
//!
//! ```rust,no_run
//! use fotobudka_cms::admin::{AdminSessionGuard, CredentialIdentityProvider, GuardDecision, IdentityProvider};
//! use secrecy::SecretString;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let provider = Arc::new(CredentialIdentityProvider::new(
//! 	"admin",
//! 	SecretString::from("hunter2"),
//! 	Duration::from_secs(3600),
//! ));
//! let guard = AdminSessionGuard::mount(provider.clone());
//! guard.wait_resolved().await;
//! assert_eq!(guard.decision(), GuardDecision::RedirectToLogin);
//!
//! provider.sign_in_with_credentials("admin", "hunter2").await.unwrap();
//! # }
//! ```

use crate::error::CmsResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

mod credentials;

pub use credentials::CredentialIdentityProvider;

/// An authenticated admin session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
	/// Session token
	pub token: Uuid,
	/// Admin login name
	pub login: String,
	/// Sign-in time
	pub issued_at: DateTime<Utc>,
	/// Time after which the session is no longer valid
	pub expires_at: DateTime<Utc>,
}

impl AdminSession {
	/// True once `now` has reached the expiry time.
	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		now >= self.expires_at
	}
}

/// Session change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
	/// A session started
	SignedIn(AdminSession),
	/// The session ended (sign-out or expiry)
	SignedOut,
}

/// Source of admin identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
	/// Session currently in effect, if any.
	async fn current_session(&self) -> CmsResult<Option<AdminSession>>;

	/// Receive session changes. Dropping the receiver unsubscribes.
	fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;

	/// Start a session from a login and password.
	async fn sign_in_with_credentials(&self, login: &str, password: &str)
	-> CmsResult<AdminSession>;

	/// End the current session.
	async fn sign_out(&self) -> CmsResult<()>;
}

/// What the guard knows about the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
	/// Not determined yet
	#[default]
	Unknown,
	/// Signed in
	Authenticated(AdminSession),
	/// Signed out
	Anonymous,
}

/// What the admin route should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
	/// Show a loading indicator
	Pending,
	/// Render the admin panel
	Allow,
	/// Send the user to the login form
	RedirectToLogin,
}

/// Follows the admin session for as long as it is alive.
#[derive(Debug)]
pub struct AdminSessionGuard {
	state: watch::Receiver<SessionState>,
	task: JoinHandle<()>,
}

impl AdminSessionGuard {
	/// Start following `provider`. Must be called inside a tokio runtime.
	pub fn mount(provider: Arc<dyn IdentityProvider>) -> Self {
		let (tx, rx) = watch::channel(SessionState::Unknown);
		// Subscribe before the first query so no change is missed
		let mut events = provider.subscribe();

		let task = tokio::spawn(async move {
			let initial = query_state(provider.as_ref()).await;
			if tx.send(initial).is_err() {
				return;
			}

			loop {
				let next = match events.recv().await {
					Ok(SessionEvent::SignedIn(session)) => SessionState::Authenticated(session),
					Ok(SessionEvent::SignedOut) => SessionState::Anonymous,
					Err(RecvError::Lagged(skipped)) => {
						tracing::warn!(skipped, "Missed session events, re-reading session");
						query_state(provider.as_ref()).await
					}
					Err(RecvError::Closed) => break,
				};
				if tx.send(next).is_err() {
					break;
				}
			}
			tracing::debug!("Session guard stopped");
		});

		Self { state: rx, task }
	}

	/// Current state.
	pub fn state(&self) -> SessionState {
		self.state.borrow().clone()
	}

	/// Receiver that observes every state change.
	pub fn watch(&self) -> watch::Receiver<SessionState> {
		self.state.clone()
	}

	/// Routing decision for the current state. An authenticated session
	/// past its expiry redirects to login.
	pub fn decision(&self) -> GuardDecision {
		match &*self.state.borrow() {
			SessionState::Unknown => GuardDecision::Pending,
			SessionState::Authenticated(session) if !session.is_expired_at(Utc::now()) => {
				GuardDecision::Allow
			}
			SessionState::Authenticated(_) | SessionState::Anonymous => {
				GuardDecision::RedirectToLogin
			}
		}
	}

	/// Wait until the state is no longer [`SessionState::Unknown`].
	pub async fn wait_resolved(&self) -> SessionState {
		let mut rx = self.state.clone();
		if let Ok(state) = rx
			.wait_for(|state| !matches!(state, SessionState::Unknown))
			.await
		{
			return state.clone();
		}
		let state = rx.borrow().clone();
		state
	}
}

impl Drop for AdminSessionGuard {
	fn drop(&mut self) {
		self.task.abort();
	}
}

async fn query_state(provider: &dyn IdentityProvider) -> SessionState {
	match provider.current_session().await {
		Ok(Some(session)) => SessionState::Authenticated(session),
		Ok(None) => SessionState::Anonymous,
		Err(e) => {
			tracing::warn!(error = %e, "Could not read admin session");
			SessionState::Anonymous
		}
	}
}
