//! Session presence and the identity provider port.
//!
//! The provider wraps external authentication. The rest of the system only
//! needs to know whether a session exists, whose it is, and whether it may
//! open the admin panel.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};

use crate::error::CoreError;
use crate::roles::{ANONYMOUS_USER_ID, ROLE_ADMIN};
use crate::types::EntityId;

/// Buffer capacity of the session-change channel.
const SESSION_EVENT_CAPACITY: usize = 64;

/// The signed-in user as seen by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: EntityId,
    pub role: String,
}

impl SessionUser {
    pub fn new(user_id: EntityId, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Owner recorded for a submission made under `session`.
pub fn owner_for(session: Option<&SessionUser>) -> EntityId {
    session.map_or(ANONYMOUS_USER_ID, |s| s.user_id)
}

/// Fails with `Unauthorized` when no session is present.
pub fn require_session(session: Option<&SessionUser>) -> Result<&SessionUser, CoreError> {
    session.ok_or_else(|| CoreError::Unauthorized("A signed-in session is required".into()))
}

/// Whether the admin panel may be shown for `session`.
pub fn can_access_admin_panel(session: Option<&SessionUser>) -> bool {
    session.is_some_and(SessionUser::is_admin)
}

/// Session change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(SessionUser),
    SignedOut,
}

/// Supported OAuth sign-in providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OAuthProvider {
    Google,
    Github,
    Discord,
}

impl OAuthProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
            Self::Discord => "discord",
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_session(&self) -> Option<SessionUser>;

    /// Receive a [`SessionEvent`] on every sign-in and sign-out.
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;

    /// Send a passwordless sign-in link to `email`.
    async fn sign_in_with_magic_link(&self, email: &str) -> Result<(), CoreError>;

    /// Start an OAuth sign-in. Returns the URL to redirect the browser to.
    async fn sign_in_with_provider(&self, provider: OAuthProvider) -> Result<String, CoreError>;

    async fn sign_out(&self) -> Result<(), CoreError>;
}

/// Identity provider that keeps the session in memory.
///
/// Sign-in flows complete through [`InMemoryIdentityProvider::complete_sign_in`],
/// standing in for the callback of the external provider.
pub struct InMemoryIdentityProvider {
    authorize_base_url: String,
    session: RwLock<Option<SessionUser>>,
    magic_links: RwLock<Vec<String>>,
    sender: broadcast::Sender<SessionEvent>,
}

impl InMemoryIdentityProvider {
    pub fn new(authorize_base_url: impl Into<String>) -> Self {
        let (sender, _) = broadcast::channel(SESSION_EVENT_CAPACITY);
        Self {
            authorize_base_url: authorize_base_url.into().trim_end_matches('/').to_string(),
            session: RwLock::new(None),
            magic_links: RwLock::new(Vec::new()),
            sender,
        }
    }

    /// Establish `user` as the current session and notify subscribers.
    pub async fn complete_sign_in(&self, user: SessionUser) {
        *self.session.write().await = Some(user.clone());
        let _ = self.sender.send(SessionEvent::SignedIn(user));
    }

    /// Addresses a magic link was sent to, oldest first.
    pub async fn sent_magic_links(&self) -> Vec<String> {
        self.magic_links.read().await.clone()
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new("http://localhost:3000/auth")
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn current_session(&self) -> Option<SessionUser> {
        self.session.read().await.clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    async fn sign_in_with_magic_link(&self, email: &str) -> Result<(), CoreError> {
        let email = email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => {
                return Err(CoreError::Validation(format!(
                    "'{email}' is not a valid email address"
                )))
            }
        }
        self.magic_links.write().await.push(email.to_string());
        tracing::info!(%email, "Magic link requested");
        Ok(())
    }

    async fn sign_in_with_provider(&self, provider: OAuthProvider) -> Result<String, CoreError> {
        Ok(format!(
            "{}/authorize?provider={}",
            self.authorize_base_url,
            provider.as_str()
        ))
    }

    async fn sign_out(&self) -> Result<(), CoreError> {
        let previous = self.session.write().await.take();
        if previous.is_some() {
            let _ = self.sender.send(SessionEvent::SignedOut);
        }
        Ok(())
    }
}
