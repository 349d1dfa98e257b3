//! Authenticated session and its persisted projection
//!
//! [`SessionStore`] is the single in-memory view of who is logged in. It is
//! hydrated from a [`KeyValueStore`] once at start-up, and every mutation
//! writes through to that store so the next process sees the same session.

use crate::error::{CoreError, CoreResult};
use crate::navigation::{LOGIN_PATH, Navigator};
use crate::storage::KeyValueStore;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Persisted storage keys for the session fields
pub struct StorageKeys;

impl StorageKeys {
    pub const TOKEN: &'static str = "token";
    pub const USER_ROLE: &'static str = "userRole";
    pub const USERNAME: &'static str = "username";

    pub const ALL: [&'static str; 3] = [Self::TOKEN, Self::USER_ROLE, Self::USERNAME];
}

/// Username that is granted superuser flags regardless of role
pub const ROOT_USERNAME: &str = "root";

/// Coarse authorization level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("USER") {
            Ok(Self::User)
        } else if s.eq_ignore_ascii_case("ADMIN") {
            Ok(Self::Admin)
        } else {
            Err(CoreError::validation(format!("unknown role: {s}")))
        }
    }
}

// Parsed through `FromStr`, so any letter case is accepted
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Snapshot of the current user's authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    role: Option<Role>,
    username: Option<String>,
}

impl Session {
    /// Session with nobody logged in
    pub const fn anonymous() -> Self {
        Self {
            token: None,
            role: None,
            username: None,
        }
    }

    /// Fully populated session
    pub fn authenticated(token: impl Into<String>, role: Role, username: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            role: Some(role),
            username: Some(username.into()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub const fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub const fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub fn is_root(&self) -> bool {
        self.username.as_deref() == Some(ROOT_USERNAME)
    }
}

/// What the HTTP layer needs from the session
pub trait SessionContext: Send + Sync {
    /// Token to present as a bearer credential, if any
    fn current_token(&self) -> Option<String>;

    /// Drop the session after the server rejected it and send the user to log in
    fn clear(&self);
}

/// Owner of the process-wide session
pub struct SessionStore {
    session: RwLock<Session>,
    storage: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionStore {
    /// Hydrate the session from `storage`
    ///
    /// Each field is read independently; missing or unreadable values leave
    /// that field absent.
    pub fn initialize(storage: Arc<dyn KeyValueStore>, navigator: Arc<dyn Navigator>) -> Self {
        let token = read_key(storage.as_ref(), StorageKeys::TOKEN).filter(|t| !t.is_empty());
        let role = read_key(storage.as_ref(), StorageKeys::USER_ROLE).and_then(|raw| {
            raw.parse::<Role>()
                .inspect_err(|e| warn!(error = %e, "Ignoring persisted role"))
                .ok()
        });
        let username = read_key(storage.as_ref(), StorageKeys::USERNAME);

        let session = Session {
            token,
            role,
            username,
        };
        debug!(
            logged_in = session.is_logged_in(),
            role = ?session.role,
            "Session initialized"
        );

        Self {
            session: RwLock::new(session),
            storage,
            navigator,
        }
    }

    /// Record a successful authentication
    ///
    /// # Errors
    ///
    /// Returns a validation error if `token` is empty; the session is left
    /// untouched in that case. Storage failures are not errors: they are
    /// logged and the in-memory session is still updated.
    pub fn login(&self, token: &str, role: Role, username: &str) -> CoreResult<()> {
        if token.is_empty() {
            return Err(CoreError::validation("token must not be empty"));
        }

        *self.write() = Session::authenticated(token, role, username);

        let entries = [
            (StorageKeys::TOKEN, token),
            (StorageKeys::USER_ROLE, role.as_str()),
            (StorageKeys::USERNAME, username),
        ];
        if let Err(e) = self.storage.set_entries(&entries) {
            warn!(error = %e, "Failed to persist session, keeping it in memory only");
            // A half-written session must not be picked up on the next start
            if let Err(e) = self.storage.remove_entries(&StorageKeys::ALL) {
                warn!(error = %e, "Failed to roll back partially persisted session");
            }
        }

        info!(username, %role, "Logged in");
        Ok(())
    }

    /// End the session and go to the login page
    pub fn logout(&self) {
        info!(username = ?self.username(), "Logging out");
        self.end_session();
    }

    /// End the session because the server no longer accepts its token
    pub fn expire(&self) {
        warn!(username = ?self.username(), "Session rejected by server, clearing it");
        self.end_session();
    }

    fn end_session(&self) {
        *self.write() = Session::anonymous();

        if let Err(e) = self.storage.remove_entries(&StorageKeys::ALL) {
            warn!(error = %e, "Failed to clear persisted session");
        }

        self.navigator.navigate(LOGIN_PATH);
    }

    /// Copy of the current session
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.read().role
    }

    pub fn username(&self) -> Option<String> {
        self.read().username.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.read().is_logged_in()
    }

    pub fn is_admin(&self) -> bool {
        self.read().is_admin()
    }

    pub fn is_root(&self) -> bool {
        self.read().is_root()
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionContext for SessionStore {
    fn current_token(&self) -> Option<String> {
        self.token()
    }

    fn clear(&self) {
        self.expire();
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.read();
        f.debug_struct("SessionStore")
            .field("logged_in", &session.is_logged_in())
            .field("role", &session.role)
            .field("username", &session.username)
            .finish_non_exhaustive()
    }
}

fn read_key(storage: &dyn KeyValueStore, key: &str) -> Option<String> {
    storage
        .get(key)
        .inspect_err(|e| warn!(key, error = %e, "Failed to read persisted session field"))
        .ok()
        .flatten()
}
