//! Client Session State
//!
//! The handful of string keys the portal persists between visits: tokens,
//! the serialized user, the authentication flag and the password-reset
//! wizard's scratch values. The browser keeps them in `localStorage`; the
//! CLI keeps them in a JSON file (see [`file`]).

#[cfg(feature = "native")]
pub mod file;

use std::collections::BTreeMap;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::model::{AuthUser, LoginData, Nurse};

#[cfg(feature = "native")]
pub use file::FileSessionStore;

/// Persisted key names
pub mod keys {
    pub const ACCESS_TOKEN: &str = "accessToken";
    pub const REFRESH_TOKEN: &str = "refreshToken";
    pub const USER: &str = "user";
    pub const IS_AUTHENTICATED: &str = "isAuthenticated";
    pub const TEMP_AUTH_FLOW: &str = "tempAuthFlow";
    pub const TEMP_ACCESS_TOKEN: &str = "temp_access_token";
}

/// String key/value storage backing a session
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
}

impl<T: SessionStore + ?Sized> SessionStore for std::rc::Rc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        (**self).remove(key)
    }
}

impl<T: SessionStore + ?Sized> SessionStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        (**self).remove(key)
    }
}

/// In-process store, used by tests and one-shot tools
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything currently stored
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        values.remove(key);
        Ok(())
    }
}

/// Typed view over a [`SessionStore`]
#[derive(Debug, Clone)]
pub struct Session<S> {
    store: S,
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn access_token(&self) -> Option<String> {
        self.store
            .get(keys::ACCESS_TOKEN)
            .filter(|t| !t.is_empty())
    }

    pub fn set_access_token(&self, token: &str) -> ClientResult<()> {
        self.store.set(keys::ACCESS_TOKEN, token)
    }

    pub fn remove_access_token(&self) -> ClientResult<()> {
        self.store.remove(keys::ACCESS_TOKEN)
    }

    /// The stored user, if any and if it still parses
    pub fn user(&self) -> Option<AuthUser> {
        let raw = self.store.get(keys::USER)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Discarding unreadable stored user: {}", e);
                None
            }
        }
    }

    /// Exactly the string `"true"` counts as signed in
    pub fn is_authenticated(&self) -> bool {
        self.store.get(keys::IS_AUTHENTICATED).as_deref() == Some("true")
    }

    /// Persist a successful login; returns the flag that was written
    pub fn store_login(&self, login: &LoginData) -> ClientResult<bool> {
        let user =
            serde_json::to_string(&login.user).map_err(|e| ClientError::Storage(e.to_string()))?;
        let authenticated = !login.user.needs_password_reset();

        self.store.set(keys::ACCESS_TOKEN, &login.tokens.access_token)?;
        self.store
            .set(keys::REFRESH_TOKEN, &login.tokens.refresh_token)?;
        self.store.set(keys::USER, &user)?;
        self.store
            .set(keys::IS_AUTHENTICATED, bool_flag(authenticated))?;

        debug!(user = %login.user.email, authenticated, "Stored login");
        Ok(authenticated)
    }

    /// Drop every auth key; used when the backend answers 401
    pub fn clear_auth(&self) -> ClientResult<()> {
        for key in [
            keys::ACCESS_TOKEN,
            keys::REFRESH_TOKEN,
            keys::USER,
            keys::IS_AUTHENTICATED,
        ] {
            self.store.remove(key)?;
        }
        Ok(())
    }

    /// Sign out: tokens and user removed, flag explicitly `"false"`
    pub fn logout(&self) -> ClientResult<()> {
        self.store.remove(keys::ACCESS_TOKEN)?;
        self.store.remove(keys::REFRESH_TOKEN)?;
        self.store.remove(keys::USER)?;
        self.store.set(keys::IS_AUTHENTICATED, bool_flag(false))
    }

    pub fn begin_temp_flow(&self) -> ClientResult<()> {
        self.store.set(keys::TEMP_AUTH_FLOW, "true")
    }

    pub fn in_temp_flow(&self) -> bool {
        self.store.get(keys::TEMP_AUTH_FLOW).as_deref() == Some("true")
    }

    pub fn temp_access_token(&self) -> Option<String> {
        self.store
            .get(keys::TEMP_ACCESS_TOKEN)
            .filter(|t| !t.is_empty())
    }

    pub fn set_temp_access_token(&self, token: &str) -> ClientResult<()> {
        self.store.set(keys::TEMP_ACCESS_TOKEN, token)
    }

    pub fn remove_temp_access_token(&self) -> ClientResult<()> {
        self.store.remove(keys::TEMP_ACCESS_TOKEN)
    }

    /// Forget the wizard's scratch keys
    pub fn clear_temp_flow(&self) -> ClientResult<()> {
        self.store.remove(keys::TEMP_AUTH_FLOW)?;
        self.store.remove(keys::TEMP_ACCESS_TOKEN)
    }
}

fn bool_flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// The signed-in nurse, resolved once after login and passed around by value
#[derive(Debug, Clone, PartialEq)]
pub struct NurseSession {
    pub user: AuthUser,
    pub nurse: Nurse,
}

impl NurseSession {
    pub fn new(user: AuthUser, nurse: Nurse) -> Self {
        Self { user, nurse }
    }

    pub fn nurse_id(&self) -> &str {
        &self.nurse.id
    }

    pub fn school_id(&self) -> Option<&str> {
        self.nurse.school_id()
    }

    /// School id, or a validation error naming the missing field
    pub fn require_school(&self) -> ClientResult<&str> {
        self.school_id()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ClientError::invalid("schoolId", "No school is linked to this nurse"))
    }

    pub fn display_name(&self) -> &str {
        if self.nurse.name.is_empty() {
            &self.user.email
        } else {
            &self.nurse.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AuthTokens;

    fn login(first: bool, reset: bool) -> LoginData {
        LoginData {
            user: AuthUser {
                id: "u1".into(),
                email: "nurse@school.in".into(),
                is_first_login: first,
                password_reset_required: reset,
                ..AuthUser::default()
            },
            tokens: AuthTokens {
                access_token: "acc".into(),
                refresh_token: "ref".into(),
            },
        }
    }

    #[test]
    fn test_store_login_sets_flag() {
        let session = Session::new(MemorySessionStore::new());
        assert!(session.store_login(&login(false, false)).unwrap());
        assert!(session.is_authenticated());
        assert_eq!(session.access_token().as_deref(), Some("acc"));
        assert_eq!(session.user().unwrap().email, "nurse@school.in");
    }

    #[test]
    fn test_forced_reset_is_not_authenticated() {
        let session = Session::new(MemorySessionStore::new());
        assert!(!session.store_login(&login(true, false)).unwrap());
        assert!(!session.is_authenticated());
        assert_eq!(session.store().get(keys::IS_AUTHENTICATED).as_deref(), Some("false"));

        let session = Session::new(MemorySessionStore::new());
        assert!(!session.store_login(&login(false, true)).unwrap());
    }

    #[test]
    fn test_clear_auth_removes_keys() {
        let session = Session::new(MemorySessionStore::new());
        session.store_login(&login(false, false)).unwrap();
        session.begin_temp_flow().unwrap();
        session.clear_auth().unwrap();

        let left = session.store().snapshot();
        assert_eq!(left.keys().collect::<Vec<_>>(), vec![keys::TEMP_AUTH_FLOW]);
    }

    #[test]
    fn test_logout_writes_false() {
        let session = Session::new(MemorySessionStore::new());
        session.store_login(&login(false, false)).unwrap();
        session.logout().unwrap();

        assert!(!session.is_authenticated());
        assert!(session.access_token().is_none());
        assert!(session.user().is_none());
    }
}
