//! The session store: construction (`restore`) to teardown (`clear`)
//!
//! `is_authenticated` is derived from the presence of a principal; it is
//! never stored, so it cannot drift from the state it describes.

use crate::error::{SessionError, SessionResult};
use crate::storage::{
    CredentialStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY,
};
use portal_types::{CredentialPair, Principal, Role};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct SessionState {
    principal: Option<Principal>,
    credentials: Option<CredentialPair>,
    /// True until `restore()` has run
    loading: bool,
}

/// Holds the authenticated principal and token pair for one process.
///
/// All mutations replace the held values wholesale; there is no partial
/// update to race against.
pub struct SessionStore {
    storage: Box<dyn CredentialStore>,
    state: RwLock<SessionState>,
    restored: AtomicBool,
}

impl SessionStore {
    /// Create an unrestored store. Call [`restore`](Self::restore) before
    /// consulting it.
    pub fn new(storage: Box<dyn CredentialStore>) -> Self {
        Self {
            storage,
            state: RwLock::new(SessionState {
                principal: None,
                credentials: None,
                loading: true,
            }),
            restored: AtomicBool::new(false),
        }
    }

    /// Optimistically reload persisted session state, without a network
    /// call. Idempotent: only the first invocation touches storage, later
    /// ones observe the already-restored state.
    pub fn restore(&self) -> SessionResult<()> {
        if self.restored.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        // A failed read must not consume the one restore attempt, or the
        // store would stay loading forever.
        self.restore_inner().inspect_err(|_| {
            self.restored.store(false, Ordering::SeqCst);
        })
    }

    fn restore_inner(&self) -> SessionResult<()> {
        let access = self.storage.get(ACCESS_TOKEN_KEY)?;
        let refresh = self.storage.get(REFRESH_TOKEN_KEY)?;
        let user = self.storage.get(USER_KEY)?;

        let mut state = self.lock_write()?;
        state.loading = false;

        let (Some(access), Some(refresh), Some(user)) = (access, refresh, user) else {
            debug!("no persisted session, starting unauthenticated");
            return Ok(());
        };

        match serde_json::from_str::<Principal>(&user) {
            Ok(principal) => {
                debug!(role = %principal.role, "session restored");
                state.credentials = Some(CredentialPair::new(access, refresh));
                state.principal = Some(principal);
            }
            Err(err) => {
                // A corrupt principal is treated as no session at all.
                warn!(%err, "discarding unreadable persisted principal");
                drop(state);
                self.storage.clear()?;
            }
        }
        Ok(())
    }

    /// Commit a successful login or registration: replace both the held and
    /// the persisted state, and hand back the role's landing route.
    pub fn commit_login(
        &self,
        credentials: CredentialPair,
        principal: Principal,
    ) -> SessionResult<&'static str> {
        self.storage.set(ACCESS_TOKEN_KEY, &credentials.access)?;
        self.storage.set(REFRESH_TOKEN_KEY, &credentials.refresh)?;
        self.storage
            .set(USER_KEY, &serde_json::to_string(&principal)?)?;

        let route = principal.role.landing_route();
        let mut state = self.lock_write()?;
        state.loading = false;
        state.credentials = Some(credentials);
        state.principal = Some(principal);
        Ok(route)
    }

    /// Rotate only the access token, as the refresh path does.
    pub fn rotate_access(&self, access: &str) -> SessionResult<()> {
        let mut state = self.lock_write()?;
        let Some(credentials) = state.credentials.as_ref() else {
            return Err(SessionError::Storage(
                "cannot rotate access token without a session".into(),
            ));
        };
        let rotated = credentials.with_access(access);
        self.storage.set(ACCESS_TOKEN_KEY, &rotated.access)?;
        state.credentials = Some(rotated);
        Ok(())
    }

    /// Overwrite the stored principal after a profile re-fetch.
    pub fn commit_profile(&self, principal: Principal) -> SessionResult<()> {
        self.storage
            .set(USER_KEY, &serde_json::to_string(&principal)?)?;
        let mut state = self.lock_write()?;
        state.principal = Some(principal);
        Ok(())
    }

    /// Unconditional local teardown. Succeeds even when persistence fails,
    /// so the client can never be left looking authenticated.
    pub fn clear(&self) {
        {
            // In-memory state first: it is the authority for is_authenticated.
            if let Ok(mut state) = self.state.write() {
                state.principal = None;
                state.credentials = None;
                state.loading = false;
            }
        }
        if let Err(err) = self.storage.clear() {
            warn!(%err, "failed to clear persisted session");
        }
    }

    /// True iff a principal is currently held. Derived, never set.
    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .map(|s| s.principal.is_some())
            .unwrap_or(false)
    }

    /// True until `restore()` has completed.
    pub fn is_loading(&self) -> bool {
        self.state.read().map(|s| s.loading).unwrap_or(true)
    }

    pub fn principal(&self) -> Option<Principal> {
        self.state.read().ok().and_then(|s| s.principal.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.state
            .read()
            .ok()
            .and_then(|s| s.principal.as_ref().map(|p| p.role))
    }

    pub fn access_token(&self) -> Option<String> {
        self.state
            .read()
            .ok()
            .and_then(|s| s.credentials.as_ref().map(|c| c.access.clone()))
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.state
            .read()
            .ok()
            .and_then(|s| s.credentials.as_ref().map(|c| c.refresh.clone()))
    }

    fn lock_write(&self) -> SessionResult<std::sync::RwLockWriteGuard<'_, SessionState>> {
        self.state
            .write()
            .map_err(|e| SessionError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryCredentialStore;
    use portal_types::UserId;

    fn principal(role: Role) -> Principal {
        Principal {
            id: UserId::new(1),
            email: "a@b.cm".into(),
            role,
            last_name: "Ngo".into(),
            first_name: "Bi".into(),
            program: None,
        }
    }

    fn store_with(entries: &[(&str, &str)]) -> SessionStore {
        let storage = InMemoryCredentialStore::new();
        for (k, v) in entries {
            storage.set(k, v).unwrap();
        }
        SessionStore::new(Box::new(storage))
    }

    #[test]
    fn test_restore_without_persisted_state() {
        let store = store_with(&[]);
        assert!(store.is_loading());
        store.restore().unwrap();
        assert!(!store.is_loading());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_restore_is_idempotent() {
        let user = serde_json::to_string(&principal(Role::Candidate)).unwrap();
        let store = store_with(&[
            (ACCESS_TOKEN_KEY, "a"),
            (REFRESH_TOKEN_KEY, "r"),
            (USER_KEY, &user),
        ]);
        store.restore().unwrap();
        let first = (store.is_authenticated(), store.principal());
        store.restore().unwrap();
        let second = (store.is_authenticated(), store.principal());
        assert_eq!(first, second);
        assert!(first.0);
    }

    /// Fails every read while the flag is raised; writes go through.
    struct FlakyStore {
        inner: InMemoryCredentialStore,
        failing: std::sync::Arc<AtomicBool>,
    }

    impl CredentialStore for FlakyStore {
        fn get(&self, key: &str) -> SessionResult<Option<String>> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(SessionError::Storage("backend unavailable".into()));
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> SessionResult<()> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> SessionResult<()> {
            self.inner.remove(key)
        }

        fn clear(&self) -> SessionResult<()> {
            self.inner.clear()
        }
    }

    #[test]
    fn test_failed_restore_does_not_consume_the_attempt() {
        let failing = std::sync::Arc::new(AtomicBool::new(true));
        let inner = InMemoryCredentialStore::new();
        let user = serde_json::to_string(&principal(Role::Candidate)).unwrap();
        inner.set(ACCESS_TOKEN_KEY, "a").unwrap();
        inner.set(REFRESH_TOKEN_KEY, "r").unwrap();
        inner.set(USER_KEY, &user).unwrap();
        let store = SessionStore::new(Box::new(FlakyStore {
            inner,
            failing: failing.clone(),
        }));

        assert!(store.restore().is_err());
        assert!(store.is_loading());

        failing.store(false, Ordering::SeqCst);
        store.restore().unwrap();
        assert!(!store.is_loading());
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_corrupt_principal_clears_storage() {
        let store = store_with(&[
            (ACCESS_TOKEN_KEY, "a"),
            (REFRESH_TOKEN_KEY, "r"),
            (USER_KEY, "not json"),
        ]);
        store.restore().unwrap();
        assert!(!store.is_authenticated());
        assert!(store.access_token().is_none());
    }

    #[test]
    fn test_login_yields_landing_route() {
        let store = store_with(&[]);
        store.restore().unwrap();
        let route = store
            .commit_login(CredentialPair::new("a", "r"), principal(Role::ProgramManager))
            .unwrap();
        assert_eq!(route, "/respfiliere/dashboard");
        assert!(store.is_authenticated());
        assert_eq!(store.access_token().as_deref(), Some("a"));
    }

    #[test]
    fn test_clear_is_unconditional() {
        let store = store_with(&[]);
        store.restore().unwrap();
        store
            .commit_login(CredentialPair::new("a", "r"), principal(Role::Candidate))
            .unwrap();
        store.clear();
        assert!(!store.is_authenticated());
        assert!(store.refresh_token().is_none());
    }

    #[test]
    fn test_rotate_access_keeps_refresh() {
        let store = store_with(&[]);
        store.restore().unwrap();
        store
            .commit_login(CredentialPair::new("a1", "r"), principal(Role::Candidate))
            .unwrap();
        store.rotate_access("a2").unwrap();
        assert_eq!(store.access_token().as_deref(), Some("a2"));
        assert_eq!(store.refresh_token().as_deref(), Some("r"));
    }

    #[test]
    fn test_rotate_without_session_fails() {
        let store = store_with(&[]);
        store.restore().unwrap();
        assert!(store.rotate_access("a").is_err());
    }
}
