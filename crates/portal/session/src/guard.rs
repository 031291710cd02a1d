//! Role-based route guard
//!
//! A pure decision over already-resolved session state. The guard performs
//! no fetches and no retries; session resolution failures are the store's
//! problem, not the guard's.

use crate::store::SessionStore;
use portal_types::{Principal, Role};

/// What the navigation layer should do with a protected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session resolution still in flight: render a placeholder, decide
    /// nothing. Prevents a flash-redirect before the session is known.
    Pending,
    /// Not authenticated, or role not allowed. One uniform redirect target.
    RedirectToLogin,
    /// Render the protected content.
    Allow,
}

/// Guard for one protected view, configured with its role allow-list.
///
/// An empty allow-list means "any authenticated role".
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    allowed: Vec<Role>,
}

impl RouteGuard {
    pub fn any_authenticated() -> Self {
        Self::default()
    }

    pub fn allowing(roles: impl Into<Vec<Role>>) -> Self {
        Self {
            allowed: roles.into(),
        }
    }

    /// Decide against explicit state. Pure; never renders children on any
    /// non-`Allow` outcome, even transiently.
    pub fn decide(&self, principal: Option<&Principal>, loading: bool) -> GuardDecision {
        if loading {
            return GuardDecision::Pending;
        }
        let Some(principal) = principal else {
            return GuardDecision::RedirectToLogin;
        };
        if !self.allowed.is_empty() && !self.allowed.contains(&principal.role) {
            return GuardDecision::RedirectToLogin;
        }
        GuardDecision::Allow
    }

    /// Decide against the live session store.
    pub fn decide_for(&self, session: &SessionStore) -> GuardDecision {
        self.decide(session.principal().as_ref(), session.is_loading())
    }
}
