//! Command implementations

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod dossier;
pub mod enroll;

use crate::error::{CliError, CliResult};
use portal_session::{GuardDecision, RouteGuard, SessionStore};
use portal_types::Role;
use tracing::debug;

/// Refuse a command locally when the session's role is not in the allowed
/// set. The backend enforces the same rule; this only spares a round-trip.
pub fn require_role(session: &SessionStore, allowed: &[Role]) -> CliResult<()> {
    match RouteGuard::allowing(allowed.to_vec()).decide_for(session) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Pending | GuardDecision::RedirectToLogin => {
            debug!(?allowed, "command refused by the local role guard");
            Err(CliError::Forbidden(
                "veuillez vous connecter avec un compte autorisé (sgee login)".into(),
            ))
        }
    }
}
