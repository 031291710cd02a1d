//! The authenticated identity and its token pair

use crate::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-issued account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// The authenticated user as returned by the backend.
///
/// Owned exclusively by the session store; everything else holds a clone or
/// a borrow and never mutates it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,

    pub email: String,

    pub role: Role,

    /// Family name
    #[serde(rename = "nom")]
    pub last_name: String,

    /// Given name
    #[serde(rename = "prenom")]
    pub first_name: String,

    /// Program (filière) affiliation; set for program managers
    #[serde(rename = "filiere", default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

impl Principal {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}

/// Access/refresh token pair issued at login or registration.
///
/// Tokens are opaque strings. The pair is always replaced as a whole, except
/// for the access rotation performed by the one-shot refresh path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access: String,
    pub refresh: String,
}

impl CredentialPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    /// Rotate the short-lived access token, keeping the refresh token.
    pub fn with_access(&self, access: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: self.refresh.clone(),
        }
    }
}
