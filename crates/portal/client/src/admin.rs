//! Account administration endpoints
//!
//! Reserved for academic administrators. Role assignment rules are enforced
//! server-side; the client only shapes the requests.

use crate::client::{MessageResponse, PortalClient};
use crate::error::{ClientError, ClientResult};
use portal_types::{OptionId, Role, UserId};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One managed account as the administration screens list it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    #[serde(rename = "is_active", default)]
    pub active: bool,
    #[serde(rename = "filiere_id", default)]
    pub program_id: Option<OptionId>,
}

/// Account creation payload. The program assignment is only meaningful for
/// program-manager accounts.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub email: String,
    pub role: Role,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    pub password: String,
    #[serde(rename = "filiere_id", skip_serializing_if = "Option::is_none")]
    pub program_id: Option<OptionId>,
}

/// Partial account update; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "nom", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "prenom", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(rename = "filiere_id", skip_serializing_if = "Option::is_none")]
    pub program_id: Option<OptionId>,
}

/// Portal-wide account and dossier counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminStatistics {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_candidats: u64,
    #[serde(default)]
    pub dossiers_valides: u64,
    #[serde(default)]
    pub dossiers_rejetes: u64,
    #[serde(default)]
    pub dossiers_en_attente: u64,
}

/// One audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub id: i64,
    #[serde(rename = "user_email", default)]
    pub actor: Option<String>,
    pub action: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(rename = "created_at", default)]
    pub at: Option<String>,
}

#[derive(Debug, Serialize)]
struct DeleteUserRequest<'a> {
    motif: &'a str,
}

/// Server-side filters for the account list.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub active: Option<bool>,
    pub search: Option<String>,
}

impl UserFilter {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(role) = &self.role {
            pairs.push(("role", role.to_string()));
        }
        if let Some(active) = self.active {
            pairs.push(("is_active", active.to_string()));
        }
        if let Some(search) = &self.search {
            if !search.is_empty() {
                pairs.push(("search", search.clone()));
            }
        }
        pairs
    }
}

impl PortalClient {
    pub async fn list_users(&self, filter: &UserFilter) -> ClientResult<Vec<ManagedUser>> {
        self.get_list_query("/auth/users/", &filter.params()).await
    }

    pub async fn get_user(&self, id: UserId) -> ClientResult<ManagedUser> {
        self.get(&format!("/auth/users/{}/", id)).await
    }

    pub async fn create_user(&self, user: &NewUser) -> ClientResult<ManagedUser> {
        let created: ManagedUser = self.post("/auth/users/create/", user).await?;
        info!(id = %created.id, "user created");
        Ok(created)
    }

    pub async fn update_user(&self, id: UserId, update: &UserUpdate) -> ClientResult<ManagedUser> {
        self.put(&format!("/auth/users/{}/update/", id), update).await
    }

    /// Flip an account between enabled and disabled without deleting it.
    pub async fn toggle_user_active(&self, id: UserId) -> ClientResult<ManagedUser> {
        self.post(
            &format!("/auth/users/{}/toggle-active/", id),
            &serde_json::json!({}),
        )
        .await
    }

    /// Trigger a password reset; the new password is delivered out of band.
    pub async fn reset_user_password(&self, id: UserId) -> ClientResult<String> {
        let response: MessageResponse = self
            .post(
                &format!("/auth/users/{}/reset-password/", id),
                &serde_json::json!({}),
            )
            .await?;
        Ok(response.message)
    }

    /// Delete an account. Deletion is audited, so a reason is mandatory.
    pub async fn delete_user(&self, id: UserId, reason: &str) -> ClientResult<String> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ClientError::InvalidInput(
                "un motif de suppression est obligatoire".into(),
            ));
        }
        let response: MessageResponse = self
            .delete_with_body(
                &format!("/auth/users/{}/delete/", id),
                &DeleteUserRequest { motif: reason },
            )
            .await?;
        info!(%id, "user deleted");
        Ok(response.message)
    }

    pub async fn admin_statistics(&self) -> ClientResult<AdminStatistics> {
        self.get("/auth/statistics/").await
    }

    pub async fn action_logs(&self) -> ClientResult<Vec<ActionLogEntry>> {
        self.get_list("/auth/action-logs/").await
    }
}
