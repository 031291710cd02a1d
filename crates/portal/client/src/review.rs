//! Dossier review endpoints for program managers

use crate::client::{MessageResponse, PortalClient};
use crate::error::{ClientError, ClientResult};
use portal_types::{CandidateSummary, DossierDetail, DossierId, DossierStatus, FiliereStats, Program};
use serde::Serialize;
use tracing::info;

/// Server-side filters for the candidate list.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    pub status: Option<DossierStatus>,
    pub search: Option<String>,
}

impl CandidateFilter {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = &self.status {
            if let Ok(serde_json::Value::String(wire)) = serde_json::to_value(status) {
                pairs.push(("statut", wire));
            }
        }
        if let Some(search) = &self.search {
            if !search.is_empty() {
                pairs.push(("search", search.clone()));
            }
        }
        pairs
    }
}

#[derive(Debug, Serialize)]
struct RejectRequest<'a> {
    motif: &'a str,
}

impl PortalClient {
    /// Per-status dossier counts for the manager's program.
    pub async fn dashboard_stats(&self) -> ClientResult<FiliereStats> {
        self.get("/candidats/respfiliere/dashboard_stats/").await
    }

    /// Candidates of the manager's program, optionally filtered.
    pub async fn my_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> ClientResult<Vec<CandidateSummary>> {
        self.get_list_query("/candidats/respfiliere/mes_candidats/", &filter.params())
            .await
    }

    /// Full dossier detail for the review screen.
    pub async fn candidate_detail(&self, id: DossierId) -> ClientResult<DossierDetail> {
        self.get(&format!("/candidats/respfiliere/{}/candidat_detail/", id))
            .await
    }

    /// Mark a dossier as validated.
    pub async fn validate_dossier(&self, id: DossierId) -> ClientResult<String> {
        let response: MessageResponse = self
            .post(
                &format!("/candidats/respfiliere/{}/valider_dossier/", id),
                &serde_json::json!({}),
            )
            .await?;
        info!(%id, "dossier validated");
        Ok(response.message)
    }

    /// Reject a dossier. The reason is mandatory and travels with the
    /// decision; an empty reason never leaves the client.
    pub async fn reject_dossier(&self, id: DossierId, reason: &str) -> ClientResult<String> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ClientError::InvalidInput(
                "un motif de rejet est obligatoire".into(),
            ));
        }
        let response: MessageResponse = self
            .post(
                &format!("/candidats/respfiliere/{}/rejeter_dossier/", id),
                &RejectRequest { motif: reason },
            )
            .await?;
        info!(%id, "dossier rejected");
        Ok(response.message)
    }

    /// The program this manager is responsible for.
    pub async fn program_profile(&self) -> ClientResult<Program> {
        self.get("/candidats/respfiliere/profil_filiere/").await
    }
}
