//! Submitted dossiers as seen by reviewers
//!
//! The dossier status machine lives entirely on the server. The client
//! renders the current value and requests transitions; it never infers the
//! next state locally.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a submitted dossier (the candidate record id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DossierId(i64);

impl DossierId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for DossierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dossier:{}", self.0)
    }
}

/// Server-owned dossier status. Opaque to the client beyond display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DossierStatus {
    #[serde(rename = "en_attente")]
    Pending,
    #[serde(rename = "complet")]
    Complete,
    #[serde(rename = "valide")]
    Validated,
    #[serde(rename = "rejete")]
    Rejected,
}

impl DossierStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DossierStatus::Pending => "En attente",
            DossierStatus::Complete => "Complet",
            DossierStatus::Validated => "Validé",
            DossierStatus::Rejected => "Rejeté",
        }
    }
}

/// One row of a reviewer's candidate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub id: DossierId,
    pub matricule: Option<String>,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    pub email: Option<String>,
    #[serde(rename = "telephone")]
    pub phone: Option<String>,
    #[serde(rename = "statut_dossier")]
    pub status: DossierStatus,
    #[serde(rename = "date_soumission", default)]
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Full dossier detail for the review screen.
///
/// The backend serializer carries many optional presentation fields; the
/// typed subset below is what the review logic consumes, the rest rides
/// along untyped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DossierDetail {
    pub id: DossierId,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    #[serde(rename = "statut_dossier")]
    pub status: DossierStatus,
    /// Rejection reason, present once a dossier has been rejected
    #[serde(rename = "motif_rejet", default)]
    pub rejection_reason: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Per-status dossier counts for a program manager's dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiliereStats {
    #[serde(default)]
    pub total: u64,
    #[serde(rename = "en_attente", default)]
    pub pending: u64,
    #[serde(rename = "complet", default)]
    pub complete: u64,
    #[serde(rename = "valide", default)]
    pub validated: u64,
    #[serde(rename = "rejete", default)]
    pub rejected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&DossierStatus::Pending).unwrap(),
            "\"en_attente\""
        );
        let s: DossierStatus = serde_json::from_str("\"valide\"").unwrap();
        assert_eq!(s, DossierStatus::Validated);
    }

    #[test]
    fn test_detail_keeps_unknown_fields() {
        let detail: DossierDetail = serde_json::from_value(serde_json::json!({
            "id": 7,
            "nom": "Essomba",
            "prenom": "Paul",
            "statut_dossier": "complet",
            "ville": "Douala"
        }))
        .unwrap();
        assert_eq!(detail.status, DossierStatus::Complete);
        assert_eq!(detail.extra["ville"], "Douala");
        assert!(detail.rejection_reason.is_none());
    }
}
