//! Seams between the enrollment flow and the network

use crate::error::{CatalogError, SubmitError};
use async_trait::async_trait;
use portal_types::{
    DossierId, EligibilityCode, EnrollmentDraft, ExamType, Level, OptionId, Program, Track,
};
use serde::{Deserialize, Serialize};

/// Chained catalog lookups feeding the cascade resolver. Each child list is
/// scoped to the full path of parent selections.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn exam_types(&self) -> Result<Vec<ExamType>, CatalogError>;

    async fn tracks_of(&self, exam_type: OptionId) -> Result<Vec<Track>, CatalogError>;

    async fn programs_of(&self, track: OptionId) -> Result<Vec<Program>, CatalogError>;

    async fn levels_of(&self, track: OptionId, program: OptionId)
        -> Result<Vec<Level>, CatalogError>;
}

/// Server acknowledgement of a successful enrollment submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(default)]
    pub id: Option<DossierId>,
    #[serde(default)]
    pub matricule: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The single multipart submission at the end of the wizard.
#[async_trait]
pub trait EnrollmentSubmitter: Send + Sync {
    async fn submit(
        &self,
        code: &EligibilityCode,
        draft: &EnrollmentDraft,
    ) -> Result<SubmissionReceipt, SubmitError>;
}
