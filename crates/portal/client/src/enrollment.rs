//! Enrollment submission
//!
//! The whole dossier travels as one multipart request: the quitus code, all
//! scalar fields (unset ones as empty strings) and the three document files.
//! Multipart bodies cannot be replayed, so the file bytes are read up front
//! and the form is rebuilt from them for the post-refresh retry.

use crate::client::PortalClient;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use portal_enroll::{EnrollmentSubmitter, SubmissionReceipt, SubmitError};
use portal_types::{DocumentKind, EligibilityCode, EnrollmentDraft};
use reqwest::multipart::{Form, Part};
use tracing::info;

struct StagedFile {
    part_name: &'static str,
    file_name: String,
    bytes: Vec<u8>,
}

impl PortalClient {
    /// Submit a completed draft as the single enrollment request.
    pub async fn submit_enrollment(
        &self,
        code: &EligibilityCode,
        draft: &EnrollmentDraft,
    ) -> ClientResult<SubmissionReceipt> {
        let mut files = Vec::new();
        for kind in [
            DocumentKind::Photo,
            DocumentKind::IdentityDocument,
            DocumentKind::Diploma,
        ] {
            if let Some(document) = draft.document(kind) {
                let bytes = tokio::fs::read(&document.path).await?;
                files.push(StagedFile {
                    part_name: kind.part_name(),
                    file_name: document.file_name.clone(),
                    bytes,
                });
            }
        }

        let fields = draft.wire_fields();
        let build_form = || {
            let mut form = Form::new().text("code_quitus", code.to_string());
            for (name, value) in &fields {
                form = form.text(*name, value.clone());
            }
            for file in &files {
                form = form.part(
                    file.part_name,
                    Part::bytes(file.bytes.clone()).file_name(file.file_name.clone()),
                );
            }
            form
        };

        let url = self.url("/candidats/enrollement/");
        let response = self
            .send_authorized(|c| c.post(&url).multipart(build_form()))
            .await?;
        let receipt: SubmissionReceipt = self.handle_response(response).await?;
        info!(matricule = ?receipt.matricule, "enrollment accepted");
        Ok(receipt)
    }
}

#[async_trait]
impl EnrollmentSubmitter for PortalClient {
    async fn submit(
        &self,
        code: &EligibilityCode,
        draft: &EnrollmentDraft,
    ) -> Result<SubmissionReceipt, SubmitError> {
        match self.submit_enrollment(code, draft).await {
            Ok(receipt) => Ok(receipt),
            Err(ClientError::Validation(report)) => Err(SubmitError::Validation(report)),
            Err(other) => Err(SubmitError::Failed(other.to_string())),
        }
    }
}
