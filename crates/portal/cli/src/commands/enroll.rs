//! Enrollment submission command
//!
//! Reads a draft from a JSON file (wire field names), stages the three
//! document files, runs the same validation gates the wizard applies, and
//! sends the single multipart request.

use crate::commands::require_role;
use crate::error::{CliError, CliResult};
use crate::output::{print_error, print_success};
use clap::Args;
use portal_client::PortalClient;
use portal_enroll::Validator;
use portal_types::{
    DocumentKind, DocumentRef, EligibilityCode, EnrollmentDraft, Role, ValidationReport,
};
use std::path::PathBuf;
use tracing::debug;

/// Arguments for the enroll command
#[derive(Args)]
pub struct EnrollArgs {
    /// Quitus code from the payment receipt
    #[arg(short, long)]
    pub code: String,

    /// Draft file (JSON, backend field names)
    #[arg(short, long)]
    pub draft: PathBuf,

    /// Identity photo file
    #[arg(long)]
    pub photo: PathBuf,

    /// National ID or birth certificate file
    #[arg(long)]
    pub cni: PathBuf,

    /// Diploma or transcript file
    #[arg(long)]
    pub diplome: PathBuf,
}

fn print_report(report: &ValidationReport) {
    for (field, message) in &report.field_errors {
        print_error(&format!("{field}: {message}"));
    }
}

pub async fn execute(args: EnrollArgs, client: &PortalClient) -> CliResult<()> {
    require_role(client.session(), &[Role::Candidate])?;

    let code = EligibilityCode::parse(&args.code)?;
    let raw = std::fs::read_to_string(&args.draft)?;
    let mut draft: EnrollmentDraft = serde_json::from_str(&raw)?;
    debug!(draft = %args.draft.display(), "draft file loaded");
    draft.set_document(DocumentKind::Photo, DocumentRef::new(&args.photo));
    draft.set_document(DocumentKind::IdentityDocument, DocumentRef::new(&args.cni));
    draft.set_document(DocumentKind::Diploma, DocumentRef::new(&args.diplome));

    // The scheme code decides the mention-vs-score requirement.
    let exam_code = match draft.exam_type_id {
        Some(id) => client
            .exam_types()
            .await?
            .into_iter()
            .find(|e| e.id == id)
            .map(|e| e.code),
        None => None,
    };

    let today = chrono::Local::now().date_naive();
    let report = Validator::default().validate_all(&draft, exam_code.as_deref(), today);
    if !report.is_valid() {
        debug!(fields = report.field_errors.len(), "draft failed local validation");
        print_report(&report);
        return Err(CliError::InvalidInput(
            "le dossier est incomplet, corrigez les champs signalés".into(),
        ));
    }

    match client.submit_enrollment(&code, &draft).await {
        Ok(receipt) => {
            print_success("Dossier soumis");
            if let Some(matricule) = receipt.matricule {
                println!("Matricule: {matricule}");
            }
            Ok(())
        }
        Err(portal_client::ClientError::Validation(report)) => {
            print_report(&report);
            Err(CliError::InvalidInput(
                "le serveur a rejeté certains champs".into(),
            ))
        }
        Err(other) => Err(other.into()),
    }
}
