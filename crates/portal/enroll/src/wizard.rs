//! Four-step enrollment wizard
//!
//! Forward navigation is gated: `advance` runs the current step's validators
//! and refuses to move while any fail. Backward navigation never validates.
//! Submission re-validates the whole draft: a local failure jumps back to
//! the earliest step owning a flagged field, while a server-side field
//! rejection keeps the wizard on the review step with the report attached.

use crate::cascade::CascadeResolver;
use crate::error::{CascadeError, CatalogError, SubmitError};
use crate::source::{CatalogSource, EnrollmentSubmitter, SubmissionReceipt};
use crate::validate::Validator;
use chrono::NaiveDate;
use portal_types::{
    DocumentKind, DocumentRef, EligibilityCode, EligibilityPrefill, EnrollmentDraft, OptionId,
    ValidationReport,
};
use tracing::{info, warn};

/// The four form steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Identity,
    Academic,
    Family,
    Review,
    /// Terminal: the dossier has been accepted
    Submitted,
}

impl WizardStep {
    /// One-based position for progress display.
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Identity => 1,
            WizardStep::Academic => 2,
            WizardStep::Family => 3,
            WizardStep::Review | WizardStep::Submitted => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::Identity => "Informations personnelles",
            WizardStep::Academic => "Parcours académique",
            WizardStep::Family => "Contacts familiaux",
            WizardStep::Review => "Documents et validation",
            WizardStep::Submitted => "Dossier soumis",
        }
    }

    fn next(&self) -> WizardStep {
        match self {
            WizardStep::Identity => WizardStep::Academic,
            WizardStep::Academic => WizardStep::Family,
            WizardStep::Family | WizardStep::Review => WizardStep::Review,
            WizardStep::Submitted => WizardStep::Submitted,
        }
    }

    fn previous(&self) -> WizardStep {
        match self {
            WizardStep::Identity | WizardStep::Academic => WizardStep::Identity,
            WizardStep::Family => WizardStep::Academic,
            WizardStep::Review => WizardStep::Family,
            WizardStep::Submitted => WizardStep::Submitted,
        }
    }

    /// The step that owns a wire field name. Unknown names land on the
    /// review step, which shows the full report.
    pub fn owning(field: &str) -> WizardStep {
        match field {
            "nom" | "prenom" | "date_naissance" | "lieu_naissance" | "sexe" | "email"
            | "telephone_secondaire" | "region_id" | "departement_id" | "ville" | "quartier"
            | "photo" | "cni" => WizardStep::Identity,
            "bac_id" | "serie_id" | "filiere_id" | "niveau_id" | "mention_id"
            | "mention_points" | "etablissement_origine" | "annee_obtention_diplome"
            | "centre_examen_id" | "centre_depot_id" | "diplome" => WizardStep::Academic,
            "nom_pere" | "tel_pere" | "nom_mere" | "tel_mere" => WizardStep::Family,
            _ => WizardStep::Review,
        }
    }
}

/// Result of the final submission attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Accepted; the draft is finished
    Submitted(SubmissionReceipt),
    /// Client-side or server-side field rejections; the wizard has moved to
    /// the earliest flagged step
    Rejected(ValidationReport),
    /// Transport or non-field server failure; the draft is untouched
    Failed(String),
}

/// One labelled line of the confirmation screen.
pub type ReviewLine = (String, String);

/// Read-only digest of the draft shown before the candidate confirms.
#[derive(Debug, Clone, Default)]
pub struct ReviewSummary {
    pub lines: Vec<ReviewLine>,
}

/// Form state machine for one enrollment.
pub struct EnrollmentWizard {
    code: EligibilityCode,
    draft: EnrollmentDraft,
    step: WizardStep,
    validator: Validator,
    cascade: CascadeResolver,
    server_report: ValidationReport,
    busy: bool,
}

impl EnrollmentWizard {
    pub fn new(code: EligibilityCode) -> Self {
        Self::with_draft(code, EnrollmentDraft::default())
    }

    /// Start from the profile fields an eligibility lookup returned.
    pub fn from_prefill(code: EligibilityCode, prefill: &EligibilityPrefill) -> Self {
        Self::with_draft(code, EnrollmentDraft::from_prefill(prefill))
    }

    fn with_draft(code: EligibilityCode, draft: EnrollmentDraft) -> Self {
        Self {
            code,
            draft,
            step: WizardStep::Identity,
            validator: Validator::default(),
            cascade: CascadeResolver::new(),
            server_report: ValidationReport::ok(),
            busy: false,
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn code(&self) -> &EligibilityCode {
        &self.code
    }

    pub fn draft(&self) -> &EnrollmentDraft {
        &self.draft
    }

    /// Mutable access to the form fields. Cascade-owned ids (bac, série,
    /// filière, niveau) should go through the `choose_*` methods instead so
    /// the dependent lists stay consistent.
    pub fn draft_mut(&mut self) -> &mut EnrollmentDraft {
        &mut self.draft
    }

    pub fn cascade(&self) -> &CascadeResolver {
        &self.cascade
    }

    /// Field rejections from the last failed submission, if any.
    pub fn server_report(&self) -> &ValidationReport {
        &self.server_report
    }

    // -------- cascade-backed selections --------

    pub async fn load_exam_types(
        &mut self,
        source: &dyn CatalogSource,
    ) -> Result<(), CatalogError> {
        self.cascade.load_exam_types(source).await
    }

    pub async fn choose_exam_type(
        &mut self,
        id: Option<OptionId>,
        source: &dyn CatalogSource,
    ) -> Result<(), CascadeError> {
        self.cascade.choose_exam_type(id, source).await?;
        self.mirror_cascade();
        Ok(())
    }

    pub async fn choose_track(
        &mut self,
        id: Option<OptionId>,
        source: &dyn CatalogSource,
    ) -> Result<(), CascadeError> {
        self.cascade.choose_track(id, source).await?;
        self.mirror_cascade();
        Ok(())
    }

    pub async fn choose_program(
        &mut self,
        id: Option<OptionId>,
        source: &dyn CatalogSource,
    ) -> Result<(), CascadeError> {
        self.cascade.choose_program(id, source).await?;
        self.mirror_cascade();
        Ok(())
    }

    pub fn choose_level(&mut self, id: Option<OptionId>) -> Result<(), CascadeError> {
        self.cascade.select_level(id)?;
        self.mirror_cascade();
        Ok(())
    }

    pub fn stage_document(&mut self, kind: DocumentKind, document: DocumentRef) {
        self.draft.set_document(kind, document);
    }

    // -------- navigation --------

    /// Validate the current step and move forward when it passes. The
    /// returned report is empty on success.
    pub fn advance(&mut self, today: NaiveDate) -> ValidationReport {
        let report = self.validate_step(self.step, today);
        if report.is_valid() {
            self.step = self.step.next();
        }
        report
    }

    /// Move back one step. Never validates; entered data stays in the draft.
    pub fn back(&mut self) {
        self.step = self.step.previous();
    }

    fn validate_step(&self, step: WizardStep, today: NaiveDate) -> ValidationReport {
        let exam_code = self.cascade.selected_exam_type_code();
        match step {
            WizardStep::Identity => self.validator.validate_step1(&self.draft, today),
            WizardStep::Academic => self.validator.validate_step2(&self.draft, exam_code, today),
            WizardStep::Family => self.validator.validate_step3(&self.draft),
            WizardStep::Review | WizardStep::Submitted => {
                self.validator.validate_all(&self.draft, exam_code, today)
            }
        }
    }

    /// Digest of the draft for the confirmation screen, with catalog ids
    /// resolved to their labels where the lists are loaded.
    pub fn review_summary(&self) -> ReviewSummary {
        fn line(lines: &mut Vec<ReviewLine>, label: &str, value: Option<String>) {
            lines.push((label.to_string(), value.unwrap_or_default()));
        }

        let mut lines = Vec::new();
        let d = &self.draft;
        line(&mut lines, "Nom", d.last_name.clone());
        line(&mut lines, "Prénom", d.first_name.clone());
        line(
            &mut lines,
            "Date de naissance",
            d.birth_date.map(|b| b.to_string()),
        );
        line(&mut lines, "Email", d.email.clone());
        line(&mut lines, "Téléphone", d.primary_phone.clone());
        line(
            &mut lines,
            "Diplôme",
            self.cascade.selected_exam_type_code().map(String::from),
        );
        line(
            &mut lines,
            "Filière",
            d.program_id.and_then(|id| {
                self.cascade
                    .programs()
                    .iter()
                    .find(|p| p.id == id)
                    .map(|p| p.label.clone())
            }),
        );
        line(
            &mut lines,
            "Niveau",
            d.level_id.and_then(|id| {
                self.cascade
                    .levels()
                    .iter()
                    .find(|l| l.id == id)
                    .map(|l| l.label.clone())
            }),
        );
        for kind in [
            DocumentKind::Photo,
            DocumentKind::IdentityDocument,
            DocumentKind::Diploma,
        ] {
            line(
                &mut lines,
                kind.field_key(),
                d.document(kind).map(|doc| doc.file_name.clone()),
            );
        }
        ReviewSummary { lines }
    }

    // -------- submission --------

    /// Re-validate everything and send the single multipart request, only
    /// from the review step. A client-side failure jumps to the earliest
    /// flagged step; a server field rejection stays on review with the
    /// report kept for display. The draft survives every failure path.
    pub async fn submit(
        &mut self,
        submitter: &dyn EnrollmentSubmitter,
        today: NaiveDate,
    ) -> SubmitOutcome {
        if self.step != WizardStep::Review {
            return SubmitOutcome::Failed(
                "la soumission n'est possible qu'à l'étape de validation".to_string(),
            );
        }
        if self.busy {
            return SubmitOutcome::Failed("une soumission est déjà en cours".to_string());
        }

        let exam_code = self.cascade.selected_exam_type_code();
        let report = self.validator.validate_all(&self.draft, exam_code, today);
        if !report.is_valid() {
            self.goto_first_flagged(&report);
            return SubmitOutcome::Rejected(report);
        }

        self.busy = true;
        let result = submitter.submit(&self.code, &self.draft).await;
        self.busy = false;

        match result {
            Ok(receipt) => {
                info!(code = %self.code, "enrollment submitted");
                self.step = WizardStep::Submitted;
                SubmitOutcome::Submitted(receipt)
            }
            Err(SubmitError::Validation(report)) => {
                warn!(
                    fields = report.field_errors.len(),
                    "server rejected enrollment fields"
                );
                self.server_report = report.clone();
                SubmitOutcome::Rejected(report)
            }
            Err(SubmitError::Failed(message)) => {
                warn!(%message, "enrollment submission failed");
                SubmitOutcome::Failed(message)
            }
        }
    }

    fn goto_first_flagged(&mut self, report: &ValidationReport) {
        if let Some(step) = report
            .field_errors
            .keys()
            .map(|field| WizardStep::owning(field))
            .min()
        {
            self.step = step;
        }
    }

    fn mirror_cascade(&mut self) {
        self.draft.exam_type_id = self.cascade.selected_exam_type();
        self.draft.track_id = self.cascade.selected_track();
        self.draft.program_id = self.cascade.selected_program();
        self.draft.level_id = self.cascade.selected_level();
    }
}
