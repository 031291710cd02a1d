//! Enrollment flow for the SGEE portal
//!
//! Two pieces of client logic worth getting exactly right live here:
//!
//! - the [`CascadeResolver`], which manages the four dependent placement
//!   lists (BAC → série → filière → niveau) with generation-counted fetch
//!   tickets so a late response for a superseded parent can never repopulate
//!   a child list;
//! - the [`EnrollmentWizard`], the four-step form state machine with
//!   per-step validation gates and a full re-validation before the single
//!   multipart submission.
//!
//! Network access goes through the [`CatalogSource`] and
//! [`EnrollmentSubmitter`] seams; `portal-client` provides the real
//! implementations.

#![deny(unsafe_code)]

pub mod cascade;
pub mod error;
pub mod source;
pub mod validate;
pub mod wizard;

pub use cascade::{Applied, CascadeResolver, FetchTicket, Slot};
pub use error::{CascadeError, CatalogError, SubmitError};
pub use source::{CatalogSource, EnrollmentSubmitter, SubmissionReceipt};
pub use validate::{age_on, normalize_phone, ScoreRules, Validator};
pub use wizard::{EnrollmentWizard, ReviewSummary, SubmitOutcome, WizardStep};
