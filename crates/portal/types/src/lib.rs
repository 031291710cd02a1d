//! Portal Types - Core types for the SGEE enrollment portal
//!
//! SGEE is the national student-enrollment portal: candidates submit an
//! enrollment dossier, program managers (responsables de filière) review it,
//! and academic administrators manage accounts and statistics.
//!
//! ## Architectural Boundaries
//!
//! - **portal-session** owns: the authenticated [`Principal`] and its
//!   [`CredentialPair`]; everything here is plain data.
//! - **portal-client** owns: the wire exchanges that produce these values.
//! - **portal-enroll** owns: mutation of the [`EnrollmentDraft`] through the
//!   wizard and cascade machinery.
//!
//! Field and enum wire names follow the backend contract (French snake_case),
//! expressed through serde attributes so Rust code stays idiomatic.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod catalog;
pub mod dossier;
pub mod eligibility;
pub mod enrollment;
pub mod errors;
pub mod principal;
pub mod role;

// Re-export main types
pub use catalog::{
    Center, Department, ExamType, Level, Mention, OptionId, Program, Region, Track,
};
pub use dossier::{CandidateSummary, DossierDetail, DossierId, DossierStatus, FiliereStats};
pub use eligibility::{
    EligibilityCode, EligibilityDecision, EligibilityError, EligibilityPrefill, EligibilityStatus,
};
pub use enrollment::{DocumentKind, DocumentRef, EnrollmentDraft, Sex};
pub use errors::{FieldErrors, ValidationReport};
pub use principal::{CredentialPair, Principal, UserId};
pub use role::{Permission, Role};
