//! Enrollment error types

use portal_types::ValidationReport;
use thiserror::Error;

/// Failure of one catalog list fetch. Step-local and non-fatal: the slot's
/// list stays empty, the parent selection stays put.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("catalog fetch failed: {0}")]
pub struct CatalogError(pub String);

/// Misuse of the cascade ordering.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CascadeError {
    /// A child slot was selected while its parent had no selection
    #[error("cannot select {child}: no {parent} selected")]
    ParentNotSelected {
        child: &'static str,
        parent: &'static str,
    },

    /// The id is not in the slot's current option list
    #[error("unknown option for {slot}")]
    UnknownOption { slot: &'static str },
}

/// Failure of the final submission call.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The server rejected individual fields; same shape as client-side
    /// validation so the presentation is uniform
    #[error("submission rejected by server validation")]
    Validation(ValidationReport),

    /// Transport or non-field server failure
    #[error("submission failed: {0}")]
    Failed(String),
}
