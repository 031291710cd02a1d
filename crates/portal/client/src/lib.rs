//! REST client for the SGEE portal backend
//!
//! [`PortalClient`] wraps every backend exchange: authentication and account
//! lifecycle, catalog lookups, the multipart enrollment submission, dossier
//! review and account administration. It shares a
//! [`SessionStore`](portal_session::SessionStore) with the rest of the
//! application and implements the expired-token protocol on top of it: one
//! refresh round-trip per 401, one retry, and a cleared session when the
//! refresh path fails.
//!
//! The crate also provides the real implementations of the
//! [`CatalogSource`](portal_enroll::CatalogSource) and
//! [`EnrollmentSubmitter`](portal_enroll::EnrollmentSubmitter) seams.

#![deny(unsafe_code)]

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod client;
pub mod enrollment;
pub mod error;
pub mod review;

pub use admin::{ActionLogEntry, AdminStatistics, ManagedUser, NewUser, UserFilter, UserUpdate};
pub use auth::RegisterRequest;
pub use client::{MessageResponse, PortalClient};
pub use error::{ClientError, ClientResult};
pub use review::CandidateFilter;
