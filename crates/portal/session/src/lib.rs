//! Session lifecycle for the SGEE portal
//!
//! Holds the authenticated [`Principal`](portal_types::Principal) and its
//! token pair, persists both across process restarts under fixed keys, and
//! answers the per-navigation authorization question through a pure route
//! guard.
//!
//! The store never talks to the network: login, refresh and server-side
//! logout are `portal-client`'s concern. The client commits full
//! replacements and reads tokens back, nothing more.

#![deny(unsafe_code)]

pub mod error;
pub mod guard;
pub mod storage;
pub mod store;

pub use error::{SessionError, SessionResult};
pub use guard::{GuardDecision, RouteGuard};
pub use storage::{CredentialStore, InMemoryCredentialStore, JsonFileCredentialStore};
pub use store::SessionStore;
