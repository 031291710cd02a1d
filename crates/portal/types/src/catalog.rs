//! Reference catalog entities for the enrollment form
//!
//! The academic placement chain is exam-type (BAC) → track (série) →
//! program (filière) → level (niveau); each child list is scoped to its
//! parent. The remaining entities are flat lookup lists.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier shared by every catalog entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OptionId(i64);

impl OptionId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Exam scheme (baccalauréat type). Root of the placement cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamType {
    pub id: OptionId,
    /// Scheme code, e.g. `BAC_GEN` or `GCE_AL`
    pub code: String,
    #[serde(rename = "libelle")]
    pub label: String,
}

/// Track (série) within an exam scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: OptionId,
    pub code: String,
    #[serde(rename = "libelle")]
    pub label: String,
}

/// Program (filière) reachable from a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: OptionId,
    pub code: String,
    #[serde(rename = "libelle")]
    pub label: String,
}

/// Study level (niveau) within a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: OptionId,
    pub code: String,
    #[serde(rename = "libelle")]
    pub label: String,
}

/// Honor level attached to a diploma (non-GCE schemes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub id: OptionId,
    #[serde(rename = "libelle")]
    pub label: String,
}

/// Administrative region of origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: OptionId,
    #[serde(rename = "nom", alias = "libelle")]
    pub name: String,
}

/// Department of origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: OptionId,
    #[serde(rename = "nom", alias = "libelle")]
    pub name: String,
}

/// Exam or deposit center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub id: OptionId,
    pub code: String,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "ville")]
    pub city: String,
}
