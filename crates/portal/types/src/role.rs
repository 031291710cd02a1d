//! Roles and their static authority model
//!
//! The backend identifies users by one of four closed roles. Authority is
//! strictly hierarchical: an account may only manage accounts of lower rank.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of portal roles, in ascending order of authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// A candidate enrolling for the national entrance exam
    #[serde(rename = "candidat")]
    Candidate,

    /// A program manager reviewing dossiers for one filière
    #[serde(rename = "responsable_filiere")]
    ProgramManager,

    /// An academic administrator managing accounts and statistics
    #[serde(rename = "admin_academique")]
    AcademicAdmin,

    /// Unrestricted administrator
    #[serde(rename = "super_admin")]
    SuperAdmin,
}

/// Capabilities granted to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ManageUsers,
    ViewStatistics,
    ManageEligibilityCodes,
    ManagePrograms,
    ViewCandidates,
    ManageProgramCandidates,
}

impl Role {
    /// Numeric rank used for management checks. Higher outranks lower.
    pub fn rank(&self) -> u8 {
        match self {
            Role::Candidate => 1,
            Role::ProgramManager => 2,
            Role::AcademicAdmin => 3,
            Role::SuperAdmin => 4,
        }
    }

    /// Whether this role may manage an account holding `other`.
    ///
    /// Strictly greater: peers cannot manage each other, and nobody manages
    /// a super admin.
    pub fn can_manage(&self, other: &Role) -> bool {
        self.rank() > other.rank()
    }

    /// Static permission set for the role.
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::SuperAdmin => &[
                Permission::ManageUsers,
                Permission::ViewStatistics,
                Permission::ManageEligibilityCodes,
                Permission::ManagePrograms,
            ],
            Role::AcademicAdmin => &[
                Permission::ManageUsers,
                Permission::ViewStatistics,
                Permission::ManagePrograms,
            ],
            Role::ProgramManager => &[
                Permission::ViewStatistics,
                Permission::ViewCandidates,
                Permission::ManageProgramCandidates,
            ],
            Role::Candidate => &[],
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Landing route after a successful login.
    ///
    /// One canonical mapping for the whole application: both admin roles
    /// share the admin dashboard.
    pub fn landing_route(&self) -> &'static str {
        match self {
            Role::Candidate => "/home",
            Role::ProgramManager => "/respfiliere/dashboard",
            Role::AcademicAdmin | Role::SuperAdmin => "/admin/dashboard",
        }
    }

    /// Human-readable label (display language follows the portal).
    pub fn label(&self) -> &'static str {
        match self {
            Role::Candidate => "Candidat",
            Role::ProgramManager => "Responsable de Filière",
            Role::AcademicAdmin => "Administrateur Académique",
            Role::SuperAdmin => "Super Administrateur",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wire = match self {
            Role::Candidate => "candidat",
            Role::ProgramManager => "responsable_filiere",
            Role::AcademicAdmin => "admin_academique",
            Role::SuperAdmin => "super_admin",
        };
        write!(f, "{}", wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for role in [
            Role::Candidate,
            Role::ProgramManager,
            Role::AcademicAdmin,
            Role::SuperAdmin,
        ] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json.trim_matches('"'), role.to_string());
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }

    #[test]
    fn test_hierarchy_is_strict() {
        assert!(Role::SuperAdmin.can_manage(&Role::AcademicAdmin));
        assert!(Role::AcademicAdmin.can_manage(&Role::Candidate));
        assert!(!Role::AcademicAdmin.can_manage(&Role::AcademicAdmin));
        assert!(!Role::Candidate.can_manage(&Role::SuperAdmin));
        assert!(!Role::SuperAdmin.can_manage(&Role::SuperAdmin));
    }

    #[test]
    fn test_admin_roles_share_landing() {
        assert_eq!(
            Role::AcademicAdmin.landing_route(),
            Role::SuperAdmin.landing_route()
        );
        assert_eq!(Role::Candidate.landing_route(), "/home");
    }

    #[test]
    fn test_candidate_has_no_permissions() {
        assert!(Role::Candidate.permissions().is_empty());
        assert!(!Role::Candidate.has_permission(Permission::ViewStatistics));
        assert!(Role::ProgramManager.has_permission(Permission::ViewCandidates));
    }
}
