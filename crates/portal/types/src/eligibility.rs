//! Eligibility (quitus) codes and the flows they open
//!
//! A quitus code is a 6-digit code printed on the bank payment receipt. It
//! gates access to registration and enrollment: verifying it against the
//! backend yields exactly one of four outcomes, each mapped to a distinct
//! client flow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A syntactically valid quitus code: exactly six ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EligibilityCode(String);

/// Rejection reasons when parsing a quitus code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EligibilityError {
    #[error("code must contain exactly 6 digits")]
    WrongLength,

    #[error("code must contain only digits")]
    NonDigit,
}

impl EligibilityCode {
    pub fn parse(raw: &str) -> Result<Self, EligibilityError> {
        let trimmed = raw.trim();
        if trimmed.len() != 6 {
            return Err(EligibilityError::WrongLength);
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EligibilityError::NonDigit);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for EligibilityCode {
    type Err = EligibilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EligibilityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EligibilityCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        EligibilityCode::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Verification status reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityStatus {
    /// Code paid for but never used: registration may start
    #[serde(rename = "available")]
    Available,
    /// Code already bound to the calling account: enrollment may resume
    #[serde(rename = "owned")]
    Owned,
    /// Code bound to a different account: hard stop
    #[serde(rename = "used_by_other")]
    UsedByOther,
}

/// Profile fields the backend returns alongside a verified code, used to
/// pre-fill the registration or enrollment form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityPrefill {
    #[serde(rename = "nom", default)]
    pub last_name: Option<String>,
    #[serde(rename = "prenom", default)]
    pub first_name: Option<String>,
    #[serde(rename = "date_naissance", default)]
    pub birth_date: Option<chrono::NaiveDate>,
    #[serde(rename = "lieu_naissance", default)]
    pub birth_place: Option<String>,
    #[serde(rename = "sexe", default)]
    pub sex: Option<crate::enrollment::Sex>,
}

/// What the client does after a verification round-trip.
///
/// Only the first two variants carry a navigation target; `Blocked` and
/// `Failed` must leave the user where they are.
#[derive(Debug, Clone, PartialEq)]
pub enum EligibilityDecision {
    /// `available`: open the registration form, pre-filled
    StartRegistration {
        code: EligibilityCode,
        prefill: EligibilityPrefill,
    },
    /// `owned`: open the enrollment wizard, pre-filled
    ResumeEnrollment {
        code: EligibilityCode,
        prefill: EligibilityPrefill,
    },
    /// `used_by_other`: the code belongs to someone else
    Blocked { message: String },
    /// Invalid code or verification error
    Failed { message: String },
}

impl EligibilityDecision {
    /// Route to navigate to, if the decision allows navigation at all.
    pub fn navigation_target(&self) -> Option<&'static str> {
        match self {
            EligibilityDecision::StartRegistration { .. } => Some("/register"),
            EligibilityDecision::ResumeEnrollment { .. } => Some("/enrollement"),
            EligibilityDecision::Blocked { .. } | EligibilityDecision::Failed { .. } => None,
        }
    }

    /// Map a verification status onto the flow it opens.
    pub fn from_status(
        status: EligibilityStatus,
        code: EligibilityCode,
        prefill: EligibilityPrefill,
        message: Option<String>,
    ) -> Self {
        match status {
            EligibilityStatus::Available => EligibilityDecision::StartRegistration { code, prefill },
            EligibilityStatus::Owned => EligibilityDecision::ResumeEnrollment { code, prefill },
            EligibilityStatus::UsedByOther => EligibilityDecision::Blocked {
                message: message
                    .unwrap_or_else(|| "Ce code est déjà utilisé par un autre compte.".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_parsing() {
        assert!(EligibilityCode::parse("123456").is_ok());
        assert!(EligibilityCode::parse(" 123456 ").is_ok());
        assert_eq!(
            EligibilityCode::parse("12345"),
            Err(EligibilityError::WrongLength)
        );
        assert_eq!(
            EligibilityCode::parse("12345a"),
            Err(EligibilityError::NonDigit)
        );
    }

    #[test]
    fn test_used_by_other_never_navigates() {
        let decision = EligibilityDecision::from_status(
            EligibilityStatus::UsedByOther,
            EligibilityCode::parse("000000").unwrap(),
            EligibilityPrefill::default(),
            None,
        );
        assert!(decision.navigation_target().is_none());
        assert!(matches!(decision, EligibilityDecision::Blocked { .. }));
    }

    #[test]
    fn test_available_and_owned_navigate_distinctly() {
        let code = EligibilityCode::parse("123456").unwrap();
        let start = EligibilityDecision::from_status(
            EligibilityStatus::Available,
            code.clone(),
            EligibilityPrefill::default(),
            None,
        );
        let resume = EligibilityDecision::from_status(
            EligibilityStatus::Owned,
            code,
            EligibilityPrefill::default(),
            None,
        );
        assert_eq!(start.navigation_target(), Some("/register"));
        assert_eq!(resume.navigation_target(), Some("/enrollement"));
    }
}
