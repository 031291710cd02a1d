//! Field-keyed error maps shared by client-side validation and server
//! validation payloads
//!
//! Both origins flow into the same [`FieldErrors`] shape so callers render a
//! uniform experience regardless of where a rejection came from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Map from wire field name to a human-readable message.
pub type FieldErrors = BTreeMap<String, String>;

/// Outcome of a validation gate.
///
/// Expected failures never cross component boundaries as `Err`; a report is
/// an ordinary value the caller inspects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub field_errors: FieldErrors,
}

impl ValidationReport {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty()
    }

    pub fn flag(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.field_errors.insert(field.into(), message.into());
    }

    /// Fold another report into this one. Existing messages win so the
    /// earliest gate's wording is preserved.
    pub fn merge(&mut self, other: ValidationReport) {
        for (field, message) in other.field_errors {
            self.field_errors.entry(field).or_insert(message);
        }
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.field_errors.contains_key(field)
    }

    /// Decode a backend serializer error payload into the same shape used
    /// by client-side validation. Array values collapse to their first
    /// message, scalars are stringified.
    pub fn from_server_payload(payload: &serde_json::Value) -> Self {
        let mut report = ValidationReport::ok();
        if let Some(map) = payload.as_object() {
            for (field, value) in map {
                let message = match value {
                    serde_json::Value::Array(items) => items
                        .first()
                        .and_then(|v| v.as_str())
                        .unwrap_or("Valeur invalide")
                        .to_string(),
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                report.flag(field.clone(), message);
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_first_message() {
        let mut a = ValidationReport::ok();
        a.flag("email", "first");
        let mut b = ValidationReport::ok();
        b.flag("email", "second");
        b.flag("nom", "missing");
        a.merge(b);
        assert_eq!(a.field_errors["email"], "first");
        assert_eq!(a.field_errors["nom"], "missing");
    }

    #[test]
    fn test_server_payload_arrays_collapse() {
        let payload = serde_json::json!({
            "email": ["Adresse invalide", "ignored"],
            "code_quitus": "Code inconnu"
        });
        let report = ValidationReport::from_server_payload(&payload);
        assert_eq!(report.field_errors["email"], "Adresse invalide");
        assert_eq!(report.field_errors["code_quitus"], "Code inconnu");
        assert!(!report.is_valid());
    }
}
