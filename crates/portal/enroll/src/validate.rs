//! Per-step draft validation
//!
//! Field keys in the produced [`ValidationReport`] are the wire names, so
//! server-side rejections and client-side checks land on the same keys.
//! Messages are the French strings shown to candidates.

use chrono::{Datelike, NaiveDate};
use portal_types::{EnrollmentDraft, ValidationReport};
use regex::Regex;
use std::collections::BTreeSet;

const MSG_REQUIRED: &str = "Ce champ est obligatoire";
const MSG_DOCUMENT_REQUIRED: &str = "Ce document est obligatoire";
const MSG_PHONE: &str = "Numéro de téléphone invalide";
const MSG_PHONES_DISTINCT: &str = "Les numéros de téléphone doivent être distincts";
const MSG_EMAIL: &str = "Adresse email invalide";
const MSG_AGE: &str = "L'âge doit être compris entre 14 et 30 ans";
const MSG_SCORE: &str = "La note doit être comprise entre 2 et 25";
const MSG_YEAR: &str = "Année d'obtention invalide";

pub const MIN_AGE: i32 = 14;
pub const MAX_AGE: i32 = 30;
pub const MIN_SCORE: f64 = 2.0;
pub const MAX_SCORE: f64 = 25.0;

/// Drop the separators people type into phone numbers. Matching happens on
/// the normalized form only.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect()
}

/// Age in whole years on a given date, with the birthday correction: the
/// year difference counts only once the birthday has passed.
pub fn age_on(birth: NaiveDate, at: NaiveDate) -> i32 {
    let mut age = at.year() - birth.year();
    if (at.month(), at.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Which diploma schemes are graded with a numeric score instead of a
/// mention. Schemes listed here require `mention_points`; everything else
/// requires `mention_id`.
#[derive(Debug, Clone)]
pub struct ScoreRules {
    score_schemes: BTreeSet<String>,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            score_schemes: BTreeSet::from(["GCE_AL".to_string()]),
        }
    }
}

impl ScoreRules {
    pub fn new(score_schemes: impl IntoIterator<Item = String>) -> Self {
        Self {
            score_schemes: score_schemes.into_iter().collect(),
        }
    }

    pub fn uses_score(&self, exam_type_code: &str) -> bool {
        self.score_schemes.contains(exam_type_code)
    }
}

/// Field validators with their patterns compiled once.
#[derive(Debug, Clone)]
pub struct Validator {
    phone: Regex,
    email: Regex,
    rules: ScoreRules,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ScoreRules::default())
    }
}

impl Validator {
    pub fn new(rules: ScoreRules) -> Self {
        Self {
            phone: Regex::new(r"^(\+237|237)?[6-9][0-9]{8}$").expect("static pattern"),
            email: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static pattern"),
            rules,
        }
    }

    pub fn rules(&self) -> &ScoreRules {
        &self.rules
    }

    pub fn phone_is_valid(&self, raw: &str) -> bool {
        self.phone.is_match(&normalize_phone(raw))
    }

    /// Identity and contact fields.
    pub fn validate_step1(&self, draft: &EnrollmentDraft, today: NaiveDate) -> ValidationReport {
        let mut report = ValidationReport::ok();

        require_text(&mut report, "nom", &draft.last_name);
        require_text(&mut report, "prenom", &draft.first_name);
        require_text(&mut report, "lieu_naissance", &draft.birth_place);
        require_text(&mut report, "ville", &draft.city);
        require_text(&mut report, "quartier", &draft.neighborhood);

        match draft.birth_date {
            None => report.flag("date_naissance", MSG_REQUIRED),
            Some(birth) => {
                let age = age_on(birth, today);
                if !(MIN_AGE..=MAX_AGE).contains(&age) {
                    report.flag("date_naissance", MSG_AGE);
                }
            }
        }

        if draft.sex.is_none() {
            report.flag("sexe", MSG_REQUIRED);
        }

        match draft.email.as_deref().map(str::trim) {
            None | Some("") => report.flag("email", MSG_REQUIRED),
            Some(email) if !self.email.is_match(email) => report.flag("email", MSG_EMAIL),
            Some(_) => {}
        }

        match draft.primary_phone.as_deref().map(str::trim) {
            None | Some("") => report.flag("telephone_secondaire", MSG_REQUIRED),
            Some(phone) if !self.phone_is_valid(phone) => {
                report.flag("telephone_secondaire", MSG_PHONE)
            }
            Some(_) => {}
        }

        if draft.region_id.is_none() {
            report.flag("region_id", MSG_REQUIRED);
        }
        if draft.department_id.is_none() {
            report.flag("departement_id", MSG_REQUIRED);
        }

        // Photo and identity document are collected alongside the identity
        // fields.
        if draft.photo.is_none() {
            report.flag("photo", MSG_DOCUMENT_REQUIRED);
        }
        if draft.identity_document.is_none() {
            report.flag("cni", MSG_DOCUMENT_REQUIRED);
        }

        report
    }

    /// Academic history. The mention/score branch is decided by the selected
    /// exam type's scheme code.
    pub fn validate_step2(
        &self,
        draft: &EnrollmentDraft,
        exam_type_code: Option<&str>,
        today: NaiveDate,
    ) -> ValidationReport {
        let mut report = ValidationReport::ok();

        if draft.exam_type_id.is_none() {
            report.flag("bac_id", MSG_REQUIRED);
        }
        if draft.track_id.is_none() {
            report.flag("serie_id", MSG_REQUIRED);
        }
        if draft.program_id.is_none() {
            report.flag("filiere_id", MSG_REQUIRED);
        }
        if draft.level_id.is_none() {
            report.flag("niveau_id", MSG_REQUIRED);
        }

        let scored = exam_type_code.is_some_and(|code| self.rules.uses_score(code));
        if scored {
            match draft.score_points {
                None => report.flag("mention_points", MSG_REQUIRED),
                Some(points) if !(MIN_SCORE..=MAX_SCORE).contains(&points) => {
                    report.flag("mention_points", MSG_SCORE)
                }
                Some(_) => {}
            }
        } else if draft.mention_id.is_none() {
            report.flag("mention_id", MSG_REQUIRED);
        }

        require_text(&mut report, "etablissement_origine", &draft.origin_institution);

        match draft.diploma_year {
            None => report.flag("annee_obtention_diplome", MSG_REQUIRED),
            Some(year) if year < 1980 || year > today.year() => {
                report.flag("annee_obtention_diplome", MSG_YEAR)
            }
            Some(_) => {}
        }

        if draft.exam_center_id.is_none() {
            report.flag("centre_examen_id", MSG_REQUIRED);
        }
        if draft.deposit_center_id.is_none() {
            report.flag("centre_depot_id", MSG_REQUIRED);
        }

        if draft.diploma.is_none() {
            report.flag("diplome", MSG_DOCUMENT_REQUIRED);
        }

        report
    }

    /// Family contacts, including the pairwise-distinct rule across the
    /// candidate's and both parents' numbers.
    pub fn validate_step3(&self, draft: &EnrollmentDraft) -> ValidationReport {
        let mut report = ValidationReport::ok();

        require_text(&mut report, "nom_pere", &draft.father_name);
        require_text(&mut report, "nom_mere", &draft.mother_name);
        self.require_phone(&mut report, "tel_pere", &draft.father_phone);
        self.require_phone(&mut report, "tel_mere", &draft.mother_phone);

        // Three numbers, compared after normalization. Any collision flags
        // every phone field so the candidate sees the conflict wherever
        // they look.
        let phones = [
            draft.primary_phone.as_deref(),
            draft.father_phone.as_deref(),
            draft.mother_phone.as_deref(),
        ];
        let normalized: Vec<String> = phones
            .iter()
            .filter_map(|p| p.map(normalize_phone))
            .filter(|p| !p.is_empty())
            .collect();
        let distinct: BTreeSet<&String> = normalized.iter().collect();
        if distinct.len() < normalized.len() {
            for field in ["telephone_secondaire", "tel_pere", "tel_mere"] {
                report.flag(field, MSG_PHONES_DISTINCT);
            }
        }

        report
    }

    /// Every step in order, merged. Earlier steps win on shared keys. The
    /// review step adds nothing of its own.
    pub fn validate_all(
        &self,
        draft: &EnrollmentDraft,
        exam_type_code: Option<&str>,
        today: NaiveDate,
    ) -> ValidationReport {
        let mut report = self.validate_step1(draft, today);
        report.merge(self.validate_step2(draft, exam_type_code, today));
        report.merge(self.validate_step3(draft));
        report
    }

    fn require_phone(&self, report: &mut ValidationReport, field: &str, value: &Option<String>) {
        match value.as_deref().map(str::trim) {
            None | Some("") => report.flag(field, MSG_REQUIRED),
            Some(phone) if !self.phone_is_valid(phone) => report.flag(field, MSG_PHONE),
            Some(_) => {}
        }
    }
}

fn require_text(report: &mut ValidationReport, field: &str, value: &Option<String>) {
    if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
        report.flag(field, MSG_REQUIRED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_types::{DocumentRef, OptionId, Sex};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn step1_draft() -> EnrollmentDraft {
        EnrollmentDraft {
            last_name: Some("Nana".into()),
            first_name: Some("Brice".into()),
            birth_date: Some(date(2004, 6, 15)),
            birth_place: Some("Douala".into()),
            sex: Some(Sex::Male),
            email: Some("brice@example.cm".into()),
            primary_phone: Some("+237 690 11 22 33".into()),
            region_id: Some(OptionId::new(1)),
            department_id: Some(OptionId::new(2)),
            city: Some("Douala".into()),
            neighborhood: Some("Bonapriso".into()),
            photo: Some(DocumentRef::new("/tmp/photo.jpg")),
            identity_document: Some(DocumentRef::new("/tmp/cni.pdf")),
            ..EnrollmentDraft::default()
        }
    }

    #[test]
    fn test_phone_normalization_strips_separators() {
        assert_eq!(normalize_phone("+237 690-11(22)33"), "+237690112233");
        assert_eq!(normalize_phone("690112233"), "690112233");
    }

    #[test]
    fn test_phone_pattern_accepts_all_prefix_forms() {
        let v = Validator::default();
        assert!(v.phone_is_valid("+237690112233"));
        assert!(v.phone_is_valid("237690112233"));
        assert!(v.phone_is_valid("690112233"));
        assert!(v.phone_is_valid(" 6 9 0 1 1 2 2 3 3 "));
        // First subscriber digit must be 6..=9.
        assert!(!v.phone_is_valid("590112233"));
        assert!(!v.phone_is_valid("69011223"));
        assert!(!v.phone_is_valid("6901122334"));
    }

    #[test]
    fn test_age_counts_birthday_not_calendar_year() {
        let birth = date(2006, 9, 1);
        assert_eq!(age_on(birth, date(2026, 8, 31)), 19);
        assert_eq!(age_on(birth, date(2026, 9, 1)), 20);
    }

    #[test]
    fn test_age_bounds_are_inclusive() {
        let v = Validator::default();
        let today = date(2026, 1, 1);

        let mut draft = step1_draft();
        draft.birth_date = Some(date(2012, 1, 1)); // turns 14 today
        assert!(!v.validate_step1(&draft, today).has_error("date_naissance"));

        draft.birth_date = Some(date(2012, 1, 2)); // still 13
        assert!(v.validate_step1(&draft, today).has_error("date_naissance"));

        draft.birth_date = Some(date(1995, 1, 2)); // 30, last allowed year
        assert!(!v.validate_step1(&draft, today).has_error("date_naissance"));

        draft.birth_date = Some(date(1995, 1, 1)); // turned 31 today
        assert!(v.validate_step1(&draft, today).has_error("date_naissance"));
    }

    #[test]
    fn test_step1_passes_when_complete() {
        let v = Validator::default();
        let report = v.validate_step1(&step1_draft(), date(2026, 1, 1));
        assert!(report.is_valid(), "{:?}", report.field_errors);
    }

    #[test]
    fn test_step1_flags_missing_and_malformed() {
        let v = Validator::default();
        let mut draft = step1_draft();
        draft.last_name = Some("   ".into());
        draft.email = Some("not-an-email".into());
        draft.primary_phone = Some("12345".into());
        let report = v.validate_step1(&draft, date(2026, 1, 1));
        assert_eq!(report.field_errors["nom"], MSG_REQUIRED);
        assert_eq!(report.field_errors["email"], MSG_EMAIL);
        assert_eq!(report.field_errors["telephone_secondaire"], MSG_PHONE);
    }

    #[test]
    fn test_mention_branch_follows_scheme() {
        let v = Validator::default();
        let today = date(2026, 1, 1);
        let mut draft = EnrollmentDraft {
            exam_type_id: Some(OptionId::new(1)),
            track_id: Some(OptionId::new(2)),
            program_id: Some(OptionId::new(3)),
            level_id: Some(OptionId::new(4)),
            origin_institution: Some("Lycée de Deido".into()),
            diploma_year: Some(2025),
            exam_center_id: Some(OptionId::new(5)),
            deposit_center_id: Some(OptionId::new(6)),
            diploma: Some(DocumentRef::new("/tmp/diplome.pdf")),
            ..EnrollmentDraft::default()
        };

        // Mention scheme: mention_id required, score not.
        let report = v.validate_step2(&draft, Some("BAC_GEN"), today);
        assert!(report.has_error("mention_id"));
        assert!(!report.has_error("mention_points"));

        // Score scheme: the requirement flips.
        let report = v.validate_step2(&draft, Some("GCE_AL"), today);
        assert!(!report.has_error("mention_id"));
        assert!(report.has_error("mention_points"));

        draft.score_points = Some(1.5);
        let report = v.validate_step2(&draft, Some("GCE_AL"), today);
        assert_eq!(report.field_errors["mention_points"], MSG_SCORE);

        draft.score_points = Some(25.0);
        let report = v.validate_step2(&draft, Some("GCE_AL"), today);
        assert!(!report.has_error("mention_points"));
    }

    #[test]
    fn test_diploma_year_cannot_be_in_the_future() {
        let v = Validator::default();
        let mut draft = EnrollmentDraft::default();
        draft.diploma_year = Some(2027);
        let report = v.validate_step2(&draft, None, date(2026, 1, 1));
        assert_eq!(report.field_errors["annee_obtention_diplome"], MSG_YEAR);
    }

    #[test]
    fn test_phone_collision_flags_all_three_fields() {
        let v = Validator::default();
        let draft = EnrollmentDraft {
            primary_phone: Some("690112233".into()),
            father_name: Some("Jean".into()),
            father_phone: Some("+237 690-11-22-33".into()),
            mother_name: Some("Marie".into()),
            mother_phone: Some("691445566".into()),
            ..EnrollmentDraft::default()
        };
        let report = v.validate_step3(&draft);
        assert_eq!(report.field_errors["telephone_secondaire"], MSG_PHONES_DISTINCT);
        assert_eq!(report.field_errors["tel_pere"], MSG_PHONES_DISTINCT);
        assert_eq!(report.field_errors["tel_mere"], MSG_PHONES_DISTINCT);
    }

    #[test]
    fn test_distinct_phones_pass_step3() {
        let v = Validator::default();
        let draft = EnrollmentDraft {
            primary_phone: Some("690112233".into()),
            father_name: Some("Jean".into()),
            father_phone: Some("691445566".into()),
            mother_name: Some("Marie".into()),
            mother_phone: Some("692778899".into()),
            ..EnrollmentDraft::default()
        };
        assert!(v.validate_step3(&draft).is_valid());
    }

    #[test]
    fn test_documents_flagged_on_their_steps() {
        let v = Validator::default();
        let today = date(2026, 1, 1);
        let mut draft = step1_draft();
        draft.identity_document = None;

        let report = v.validate_step1(&draft, today);
        assert!(!report.has_error("photo"));
        assert!(report.has_error("cni"));

        let report = v.validate_step2(&draft, None, today);
        assert!(report.has_error("diplome"));

        let report = v.validate_all(&draft, None, today);
        assert!(report.has_error("cni"));
        assert!(report.has_error("diplome"));
    }

    #[test]
    fn test_custom_score_rules() {
        let rules = ScoreRules::new(["GCE_AL".to_string(), "ABITUR".to_string()]);
        assert!(rules.uses_score("ABITUR"));
        assert!(!rules.uses_score("BAC_GEN"));
    }
}
