//! The enrollment draft mutated by the wizard
//!
//! Every field belongs to exactly one wizard step. The draft is created
//! empty (or pre-filled from an eligibility lookup), mutated through the
//! wizard, and discarded only on successful submission or navigation away.

use crate::catalog::OptionId;
use crate::eligibility::EligibilityPrefill;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Binary sex field as the backend encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

/// The three artifacts a dossier must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Identity photo
    Photo,
    /// National ID card or birth certificate
    IdentityDocument,
    /// Diploma or transcript
    Diploma,
}

impl DocumentKind {
    /// Multipart part name expected by the backend.
    pub fn part_name(&self) -> &'static str {
        match self {
            DocumentKind::Photo => "photo_file",
            DocumentKind::IdentityDocument => "cni_file",
            DocumentKind::Diploma => "diplome_file",
        }
    }

    /// Field-error key used by validation.
    pub fn field_key(&self) -> &'static str {
        match self {
            DocumentKind::Photo => "photo",
            DocumentKind::IdentityDocument => "cni",
            DocumentKind::Diploma => "diplome",
        }
    }
}

/// Client-side reference to a staged file. The bytes are read only at
/// submission time, as one part of the single multipart request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub file_name: String,
    pub path: PathBuf,
}

impl DocumentRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { file_name, path }
    }
}

/// All form fields across the four wizard steps.
///
/// Optional throughout: "unset" is a first-class state the validators report
/// on, never an error at the data layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentDraft {
    // Step 1: identity and contact
    #[serde(rename = "nom", default)]
    pub last_name: Option<String>,
    #[serde(rename = "prenom", default)]
    pub first_name: Option<String>,
    #[serde(rename = "date_naissance", default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "lieu_naissance", default)]
    pub birth_place: Option<String>,
    #[serde(rename = "sexe", default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub email: Option<String>,
    /// Primary contact number (wire name kept from the backend contract)
    #[serde(rename = "telephone_secondaire", default)]
    pub primary_phone: Option<String>,
    #[serde(rename = "region_id", default)]
    pub region_id: Option<OptionId>,
    #[serde(rename = "departement_id", default)]
    pub department_id: Option<OptionId>,
    #[serde(rename = "ville", default)]
    pub city: Option<String>,
    #[serde(rename = "quartier", default)]
    pub neighborhood: Option<String>,

    // Step 2: academic history
    #[serde(rename = "bac_id", default)]
    pub exam_type_id: Option<OptionId>,
    #[serde(rename = "serie_id", default)]
    pub track_id: Option<OptionId>,
    #[serde(rename = "filiere_id", default)]
    pub program_id: Option<OptionId>,
    #[serde(rename = "niveau_id", default)]
    pub level_id: Option<OptionId>,
    #[serde(rename = "mention_id", default)]
    pub mention_id: Option<OptionId>,
    /// Numeric score, required instead of a mention for GCE-style schemes
    #[serde(rename = "mention_points", default)]
    pub score_points: Option<f64>,
    #[serde(rename = "etablissement_origine", default)]
    pub origin_institution: Option<String>,
    #[serde(rename = "annee_obtention_diplome", default)]
    pub diploma_year: Option<i32>,
    #[serde(rename = "centre_examen_id", default)]
    pub exam_center_id: Option<OptionId>,
    #[serde(rename = "centre_depot_id", default)]
    pub deposit_center_id: Option<OptionId>,

    // Step 3: family contacts
    #[serde(rename = "nom_pere", default)]
    pub father_name: Option<String>,
    #[serde(rename = "tel_pere", default)]
    pub father_phone: Option<String>,
    #[serde(rename = "nom_mere", default)]
    pub mother_name: Option<String>,
    #[serde(rename = "tel_mere", default)]
    pub mother_phone: Option<String>,

    // Staged documents (photo, identity document, diploma)
    #[serde(skip)]
    pub photo: Option<DocumentRef>,
    #[serde(skip)]
    pub identity_document: Option<DocumentRef>,
    #[serde(skip)]
    pub diploma: Option<DocumentRef>,
}

impl EnrollmentDraft {
    /// Start a draft from an eligibility lookup's profile fields.
    pub fn from_prefill(prefill: &EligibilityPrefill) -> Self {
        Self {
            last_name: prefill.last_name.clone(),
            first_name: prefill.first_name.clone(),
            birth_date: prefill.birth_date,
            birth_place: prefill.birth_place.clone(),
            sex: prefill.sex,
            ..Self::default()
        }
    }

    pub fn document(&self, kind: DocumentKind) -> Option<&DocumentRef> {
        match kind {
            DocumentKind::Photo => self.photo.as_ref(),
            DocumentKind::IdentityDocument => self.identity_document.as_ref(),
            DocumentKind::Diploma => self.diploma.as_ref(),
        }
    }

    pub fn set_document(&mut self, kind: DocumentKind, document: DocumentRef) {
        match kind {
            DocumentKind::Photo => self.photo = Some(document),
            DocumentKind::IdentityDocument => self.identity_document = Some(document),
            DocumentKind::Diploma => self.diploma = Some(document),
        }
    }

    /// Flatten every scalar field into (wire name, value) pairs for the
    /// multipart submission. Unset fields are sent as empty strings, which
    /// is what the backend serializer expects.
    pub fn wire_fields(&self) -> Vec<(&'static str, String)> {
        fn s(v: &Option<String>) -> String {
            v.clone().unwrap_or_default()
        }
        fn id(v: &Option<OptionId>) -> String {
            v.map(|i| i.to_string()).unwrap_or_default()
        }

        vec![
            ("nom", s(&self.last_name)),
            ("prenom", s(&self.first_name)),
            (
                "date_naissance",
                self.birth_date.map(|d| d.to_string()).unwrap_or_default(),
            ),
            ("lieu_naissance", s(&self.birth_place)),
            (
                "sexe",
                match self.sex {
                    Some(Sex::Male) => "M".to_string(),
                    Some(Sex::Female) => "F".to_string(),
                    None => String::new(),
                },
            ),
            ("email", s(&self.email)),
            ("telephone_secondaire", s(&self.primary_phone)),
            ("region_id", id(&self.region_id)),
            ("departement_id", id(&self.department_id)),
            ("ville", s(&self.city)),
            ("quartier", s(&self.neighborhood)),
            ("bac_id", id(&self.exam_type_id)),
            ("serie_id", id(&self.track_id)),
            ("filiere_id", id(&self.program_id)),
            ("niveau_id", id(&self.level_id)),
            ("mention_id", id(&self.mention_id)),
            (
                "mention_points",
                self.score_points.map(|p| p.to_string()).unwrap_or_default(),
            ),
            ("etablissement_origine", s(&self.origin_institution)),
            (
                "annee_obtention_diplome",
                self.diploma_year.map(|y| y.to_string()).unwrap_or_default(),
            ),
            ("centre_examen_id", id(&self.exam_center_id)),
            ("centre_depot_id", id(&self.deposit_center_id)),
            ("nom_pere", s(&self.father_name)),
            ("tel_pere", s(&self.father_phone)),
            ("nom_mere", s(&self.mother_name)),
            ("tel_mere", s(&self.mother_phone)),
        ]
    }
}
