use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::answers;

/// Identifier carried by an assessment that has never been persisted.
pub const DRAFT_ID: &str = "new";

/// Lifecycle state of an assessment, derived from its progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssessmentStatus {
    #[default]
    Draft,
    InProgress,
    Completed,
}

impl AssessmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::InProgress => "W TRAKCIE",
            Self::Completed => "ZAKOŃCZONA",
        }
    }
}

/// How a single requirement was answered.
///
/// An unanswered requirement is `None` at the type level and the empty
/// string on the wire; see [`answers`] for the paired status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerValue {
    Yes,
    No,
    Partial,
    Na,
}

impl AnswerValue {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Partial => "partial",
            Self::Na => "na",
        }
    }

    /// Questionnaire vocabulary shown to respondents.
    pub const fn ui_label(self) -> &'static str {
        match self {
            Self::Yes => "TAK",
            Self::No => "NIE",
            Self::Partial => "W REALIZACJI",
            Self::Na => "ND",
        }
    }

    pub fn from_ui_label(label: &str) -> Option<Self> {
        match label {
            "TAK" => Some(Self::Yes),
            "NIE" => Some(Self::No),
            "W REALIZACJI" => Some(Self::Partial),
            "ND" => Some(Self::Na),
            _ => None,
        }
    }
}

/// The second encoding of a requirement answer, kept in lockstep with
/// [`AnswerValue`] through [`answers::set_answer`] and
/// [`answers::set_answer_by_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementStatus {
    #[default]
    NotStarted,
    Completed,
    NotApplicable,
    InProgress,
}

impl RequirementStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "NIEROZPOCZĘTE",
            Self::Completed => "ZREALIZOWANE",
            Self::NotApplicable => "NIE DOTYCZY",
            Self::InProgress => "W REALIZACJI",
        }
    }
}

/// A reviewer's qualitative judgement of a whole area. Independent of the
/// requirement answers underneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaScore {
    Positive,
    Reservations,
    Negative,
    InProgress,
    NotApplicable,
}

impl AreaScore {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Positive => "POZYTYWNA",
            Self::Reservations => "ZASTRZEŻENIA",
            Self::Negative => "NEGATYWNA",
            Self::InProgress => "W REALIZACJI",
            Self::NotApplicable => "NIE DOTYCZY",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, with = "answers::value_wire")]
    pub value: Option<AnswerValue>,
    #[serde(default)]
    pub status: RequirementStatus,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: Option<AreaScore>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub areas: Vec<Area>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(default = "draft_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: AssessmentStatus,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

fn draft_id() -> String {
    DRAFT_ID.to_string()
}

impl Default for Assessment {
    fn default() -> Self {
        Self {
            id: draft_id(),
            name: String::new(),
            description: String::new(),
            status: AssessmentStatus::Draft,
            progress: 0,
            created_at: None,
            updated_at: None,
            chapters: Vec::new(),
        }
    }
}

impl Assessment {
    pub fn is_draft(&self) -> bool {
        self.id == DRAFT_ID
    }

    /// Iterate every requirement under every area of every chapter.
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.chapters
            .iter()
            .flat_map(|chapter| chapter.areas.iter())
            .flat_map(|area| area.requirements.iter())
    }

    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.chapters.iter().flat_map(|chapter| chapter.areas.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirement_defaults_are_unanswered() {
        let requirement: Requirement = serde_json::from_str("{}").expect("empty object parses");
        assert!(requirement.value.is_none());
        assert_eq!(requirement.status, RequirementStatus::NotStarted);
        assert!(requirement.comment.is_empty());
    }

    #[test]
    fn assessment_without_chapters_parses_to_empty_tree() {
        let assessment: Assessment =
            serde_json::from_str(r#"{"name":"Ocena działu IT"}"#).expect("parses");
        assert_eq!(assessment.id, DRAFT_ID);
        assert!(assessment.chapters.is_empty());
        assert_eq!(assessment.status, AssessmentStatus::Draft);
    }

    #[test]
    fn ui_labels_round_trip() {
        for value in [
            AnswerValue::Yes,
            AnswerValue::No,
            AnswerValue::Partial,
            AnswerValue::Na,
        ] {
            assert_eq!(AnswerValue::from_ui_label(value.ui_label()), Some(value));
        }
        assert_eq!(AnswerValue::from_ui_label("MOŻE"), None);
    }
}
