//! The single source of truth for the value/status answer pairing.
//!
//! Every requirement carries its answer twice: as a `value` (`yes`, `no`,
//! `partial`, `na`, or empty) and as a `status` (`NOT_STARTED`, `COMPLETED`,
//! `NOT_APPLICABLE`, `IN_PROGRESS`). The two fields must always agree, so all
//! writes go through [`set_answer`] or [`set_answer_by_status`]; nothing else
//! in the crate mutates either field directly.
//!
//! `na` shares `NOT_APPLICABLE` with `no`; the inverse mapping resolves
//! `NOT_APPLICABLE` back to `no`.

use super::domain::{AnswerValue, Requirement, RequirementStatus};

/// Status implied by a value.
pub fn status_for(value: Option<AnswerValue>) -> RequirementStatus {
    match value {
        Some(AnswerValue::Yes) => RequirementStatus::Completed,
        Some(AnswerValue::No) | Some(AnswerValue::Na) => RequirementStatus::NotApplicable,
        Some(AnswerValue::Partial) => RequirementStatus::InProgress,
        None => RequirementStatus::NotStarted,
    }
}

/// Value implied by a status.
pub fn value_for(status: RequirementStatus) -> Option<AnswerValue> {
    match status {
        RequirementStatus::Completed => Some(AnswerValue::Yes),
        RequirementStatus::NotApplicable => Some(AnswerValue::No),
        RequirementStatus::InProgress => Some(AnswerValue::Partial),
        RequirementStatus::NotStarted => None,
    }
}

/// Record an answer by value, rewriting the status to match.
pub fn set_answer(requirement: &mut Requirement, value: Option<AnswerValue>) {
    requirement.value = value;
    requirement.status = status_for(value);
}

/// Record an answer by status, rewriting the value to match.
pub fn set_answer_by_status(requirement: &mut Requirement, status: RequirementStatus) {
    requirement.status = status;
    requirement.value = value_for(status);
}

/// A requirement counts as answered when either encoding says so.
pub fn is_answered(requirement: &Requirement) -> bool {
    requirement.value.is_some() || requirement.status != RequirementStatus::NotStarted
}

/// The value to score with, falling back to the status when a payload
/// arrived with only one side of the pair filled in.
pub fn effective_value(requirement: &Requirement) -> Option<AnswerValue> {
    requirement.value.or_else(|| value_for(requirement.status))
}

/// Wire codec for the `value` field: unanswered serializes as `""`.
pub mod value_wire {
    use super::AnswerValue;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<AnswerValue>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(answer) => serializer.serialize_str(answer.as_str()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<AnswerValue>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref() {
            Some("yes") => Some(AnswerValue::Yes),
            Some("no") => Some(AnswerValue::No),
            Some("partial") => Some(AnswerValue::Partial),
            Some("na") => Some(AnswerValue::Na),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_answer_keeps_both_encodings_in_agreement() {
        let mut requirement = Requirement::default();

        for value in [
            Some(AnswerValue::Yes),
            Some(AnswerValue::No),
            Some(AnswerValue::Partial),
            Some(AnswerValue::Na),
            None,
        ] {
            set_answer(&mut requirement, value);
            assert_eq!(requirement.value, value);
            assert_eq!(requirement.status, status_for(value));
        }
    }

    #[test]
    fn set_answer_by_status_derives_the_inverse_value() {
        let mut requirement = Requirement::default();

        for status in [
            RequirementStatus::Completed,
            RequirementStatus::NotApplicable,
            RequirementStatus::InProgress,
            RequirementStatus::NotStarted,
        ] {
            set_answer_by_status(&mut requirement, status);
            assert_eq!(requirement.status, status);
            assert_eq!(requirement.value, value_for(status));
        }
    }

    #[test]
    fn not_applicable_resolves_to_no() {
        let mut requirement = Requirement::default();
        set_answer(&mut requirement, Some(AnswerValue::Na));
        assert_eq!(requirement.status, RequirementStatus::NotApplicable);

        set_answer_by_status(&mut requirement, RequirementStatus::NotApplicable);
        assert_eq!(requirement.value, Some(AnswerValue::No));
    }

    #[test]
    fn answered_checks_both_fields() {
        let mut requirement = Requirement::default();
        assert!(!is_answered(&requirement));

        // A lopsided payload (status set, value missing) still counts.
        requirement.status = RequirementStatus::InProgress;
        assert!(is_answered(&requirement));
        assert_eq!(effective_value(&requirement), Some(AnswerValue::Partial));
    }

    #[test]
    fn empty_string_deserializes_as_unanswered() {
        let requirement: Requirement =
            serde_json::from_str(r#"{"value":""}"#).expect("empty value parses");
        assert!(requirement.value.is_none());

        let json = serde_json::to_value(&requirement).expect("serializes");
        assert_eq!(json["value"], "");
    }
}
