//! Progress bookkeeping across a questionnaire tree.

use super::answers;
use super::domain::{Assessment, AssessmentStatus};

/// Percentage of answered requirements, rounded to the nearest integer.
/// A tree without requirements reports 0, never NaN.
pub fn progress(assessment: &Assessment) -> u8 {
    let mut total = 0usize;
    let mut answered = 0usize;

    for requirement in assessment.requirements() {
        total += 1;
        if answers::is_answered(requirement) {
            answered += 1;
        }
    }

    if total == 0 {
        return 0;
    }

    ((answered as f64 / total as f64) * 100.0).round() as u8
}

/// Status implied by a progress percentage.
pub fn derive_status(progress: u8) -> AssessmentStatus {
    match progress {
        0 => AssessmentStatus::Draft,
        100 => AssessmentStatus::Completed,
        _ => AssessmentStatus::InProgress,
    }
}

/// Recompute the derived fields in place. Runs after every requirement edit
/// and before every save.
pub fn refresh(assessment: &mut Assessment) {
    assessment.progress = progress(assessment);
    assessment.status = derive_status(assessment.progress);
}
