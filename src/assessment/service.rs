use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::compliance::ScoreTally;
use super::domain::{Assessment, AssessmentStatus};
use super::progress;
use super::repository::{AssessmentRecord, AssessmentRepository, RepositoryError};
use super::template;

/// Service owning the assessment lifecycle: drafts come in, derived fields
/// get recomputed, records go out owner-scoped.
pub struct AssessmentService<R> {
    repository: Arc<R>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> String {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("asm-{id:06}")
}

/// Row shape for the dashboard list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentOverview {
    pub id: String,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub status: AssessmentStatus,
    pub progress: u8,
    pub positive_areas: usize,
    pub warning_areas: usize,
    pub negative_areas: usize,
}

/// Aggregate counts across everything the caller owns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_assessments: usize,
    pub in_progress_assessments: usize,
    pub completed_assessments: usize,
    pub positive_areas: usize,
    pub warning_areas: usize,
    pub negative_areas: usize,
    pub total_areas: usize,
    pub compliance_percentage: u8,
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("assessment not found")]
    NotFound,
    #[error("assessment belongs to another account")]
    Forbidden,
    #[error("assessment name is required")]
    MissingName,
    #[error("export serialization failed: {0}")]
    Export(#[from] serde_json::Error),
}

impl<R> AssessmentService<R>
where
    R: AssessmentRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// The standard questionnaire with nothing filled in.
    pub fn template(&self) -> Assessment {
        template::standard_template()
    }

    /// Persist a new assessment, minting its durable identifier.
    pub fn create(
        &self,
        owner: &str,
        draft: Assessment,
    ) -> Result<Assessment, AssessmentServiceError> {
        if draft.name.trim().is_empty() {
            return Err(AssessmentServiceError::MissingName);
        }

        let mut assessment = template::with_fallback_chapters(draft);
        progress::refresh(&mut assessment);
        assessment.id = next_assessment_id();
        let now = Utc::now();
        assessment.created_at = Some(now);
        assessment.updated_at = Some(now);

        let stored = self.repository.insert(AssessmentRecord {
            owner: owner.to_string(),
            assessment,
        })?;
        Ok(stored.assessment)
    }

    /// Overwrite an existing assessment. Derived fields are recomputed and
    /// the creation stamp of the stored record is preserved.
    pub fn update(
        &self,
        owner: &str,
        id: &str,
        draft: Assessment,
    ) -> Result<Assessment, AssessmentServiceError> {
        if draft.name.trim().is_empty() {
            return Err(AssessmentServiceError::MissingName);
        }

        let existing = self.owned(owner, id)?;

        let mut assessment = template::with_fallback_chapters(draft);
        progress::refresh(&mut assessment);
        assessment.id = id.to_string();
        assessment.created_at = existing.assessment.created_at;
        assessment.updated_at = Some(Utc::now());

        self.repository.update(AssessmentRecord {
            owner: owner.to_string(),
            assessment: assessment.clone(),
        })?;
        Ok(assessment)
    }

    pub fn get(&self, owner: &str, id: &str) -> Result<Assessment, AssessmentServiceError> {
        Ok(self.owned(owner, id)?.assessment)
    }

    pub fn delete(&self, owner: &str, id: &str) -> Result<(), AssessmentServiceError> {
        self.owned(owner, id)?;
        self.repository.remove(id)?;
        Ok(())
    }

    pub fn list(&self, owner: &str) -> Result<Vec<AssessmentOverview>, AssessmentServiceError> {
        let assessments = self.repository.list_for(owner)?;
        Ok(assessments
            .into_iter()
            .map(|assessment| {
                let tally = ScoreTally::collect(&assessment.chapters);
                AssessmentOverview {
                    id: assessment.id,
                    name: assessment.name,
                    created_at: assessment.created_at,
                    status: assessment.status,
                    progress: assessment.progress,
                    positive_areas: tally.positive,
                    warning_areas: tally.warning,
                    negative_areas: tally.negative,
                }
            })
            .collect())
    }

    /// Everything the caller owns, full trees included. Report building
    /// feeds from this.
    pub fn assessments_for(&self, owner: &str) -> Result<Vec<Assessment>, AssessmentServiceError> {
        Ok(self.repository.list_for(owner)?)
    }

    pub fn summary(&self, owner: &str) -> Result<PortfolioSummary, AssessmentServiceError> {
        let assessments = self.repository.list_for(owner)?;

        let mut tally = ScoreTally::default();
        let mut total_areas = 0usize;
        let mut in_progress = 0usize;
        let mut completed = 0usize;

        for assessment in &assessments {
            match assessment.status {
                AssessmentStatus::InProgress => in_progress += 1,
                AssessmentStatus::Completed => completed += 1,
                AssessmentStatus::Draft => {}
            }
            total_areas += assessment.areas().count();
            let per_assessment = ScoreTally::collect(&assessment.chapters);
            tally.positive += per_assessment.positive;
            tally.warning += per_assessment.warning;
            tally.negative += per_assessment.negative;
        }

        Ok(PortfolioSummary {
            total_assessments: assessments.len(),
            in_progress_assessments: in_progress,
            completed_assessments: completed,
            positive_areas: tally.positive,
            warning_areas: tally.warning,
            negative_areas: tally.negative,
            total_areas,
            compliance_percentage: tally.blended_percentage(),
        })
    }

    /// Serialize the full tree for download. Never touches stored state.
    pub fn export(
        &self,
        owner: &str,
        id: &str,
    ) -> Result<(String, Vec<u8>), AssessmentServiceError> {
        let assessment = self.get(owner, id)?;
        let filename = format!("assessment_{id}.json");
        let payload = serde_json::to_vec_pretty(&assessment)?;
        Ok((filename, payload))
    }

    fn owned(&self, owner: &str, id: &str) -> Result<AssessmentRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(AssessmentServiceError::NotFound)?;
        if record.owner != owner {
            return Err(AssessmentServiceError::Forbidden);
        }
        Ok(record)
    }
}
