use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::Assessment;

/// Repository record pairing a stored tree with its owning account.
#[derive(Debug, Clone)]
pub struct AssessmentRecord {
    pub owner: String,
    pub assessment: Assessment,
}

/// Storage abstraction so services and routers can be exercised in
/// isolation. Implementations serialize writes per record; the service
/// layer makes no further concurrency promise (last write wins).
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;
    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &str) -> Result<Option<AssessmentRecord>, RepositoryError>;
    fn remove(&self, id: &str) -> Result<(), RepositoryError>;
    fn list_for(&self, owner: &str) -> Result<Vec<Assessment>, RepositoryError>;
}

/// Failures surfaced by a repository implementation.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store used by the service binary and the test suites.
#[derive(Default, Clone)]
pub struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<String, AssessmentRecord>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.assessment.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.assessment.id) {
            guard.insert(record.assessment.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &str) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &str) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list_for(&self, owner: &str) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut assessments: Vec<Assessment> = guard
            .values()
            .filter(|record| record.owner == owner)
            .map(|record| record.assessment.clone())
            .collect();
        assessments.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(assessments)
    }
}
