pub mod answers;
pub mod compliance;
pub mod domain;
pub mod navigation;
pub mod progress;
pub mod repository;
mod router;
mod service;
pub mod template;

pub use repository::{AssessmentRecord, AssessmentRepository, InMemoryAssessmentRepository};
pub use router::{assessment_router, AssessmentState};
pub use service::{
    AssessmentOverview, AssessmentService, AssessmentServiceError, PortfolioSummary,
};
