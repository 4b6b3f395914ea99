//! Serialized shapes for the reporting endpoints.

use chrono::NaiveDate;
use serde::Serialize;

use crate::remedial::RemedialAction;

/// Risk bucket derived from a compliance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_compliance(score: u8) -> Self {
        if score >= 75 {
            Self::Low
        } else if score >= 50 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Niskie",
            Self::Medium => "Średnie",
            Self::High => "Wysokie",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceAreaView {
    pub id: String,
    pub name: String,
    pub score: u8,
    pub risk: RiskLevel,
    pub last_updated: NaiveDate,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RiskSummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub month: String,
    pub score: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationView {
    pub id: u64,
    pub text: String,
    pub priority: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineView {
    pub id: u64,
    pub title: String,
    pub due_date: NaiveDate,
    pub assigned_to: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub compliance_areas: Vec<ComplianceAreaView>,
    pub risk_assessment: RiskSummary,
    pub trends: Vec<TrendPoint>,
    pub recommendations: Vec<RecommendationView>,
    pub upcoming_deadlines: Vec<DeadlineView>,
    pub remedial_actions: Vec<RemedialAction>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaRequirementView {
    pub id: String,
    pub text: String,
    /// Questionnaire vocabulary (`TAK`/`NIE`/`W REALIZACJI`/`ND`), empty
    /// while unanswered.
    pub answer: &'static str,
    pub status: &'static str,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaDetailView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub score: u8,
    pub risk: RiskLevel,
    pub last_updated: NaiveDate,
    pub requirements: Vec<AreaRequirementView>,
    pub progress_history: Vec<TrendPoint>,
    pub recommendations: Vec<RecommendationView>,
}
