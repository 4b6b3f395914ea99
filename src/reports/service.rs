use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};

use crate::assessment::{
    answers, compliance,
    domain::{AnswerValue, Area},
    AssessmentRepository, AssessmentService, AssessmentServiceError,
};
use crate::remedial::{self, ActionStatus, RemedialCatalog};

use super::views::{
    AreaDetailView, AreaRequirementView, ComplianceAreaView, DeadlineView, RecommendationView,
    ReportDocument, RiskLevel, RiskSummary, TrendPoint,
};

/// How far ahead the deadline panel looks.
const DEADLINE_WINDOW_DAYS: i64 = 30;

/// Builds report documents from the caller's assessments and the remedial
/// catalog. Read-only over both.
pub struct ReportService<R> {
    assessments: Arc<AssessmentService<R>>,
    remedial: Arc<RemedialCatalog>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportExportError {
    #[error(transparent)]
    Assessments(#[from] AssessmentServiceError),
    #[error("unsupported export format '{0}'")]
    UnsupportedFormat(String),
    #[error("csv rendering failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("json rendering failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl<R> ReportService<R>
where
    R: AssessmentRepository + 'static,
{
    pub fn new(assessments: Arc<AssessmentService<R>>, remedial: Arc<RemedialCatalog>) -> Self {
        Self {
            assessments,
            remedial,
        }
    }

    /// The dashboard report: per-area compliance, risk buckets, trend
    /// series, recommendations, and the remedial panel.
    pub fn document(
        &self,
        owner: &str,
        today: NaiveDate,
    ) -> Result<ReportDocument, AssessmentServiceError> {
        let assessments = self.assessments.assessments_for(owner)?;
        let actions = self.remedial.actions();

        let mut compliance_areas = Vec::new();
        let mut risk_assessment = RiskSummary::default();

        for assessment in &assessments {
            let last_updated = assessment
                .updated_at
                .map(|stamp| stamp.date_naive())
                .unwrap_or(today);
            for area in assessment.areas() {
                if area.requirements.is_empty() {
                    continue;
                }
                let score = compliance::area_compliance(area).unwrap_or(0);
                let risk = RiskLevel::from_compliance(score);
                match risk {
                    RiskLevel::High => risk_assessment.high += 1,
                    RiskLevel::Medium => risk_assessment.medium += 1,
                    RiskLevel::Low => risk_assessment.low += 1,
                }
                compliance_areas.push(ComplianceAreaView {
                    id: area.id.clone(),
                    name: area.name.clone(),
                    score,
                    risk,
                    last_updated,
                });
            }
        }

        let overall = {
            let chapters: Vec<_> = assessments
                .iter()
                .flat_map(|assessment| assessment.chapters.iter().cloned())
                .collect();
            compliance::overall_compliance(&chapters)
        };

        let recommendations = actions
            .iter()
            .map(|action| RecommendationView {
                id: action.id,
                text: action.title.clone(),
                priority: action.priority.label(),
                status: action.status.label(),
            })
            .collect();

        let upcoming_deadlines = actions
            .iter()
            .filter(|action| action.status != ActionStatus::Done)
            .filter(|action| {
                action.due_date >= today
                    && action.due_date <= today + Duration::days(DEADLINE_WINDOW_DAYS)
            })
            .map(|action| DeadlineView {
                id: action.id,
                title: action.title.clone(),
                due_date: action.due_date,
                assigned_to: action.assigned_to.clone(),
            })
            .collect();

        Ok(ReportDocument {
            compliance_areas,
            risk_assessment,
            trends: trend_series(overall, today),
            recommendations,
            upcoming_deadlines,
            remedial_actions: actions,
        })
    }

    /// Drill-down for a single area, or `None` when the caller owns no such
    /// area.
    pub fn area_detail(
        &self,
        owner: &str,
        area_id: &str,
        today: NaiveDate,
    ) -> Result<Option<AreaDetailView>, AssessmentServiceError> {
        let assessments = self.assessments.assessments_for(owner)?;

        for assessment in &assessments {
            for area in assessment.areas() {
                if area.id == area_id {
                    let last_updated = assessment
                        .updated_at
                        .map(|stamp| stamp.date_naive())
                        .unwrap_or(today);
                    return Ok(Some(self.describe_area(area, last_updated, today)));
                }
            }
        }
        Ok(None)
    }

    /// Downloadable rendition of the report: `csv` exports the remedial
    /// list, `json` the full document.
    pub fn export(
        &self,
        owner: &str,
        report_id: &str,
        format: &str,
        today: NaiveDate,
    ) -> Result<(&'static str, String, Vec<u8>), ReportExportError> {
        match format {
            "csv" => {
                let sorted = remedial::filter::select(
                    &self.remedial.actions(),
                    &remedial::ActionFilter::default(),
                    remedial::ActionSort::default(),
                );
                let payload = remedial::export::to_csv(&sorted)?;
                Ok((
                    "text/csv",
                    format!("raport_rodo_{report_id}.csv"),
                    payload,
                ))
            }
            "json" => {
                let document = self.document(owner, today)?;
                let payload = serde_json::to_vec_pretty(&document)?;
                Ok((
                    "application/json",
                    format!("raport_rodo_{report_id}.json"),
                    payload,
                ))
            }
            other => Err(ReportExportError::UnsupportedFormat(other.to_string())),
        }
    }

    fn describe_area(
        &self,
        area: &Area,
        last_updated: NaiveDate,
        today: NaiveDate,
    ) -> AreaDetailView {
        let score = compliance::area_compliance(area).unwrap_or(0);

        let requirements = area
            .requirements
            .iter()
            .map(|requirement| {
                let effective = answers::effective_value(requirement);
                AreaRequirementView {
                    id: requirement.id.clone(),
                    text: requirement.text.clone(),
                    answer: effective.map_or("", AnswerValue::ui_label),
                    status: answer_label(effective),
                    comment: requirement.comment.clone(),
                }
            })
            .collect();

        let recommendations = self
            .remedial
            .actions()
            .iter()
            .filter(|action| action.area == area.name)
            .map(|action| RecommendationView {
                id: action.id,
                text: action.title.clone(),
                priority: action.priority.label(),
                status: action.status.label(),
            })
            .collect();

        AreaDetailView {
            id: area.id.clone(),
            name: area.name.clone(),
            description: area.description.clone(),
            score,
            risk: RiskLevel::from_compliance(score),
            last_updated,
            requirements,
            progress_history: trend_series(score, today),
            recommendations,
        }
    }
}

fn answer_label(value: Option<AnswerValue>) -> &'static str {
    match value {
        Some(AnswerValue::Yes) => "zgodny",
        Some(AnswerValue::Partial) => "częściowo zgodny",
        Some(AnswerValue::No) => "niezgodny",
        Some(AnswerValue::Na) => "nie dotyczy",
        None => "brak odpowiedzi",
    }
}

/// Six monthly points ending at the current score, back-filled at ten
/// points per month until real history exists.
fn trend_series(current: u8, today: NaiveDate) -> Vec<TrendPoint> {
    (0..6)
        .rev()
        .map(|months_back| {
            let month = shift_month(today, months_back);
            TrendPoint {
                month,
                score: current.saturating_sub(10 * months_back as u8),
            }
        })
        .collect()
}

fn shift_month(today: NaiveDate, months_back: u32) -> String {
    let absolute = today.year() as i64 * 12 + i64::from(today.month0()) - i64::from(months_back);
    let year = absolute.div_euclid(12);
    let month = absolute.rem_euclid(12) + 1;
    format!("{year:04}-{month:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::Assessment;
    use crate::assessment::{template, InMemoryAssessmentRepository};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 20).expect("valid date")
    }

    fn service() -> ReportService<InMemoryAssessmentRepository> {
        let repository = Arc::new(InMemoryAssessmentRepository::default());
        let assessments = Arc::new(AssessmentService::new(repository));
        ReportService::new(assessments, Arc::new(RemedialCatalog::seeded()))
    }

    fn seeded_assessment(service: &ReportService<InMemoryAssessmentRepository>) -> Assessment {
        let mut draft = template::standard_template();
        draft.name = "Ocena działu IT".to_string();
        answers::set_answer(
            &mut draft.chapters[0].areas[0].requirements[0],
            Some(AnswerValue::Yes),
        );
        service
            .assessments
            .create("iod", draft)
            .expect("create succeeds")
    }

    #[test]
    fn document_buckets_every_scored_area() {
        let service = service();
        seeded_assessment(&service);

        let document = service.document("iod", today()).expect("document builds");
        assert!(!document.compliance_areas.is_empty());

        let bucketed = document.risk_assessment.high
            + document.risk_assessment.medium
            + document.risk_assessment.low;
        assert_eq!(bucketed, document.compliance_areas.len());
        assert_eq!(document.trends.len(), 6);
        assert_eq!(document.remedial_actions.len(), 3);
    }

    #[test]
    fn deadline_panel_skips_done_and_distant_actions() {
        let service = service();
        seeded_assessment(&service);

        let document = service.document("iod", today()).expect("document builds");
        // Seeded action 1 is due 2025-05-15 (within 30 days of 2025-04-20);
        // action 2 is due 2025-06-01 (too far); action 3 is done.
        let ids: Vec<u64> = document
            .upcoming_deadlines
            .iter()
            .map(|deadline| deadline.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn area_detail_reports_answer_labels() {
        let service = service();
        let stored = seeded_assessment(&service);
        let area_id = stored.chapters[0].areas[0].id.clone();

        let detail = service
            .area_detail("iod", &area_id, today())
            .expect("lookup succeeds")
            .expect("area exists");
        assert_eq!(detail.score, 100);
        assert_eq!(detail.risk, RiskLevel::Low);
        assert_eq!(detail.requirements[0].answer, "TAK");
        assert_eq!(detail.requirements[0].status, "zgodny");
        assert_eq!(detail.requirements[1].answer, "");
        assert_eq!(detail.requirements[1].status, "brak odpowiedzi");

        assert!(service
            .area_detail("iod", "nie-ma-takiego", today())
            .expect("lookup succeeds")
            .is_none());
    }

    #[test]
    fn export_rejects_unknown_formats() {
        let service = service();
        seeded_assessment(&service);

        let (content_type, filename, payload) = service
            .export("iod", "2025", "csv", today())
            .expect("csv export");
        assert_eq!(content_type, "text/csv");
        assert_eq!(filename, "raport_rodo_2025.csv");
        assert!(!payload.is_empty());

        assert!(matches!(
            service.export("iod", "2025", "pdf", today()),
            Err(ReportExportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn month_arithmetic_crosses_year_boundaries() {
        let january = NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date");
        assert_eq!(shift_month(january, 0), "2025-01");
        assert_eq!(shift_month(january, 1), "2024-12");
        assert_eq!(shift_month(january, 5), "2024-08");
    }
}
