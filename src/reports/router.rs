use std::sync::Arc;

use axum::extract::{FromRef, Path, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;

use crate::assessment::AssessmentRepository;
use crate::auth::{query_param, CurrentUser, SessionStore};

use super::service::{ReportExportError, ReportService};

/// State shared by the reporting endpoints.
pub struct ReportsState<R> {
    pub sessions: Arc<SessionStore>,
    pub service: Arc<ReportService<R>>,
}

impl<R> Clone for ReportsState<R> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            service: self.service.clone(),
        }
    }
}

impl<R> FromRef<ReportsState<R>> for Arc<SessionStore> {
    fn from_ref(state: &ReportsState<R>) -> Self {
        state.sessions.clone()
    }
}

/// Router builder exposing the dashboard report, area drill-down, and
/// export endpoints.
pub fn reports_router<R>(state: ReportsState<R>) -> Router
where
    R: AssessmentRepository + 'static,
{
    Router::new()
        .route("/reports", get(report_handler::<R>))
        .route("/reports/areas/:id", get(area_handler::<R>))
        .route("/reports/:id/export", get(export_handler::<R>))
        .with_state(state)
}

pub(crate) async fn report_handler<R>(
    State(state): State<ReportsState<R>>,
    CurrentUser(user): CurrentUser,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let today = Utc::now().date_naive();
    match state.service.document(&user.username, today) {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn area_handler<R>(
    State(state): State<ReportsState<R>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let today = Utc::now().date_naive();
    match state.service.area_detail(&user.username, &id, today) {
        Ok(Some(detail)) => (StatusCode::OK, Json(detail)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Obszar o podanym ID nie istnieje" })),
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn export_handler<R>(
    State(state): State<ReportsState<R>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    uri: Uri,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let format = query_param(&uri, "format").unwrap_or_else(|| "json".to_string());
    let today = Utc::now().date_naive();

    match state.service.export(&user.username, &id, &format, today) {
        Ok((content_type, filename, payload)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            payload,
        )
            .into_response(),
        Err(ReportExportError::UnsupportedFormat(format)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Nieobsługiwany format eksportu: {format}") })),
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}
