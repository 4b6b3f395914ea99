use std::sync::Arc;

use axum::extract::{FromRef, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::auth::{CurrentUser, SessionStore};

use super::domain::Assessment;
use super::repository::{AssessmentRepository, RepositoryError};
use super::service::{AssessmentService, AssessmentServiceError};

/// State shared by the assessment endpoints.
pub struct AssessmentState<R> {
    pub sessions: Arc<SessionStore>,
    pub service: Arc<AssessmentService<R>>,
}

impl<R> Clone for AssessmentState<R> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            service: self.service.clone(),
        }
    }
}

impl<R> FromRef<AssessmentState<R>> for Arc<SessionStore> {
    fn from_ref(state: &AssessmentState<R>) -> Self {
        state.sessions.clone()
    }
}

/// Router builder exposing the assessment CRUD, summary, template, and
/// export endpoints.
pub fn assessment_router<R>(state: AssessmentState<R>) -> Router
where
    R: AssessmentRepository + 'static,
{
    Router::new()
        .route(
            "/assessments",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route("/assessments/summary", get(summary_handler::<R>))
        .route("/assessments/template", get(template_handler::<R>))
        .route(
            "/assessments/:id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route("/assessments/:id/export", get(export_handler::<R>))
        .with_state(state)
}

fn error_response(error: AssessmentServiceError) -> Response {
    let (status, message) = match error {
        AssessmentServiceError::NotFound
        | AssessmentServiceError::Repository(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            "Ocena o podanym ID nie istnieje".to_string(),
        ),
        AssessmentServiceError::Forbidden => (
            StatusCode::FORBIDDEN,
            "Brak dostępu do tej oceny".to_string(),
        ),
        AssessmentServiceError::MissingName => (
            StatusCode::BAD_REQUEST,
            "Nazwa oceny jest wymagana".to_string(),
        ),
        AssessmentServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, "Ocena już istnieje".to_string())
        }
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    };

    (status, Json(json!({ "error": message }))).into_response()
}

pub(crate) async fn list_handler<R>(
    State(state): State<AssessmentState<R>>,
    CurrentUser(user): CurrentUser,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match state.service.list(&user.username) {
        Ok(overviews) => (StatusCode::OK, Json(overviews)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn summary_handler<R>(
    State(state): State<AssessmentState<R>>,
    CurrentUser(user): CurrentUser,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match state.service.summary(&user.username) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn template_handler<R>(
    State(state): State<AssessmentState<R>>,
    CurrentUser(_user): CurrentUser,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    (StatusCode::OK, Json(state.service.template())).into_response()
}

pub(crate) async fn create_handler<R>(
    State(state): State<AssessmentState<R>>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<Assessment>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match state.service.create(&user.username, draft) {
        Ok(assessment) => (
            StatusCode::CREATED,
            Json(json!({
                "id": assessment.id,
                "success": true,
                "message": "Ocena została utworzona",
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(state): State<AssessmentState<R>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match state.service.get(&user.username, &id) {
        Ok(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(state): State<AssessmentState<R>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(draft): Json<Assessment>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match state.service.update(&user.username, &id, draft) {
        Ok(assessment) => (
            StatusCode::OK,
            Json(json!({
                "id": assessment.id,
                "success": true,
                "message": "Ocena została zaktualizowana",
                "progress": assessment.progress,
                "status": assessment.status,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(state): State<AssessmentState<R>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match state.service.delete(&user.username, &id) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Ocena została usunięta",
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<R>(
    State(state): State<AssessmentState<R>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match state.service.export(&user.username, &id) {
        Ok((filename, payload)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            payload,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}
