use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::session::{AuthError, IssuedSession, RegisterRequest, SessionStore, SessionUser};

/// Routes for opening and checking sessions.
pub fn auth_router(sessions: Arc<SessionStore>) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .route("/register", post(register_handler))
        .route("/verify-token", get(verify_token_handler))
        .with_state(sessions)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest {
    #[serde(default)]
    user_name: String,
    #[serde(default)]
    password: String,
}

fn session_body(issued: &IssuedSession) -> serde_json::Value {
    json!({
        "token": issued.token,
        "username": issued.user.username,
        "email": issued.user.email,
        "role": issued.user.role,
    })
}

fn auth_error_response(error: AuthError) -> Response {
    let status = match error {
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

pub(crate) async fn login_handler(
    State(sessions): State<Arc<SessionStore>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    match sessions.login(&request.user_name, &request.password) {
        Ok(issued) => (StatusCode::OK, Json(session_body(&issued))).into_response(),
        Err(error) => auth_error_response(error),
    }
}

pub(crate) async fn register_handler(
    State(sessions): State<Arc<SessionStore>>,
    Json(request): Json<RegisterRequest>,
) -> Response {
    match sessions.register(request) {
        Ok(issued) => (StatusCode::CREATED, Json(session_body(&issued))).into_response(),
        Err(error) => auth_error_response(error),
    }
}

pub(crate) async fn verify_token_handler(
    State(sessions): State<Arc<SessionStore>>,
    parts: Parts,
) -> Response {
    match bearer_token(&parts).and_then(|token| sessions.resolve(&token)) {
        Some(user) => (
            StatusCode::OK,
            Json(json!({
                "valid": true,
                "username": user.username,
                "email": user.email,
                "role": user.role,
            })),
        )
            .into_response(),
        None => (StatusCode::UNAUTHORIZED, Json(json!({ "valid": false }))).into_response(),
    }
}

/// Identity extractor for protected routes. Accepts the bearer header or a
/// `token` query parameter; a miss answers 401 and tells the client to drop
/// its stored token.
pub struct CurrentUser(pub SessionUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Arc<SessionStore>: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = Arc::<SessionStore>::from_ref(state);
        bearer_token(parts)
            .and_then(|token| sessions.resolve(&token))
            .map(CurrentUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "Nieautoryzowany dostęp" })),
                )
                    .into_response()
            })
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    from_header.or_else(|| query_param(&parts.uri, "token"))
}

/// Minimal query-string lookup; the router runs without axum's query
/// extractor feature.
pub fn query_param(uri: &Uri, name: &str) -> Option<String> {
    uri.query()?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_param_finds_the_named_pair() {
        let uri: Uri = "/assessments?page=1&token=abc123".parse().expect("uri");
        assert_eq!(query_param(&uri, "token"), Some("abc123".to_string()));
        assert_eq!(query_param(&uri, "page"), Some("1".to_string()));
        assert_eq!(query_param(&uri, "size"), None);

        let bare: Uri = "/assessments".parse().expect("uri");
        assert_eq!(query_param(&bare, "token"), None);
    }
}
