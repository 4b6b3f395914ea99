//! User profile, company record, and password management.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::{AuthError, CurrentUser, SessionStore};

/// Contact details kept next to the credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub notifications: bool,
}

/// Registered company record shown on the settings screens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub nip: String,
    #[serde(default)]
    pub regon: String,
    #[serde(default)]
    pub industry: String,
}

/// Process-local profile storage keyed by username. Missing entries read
/// as empty records rather than errors.
#[derive(Default)]
pub struct AccountStore {
    profiles: Mutex<HashMap<String, UserProfile>>,
    companies: Mutex<HashMap<String, CompanyProfile>>,
}

impl AccountStore {
    pub fn profile(&self, username: &str) -> UserProfile {
        self.profiles
            .lock()
            .expect("profile mutex poisoned")
            .get(username)
            .cloned()
            .unwrap_or_default()
    }

    pub fn update_profile(&self, username: &str, profile: UserProfile) {
        self.profiles
            .lock()
            .expect("profile mutex poisoned")
            .insert(username.to_string(), profile);
    }

    pub fn company(&self, username: &str) -> CompanyProfile {
        self.companies
            .lock()
            .expect("company mutex poisoned")
            .get(username)
            .cloned()
            .unwrap_or_default()
    }

    pub fn update_company(&self, username: &str, company: CompanyProfile) {
        self.companies
            .lock()
            .expect("company mutex poisoned")
            .insert(username.to_string(), company);
    }
}

/// State shared by the `/users` endpoints.
#[derive(Clone)]
pub struct AccountState {
    pub sessions: Arc<SessionStore>,
    pub accounts: Arc<AccountStore>,
}

impl FromRef<AccountState> for Arc<SessionStore> {
    fn from_ref(state: &AccountState) -> Self {
        state.sessions.clone()
    }
}

pub fn account_router(state: AccountState) -> Router {
    Router::new()
        .route(
            "/users/profile",
            get(profile_handler).put(update_profile_handler),
        )
        .route(
            "/users/company",
            get(company_handler).put(update_company_handler),
        )
        .route("/users/password", put(password_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProfileUpdate {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    position: String,
    #[serde(default)]
    notifications: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordChange {
    #[serde(default)]
    current_password: String,
    #[serde(default)]
    new_password: String,
}

fn profile_body(state: &AccountState, user: &crate::auth::SessionUser) -> serde_json::Value {
    let names = state.sessions.names(&user.username).unwrap_or_else(|| {
        crate::auth::session::AccountNames {
            first_name: String::new(),
            last_name: String::new(),
        }
    });
    let profile = state.accounts.profile(&user.username);

    json!({
        "username": user.username,
        "email": user.email,
        "firstName": names.first_name,
        "lastName": names.last_name,
        "phone": profile.phone,
        "position": profile.position,
        "notifications": profile.notifications,
    })
}

pub(crate) async fn profile_handler(
    State(state): State<AccountState>,
    CurrentUser(user): CurrentUser,
) -> Response {
    (StatusCode::OK, Json(profile_body(&state, &user))).into_response()
}

pub(crate) async fn update_profile_handler(
    State(state): State<AccountState>,
    CurrentUser(user): CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> Response {
    state
        .sessions
        .update_names(&user.username, &update.first_name, &update.last_name);
    state.accounts.update_profile(
        &user.username,
        UserProfile {
            phone: update.phone,
            position: update.position,
            notifications: update.notifications,
        },
    );

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Profil został zaktualizowany",
        })),
    )
        .into_response()
}

pub(crate) async fn company_handler(
    State(state): State<AccountState>,
    CurrentUser(user): CurrentUser,
) -> Response {
    (StatusCode::OK, Json(state.accounts.company(&user.username))).into_response()
}

pub(crate) async fn update_company_handler(
    State(state): State<AccountState>,
    CurrentUser(user): CurrentUser,
    Json(company): Json<CompanyProfile>,
) -> Response {
    state.accounts.update_company(&user.username, company);
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Dane firmy zostały zaktualizowane",
        })),
    )
        .into_response()
}

pub(crate) async fn password_handler(
    State(state): State<AccountState>,
    CurrentUser(user): CurrentUser,
    Json(change): Json<PasswordChange>,
) -> Response {
    match state.sessions.change_password(
        &user.username,
        &change.current_password,
        &change.new_password,
    ) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Hasło zostało zmienione",
            })),
        )
            .into_response(),
        Err(error @ AuthError::WrongPassword) | Err(error @ AuthError::WeakPassword) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}
