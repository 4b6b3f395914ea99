//! Subscription state and the plan catalog.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::{CurrentUser, SessionStore};

const BILLING_PERIOD_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u32,
    pub currency: &'static str,
    pub period: &'static str,
    pub features: Vec<&'static str>,
}

/// Plans offered on the settings screen. The free tier is what every new
/// account starts on.
pub fn plan_catalog() -> Vec<Plan> {
    vec![
        Plan {
            id: "free",
            name: "Plan Darmowy",
            price: 0,
            currency: "PLN",
            period: "month",
            features: vec!["Jedna ocena RODO", "Podstawowy raport zgodności"],
        },
        Plan {
            id: "basic",
            name: "Plan Podstawowy",
            price: 99,
            currency: "PLN",
            period: "month",
            features: vec![
                "Dostęp do podstawowych ocen RODO",
                "Maksymalnie 3 oceny",
                "Podstawowe raporty",
                "Wsparcie e-mail",
            ],
        },
        Plan {
            id: "premium",
            name: "Plan Premium",
            price: 299,
            currency: "PLN",
            period: "month",
            features: vec![
                "Dostęp do wszystkich ocen RODO",
                "Nieograniczona liczba ocen",
                "Zaawansowane raporty i analizy",
                "Eksport do różnych formatów",
                "Priorytetowe wsparcie 24/7",
                "Dedykowany opiekun klienta",
            ],
        },
    ]
}

fn known_plan(id: &str) -> bool {
    plan_catalog().iter().any(|plan| plan.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub plan: String,
    pub status: SubscriptionStatus,
    pub next_billing_date: NaiveDate,
    pub payment_method: String,
}

/// Outcome of a plan-change request.
#[derive(Debug, Clone)]
pub struct PlanChange {
    pub changed: bool,
    pub subscription: Subscription,
}

/// Outcome of a cancellation request.
#[derive(Debug, Clone)]
pub struct Cancellation {
    pub already_cancelled: bool,
    pub valid_until: NaiveDate,
}

#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    #[error("unknown plan '{0}'")]
    UnknownPlan(String),
}

/// Process-local subscription records keyed by username.
#[derive(Default)]
pub struct SubscriptionStore {
    records: Mutex<HashMap<String, Subscription>>,
}

impl SubscriptionStore {
    /// Current record for the account, materializing the free default the
    /// first time anyone asks.
    pub fn current(&self, username: &str, today: NaiveDate) -> Subscription {
        let mut guard = self.records.lock().expect("subscription mutex poisoned");
        guard
            .entry(username.to_string())
            .or_insert_with(|| Subscription {
                plan: "free".to_string(),
                status: SubscriptionStatus::Active,
                next_billing_date: today + Duration::days(BILLING_PERIOD_DAYS),
                payment_method: String::new(),
            })
            .clone()
    }

    pub fn change_plan(
        &self,
        username: &str,
        plan: &str,
        today: NaiveDate,
    ) -> Result<PlanChange, SubscriptionError> {
        if !known_plan(plan) {
            return Err(SubscriptionError::UnknownPlan(plan.to_string()));
        }

        let current = self.current(username, today);
        if current.plan == plan && current.status == SubscriptionStatus::Active {
            return Ok(PlanChange {
                changed: false,
                subscription: current,
            });
        }

        let replacement = Subscription {
            plan: plan.to_string(),
            status: SubscriptionStatus::Active,
            next_billing_date: today + Duration::days(BILLING_PERIOD_DAYS),
            payment_method: current.payment_method,
        };
        self.records
            .lock()
            .expect("subscription mutex poisoned")
            .insert(username.to_string(), replacement.clone());

        Ok(PlanChange {
            changed: true,
            subscription: replacement,
        })
    }

    pub fn cancel(&self, username: &str, today: NaiveDate) -> Cancellation {
        let current = self.current(username, today);
        if current.status == SubscriptionStatus::Cancelled {
            return Cancellation {
                already_cancelled: true,
                valid_until: current.next_billing_date,
            };
        }

        let mut cancelled = current;
        cancelled.status = SubscriptionStatus::Cancelled;
        let valid_until = cancelled.next_billing_date;
        self.records
            .lock()
            .expect("subscription mutex poisoned")
            .insert(username.to_string(), cancelled);

        Cancellation {
            already_cancelled: false,
            valid_until,
        }
    }
}

/// State shared by the `/subscriptions` endpoints.
#[derive(Clone)]
pub struct SubscriptionState {
    pub sessions: Arc<SessionStore>,
    pub subscriptions: Arc<SubscriptionStore>,
}

impl FromRef<SubscriptionState> for Arc<SessionStore> {
    fn from_ref(state: &SubscriptionState) -> Self {
        state.sessions.clone()
    }
}

pub fn subscription_router(state: SubscriptionState) -> Router {
    Router::new()
        .route("/subscriptions", get(current_handler))
        .route("/subscriptions/plans", get(plans_handler))
        .route("/subscriptions/plan", put(change_plan_handler))
        .route("/subscriptions/cancel", put(cancel_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlanChangeRequest {
    #[serde(default)]
    plan: String,
}

pub(crate) async fn current_handler(
    State(state): State<SubscriptionState>,
    CurrentUser(user): CurrentUser,
) -> Response {
    let today = Utc::now().date_naive();
    let subscription = state.subscriptions.current(&user.username, today);
    (StatusCode::OK, Json(subscription)).into_response()
}

pub(crate) async fn plans_handler(
    State(_state): State<SubscriptionState>,
    CurrentUser(_user): CurrentUser,
) -> Response {
    (StatusCode::OK, Json(plan_catalog())).into_response()
}

pub(crate) async fn change_plan_handler(
    State(state): State<SubscriptionState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<PlanChangeRequest>,
) -> Response {
    let today = Utc::now().date_naive();
    match state
        .subscriptions
        .change_plan(&user.username, &request.plan, today)
    {
        Ok(change) if change.changed => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": format!("Plan subskrypcji został zmieniony na {}", change.subscription.plan),
                "plan": change.subscription.plan,
                "nextBillingDate": change.subscription.next_billing_date,
            })),
        )
            .into_response(),
        Ok(change) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Plan subskrypcji nie został zmieniony (wybrany ten sam plan)",
                "plan": change.subscription.plan,
                "nextBillingDate": change.subscription.next_billing_date,
            })),
        )
            .into_response(),
        Err(SubscriptionError::UnknownPlan(plan)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Nieznany plan subskrypcji: {plan}") })),
        )
            .into_response(),
    }
}

pub(crate) async fn cancel_handler(
    State(state): State<SubscriptionState>,
    CurrentUser(user): CurrentUser,
) -> Response {
    let today = Utc::now().date_naive();
    let outcome = state.subscriptions.cancel(&user.username, today);
    let message = if outcome.already_cancelled {
        "Subskrypcja jest już anulowana"
    } else {
        "Subskrypcja została anulowana"
    };

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": message,
            "validUntil": outcome.valid_until,
        })),
    )
        .into_response()
}
