//! Wires the stores, services, and routers into the running HTTP service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tracing::info;

use crate::account::{account_router, AccountState, AccountStore};
use crate::assessment::{
    assessment_router, AssessmentService, AssessmentState, InMemoryAssessmentRepository,
};
use crate::auth::{auth_router, SessionStore};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::remedial::RemedialCatalog;
use crate::reports::{reports_router, ReportService, ReportsState};
use crate::subscription::{subscription_router, SubscriptionState, SubscriptionStore};
use crate::telemetry;

/// CLI overrides applied on top of the environment configuration.
#[derive(Debug, Default)]
pub struct ServeOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Clone)]
pub(crate) struct OpsState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Every store and service backing the REST surface.
pub struct Services {
    pub sessions: Arc<SessionStore>,
    pub assessments: Arc<AssessmentService<InMemoryAssessmentRepository>>,
    pub reports: Arc<ReportService<InMemoryAssessmentRepository>>,
    pub accounts: Arc<AccountStore>,
    pub subscriptions: Arc<SubscriptionStore>,
}

impl Services {
    pub fn in_memory(session_seed: &str) -> Self {
        let sessions = Arc::new(SessionStore::new(session_seed));
        let repository = Arc::new(InMemoryAssessmentRepository::default());
        let assessments = Arc::new(AssessmentService::new(repository));
        let remedial = Arc::new(RemedialCatalog::seeded());
        let reports = Arc::new(ReportService::new(assessments.clone(), remedial));

        Self {
            sessions,
            assessments,
            reports,
            accounts: Arc::new(AccountStore::default()),
            subscriptions: Arc::new(SubscriptionStore::default()),
        }
    }

    /// The full REST surface, without the operational endpoints.
    pub fn api_router(&self) -> Router {
        auth_router(self.sessions.clone())
            .merge(assessment_router(AssessmentState {
                sessions: self.sessions.clone(),
                service: self.assessments.clone(),
            }))
            .merge(reports_router(ReportsState {
                sessions: self.sessions.clone(),
                service: self.reports.clone(),
            }))
            .merge(account_router(AccountState {
                sessions: self.sessions.clone(),
                accounts: self.accounts.clone(),
            }))
            .merge(subscription_router(SubscriptionState {
                sessions: self.sessions.clone(),
                subscriptions: self.subscriptions.clone(),
            }))
    }
}

pub async fn run(overrides: ServeOverrides) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = overrides.host {
        config.server.host = host;
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let ops_state = OpsState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let services = Services::in_memory(&config.session.seed);
    let app = services
        .api_router()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(ops_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "rodo assessment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<OpsState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<OpsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
