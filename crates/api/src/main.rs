use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use canslim_core::domain::report::ChecklistReport;
use canslim_core::domain::snapshot::StockSnapshot;
use canslim_core::ingest::provider::{validate_ticker, HttpJsonSnapshotProvider, SnapshotProvider};
use canslim_core::{ChecklistError, ChecklistOptions};

const DEFAULT_PORT: u16 = 5020;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = canslim_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let options = ChecklistOptions::from_env()?;

    let provider: Option<Arc<dyn SnapshotProvider>> =
        match HttpJsonSnapshotProvider::from_settings(&settings) {
            Ok(p) => Some(Arc::new(p)),
            Err(e) => {
                sentry_anyhow::capture_anyhow(&e);
                tracing::error!(error = %e, "data provider unavailable; /api/check-stock disabled");
                None
            }
        };

    let state = AppState {
        provider,
        options: Arc::new(options),
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, profile = state.options.composite_profile.name(), "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/check-stock", get(check_stock))
        .route("/api/checklist", post(evaluate_snapshot))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    provider: Option<Arc<dyn SnapshotProvider>>,
    options: Arc<ChecklistOptions>,
}

#[derive(Debug, Deserialize)]
struct CheckStockParams {
    symbol: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckListResponse {
    check_list: ChecklistReport,
}

async fn check_stock(
    State(state): State<AppState>,
    Query(params): Query<CheckStockParams>,
) -> Result<Json<CheckListResponse>, StatusCode> {
    let symbol = params.symbol.unwrap_or_default();
    let ticker = validate_ticker(&symbol).map_err(|e| {
        tracing::debug!(error = %e, "rejected symbol");
        StatusCode::BAD_REQUEST
    })?;

    let Some(provider) = &state.provider else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let snapshot = provider.fetch_snapshot(ticker).await.map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(%ticker, error = %e, "snapshot acquisition failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    respond(&snapshot, &state.options)
}

async fn evaluate_snapshot(
    State(state): State<AppState>,
    Json(snapshot): Json<StockSnapshot>,
) -> Result<Json<CheckListResponse>, StatusCode> {
    respond(&snapshot, &state.options)
}

fn respond(
    snapshot: &StockSnapshot,
    options: &ChecklistOptions,
) -> Result<Json<CheckListResponse>, StatusCode> {
    match canslim_core::evaluate(snapshot, options) {
        Ok(report) => Ok(Json(CheckListResponse { check_list: report })),
        Err(ChecklistError::MissingTicker) => Err(StatusCode::BAD_REQUEST),
        Err(e) => {
            tracing::error!(error = %e, "checklist evaluation failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &canslim_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
