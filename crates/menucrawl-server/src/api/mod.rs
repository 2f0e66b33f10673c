mod restaurants;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use menucrawl_core::DataSource;
use menucrawl_scraper::{ChromeLauncher, MenuPipeline};
use serde::Serialize;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<MenuPipeline<ChromeLauncher>>,
    pub data_source: DataSource,
    /// Held for the length of a browser run so runs never overlap.
    pub run_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(pipeline: MenuPipeline<ChromeLauncher>, data_source: DataSource) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            data_source,
            run_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    data_source: DataSource,
    checked_at: DateTime<Utc>,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/restaurants", get(restaurants::search_restaurants))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthData> {
    Json(HealthData {
        status: "ok",
        data_source: state.data_source,
        checked_at: Utc::now(),
    })
}
