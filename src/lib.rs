pub mod api;
pub mod config;
pub mod credentials;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod scoring;
pub mod services;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::scoring::ScoringContext;

/// Shared handler state. Cloned per request; everything inside is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub scoring: Arc<ScoringContext>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
