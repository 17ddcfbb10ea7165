use std::sync::Arc;

use credit_risk::api::router::create_router;
use credit_risk::config::AppConfig;
use credit_risk::scoring::ScoringContext;
use credit_risk::services::sample_data::run_sample_seeder;
use credit_risk::{db, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Connecting to database...");
    let db = db::init_pool(&config.database_url, config.db_max_connections).await?;
    db::run_migrations(&db).await?;
    tracing::info!("Database connected");

    let metrics_handle = metrics::init_metrics()?;

    // --- Scoring: optional pre-trained model, heuristic otherwise ---
    let scoring = Arc::new(ScoringContext::load(&config.model_path));
    tracing::info!(model = scoring.has_model(), "Credit scoring ready");

    if config.seed_sample_data {
        if let Err(e) = run_sample_seeder(&db, &scoring).await {
            tracing::error!(error = %e, "Sample data seeding failed");
        }
    }

    if !config.admin_auth_enabled() {
        tracing::warn!("API_TOKEN is not set, admin routes are unauthenticated");
    }

    let state = AppState {
        db,
        config,
        scoring,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();
}
