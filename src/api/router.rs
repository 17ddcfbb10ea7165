use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::auth::require_admin_token;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Public routes, no authentication required
    let public = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::health::render_metrics))
        // User accounts
        .route("/api/auth/signup", post(handlers::users::signup))
        .route("/api/auth/login", post(handlers::users::login))
        .route("/api/users/:user_id", get(handlers::users::detail))
        // Scoring and loan applications
        .route("/api/predict", post(handlers::loans::predict))
        .route("/api/loan/apply", post(handlers::loans::apply))
        .route("/api/loan/applications/:user_id", get(handlers::loans::list_for_user))
        .route("/api/credit/improvement/:user_id", get(handlers::loans::improvement))
        // Admin accounts
        .route("/api/admin/signup", post(handlers::admin::signup))
        .route("/api/admin/login", post(handlers::admin::login));

    // Admin routes, Bearer token required when API_TOKEN is set
    let admin = Router::new()
        .route("/api/admin/dashboard/stats", get(handlers::admin::dashboard_stats))
        .route("/api/admin/analytics/insights", get(handlers::analytics::insights))
        // Review workflow
        .route("/api/admin/applications", get(handlers::admin::list_applications))
        .route("/api/admin/applications/pending", get(handlers::admin::pending))
        .route("/api/admin/applications/history", get(handlers::admin::history))
        .route(
            "/api/admin/applications/:id",
            put(handlers::admin::update_application).delete(handlers::admin::delete_application),
        )
        .route("/api/admin/applications/:id/approve", post(handlers::admin::approve))
        .route("/api/admin/applications/:id/reject", post(handlers::admin::reject))
        // User management
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route(
            "/api/admin/users/:id",
            put(handlers::admin::update_user).delete(handlers::admin::delete_user),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_admin_token));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(admin)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
