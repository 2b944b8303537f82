//! API Router configuration

use super::handlers;
use super::state::AppState;
use crate::config::ServerConfig;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let api_routes = Router::new()
        // Health and status
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::daemon_status))
        // Dashboard
        .route("/meta", get(handlers::meta))
        .route("/kpis", get(handlers::kpis))
        .route("/trends", get(handlers::trends))
        .route("/map", get(handlers::map))
        .route("/schemes", get(handlers::list_schemes))
        .route("/schemes/:id/kpis", get(handlers::scheme_kpis))
        // Reports and exports
        .route("/reports", post(handlers::create_report))
        .route("/reports/:id", get(handlers::get_report))
        .route("/exports/data.csv", get(handlers::export_data_csv))
        // Search and compare
        .route("/search", get(handlers::search_initiatives))
        .route("/compare/trends", get(handlers::compare_trends))
        // Persisted records
        .route("/db", get(handlers::db_index))
        .route("/db/", get(handlers::db_index))
        .route("/db/states", get(handlers::list_state_records))
        .route("/db/states/", get(handlers::list_state_records))
        .route("/db/states/:id", get(handlers::get_state_record))
        .route("/db/schemes", get(handlers::list_scheme_records))
        .route("/db/schemes/", get(handlers::list_scheme_records))
        .route("/db/schemes/:id", get(handlers::get_scheme_record))
        .route("/db/initiatives", get(handlers::list_initiative_records))
        .route("/db/initiatives/", get(handlers::list_initiative_records))
        .route("/db/initiatives/:id", get(handlers::get_initiative_record));

    let page_routes = Router::new()
        .route("/", get(handlers::overview))
        .route("/dashboard", get(handlers::overview))
        .route("/states", get(handlers::states_page))
        .route("/states/:slug", get(handlers::state_page))
        .route("/schemes", get(handlers::schemes_page))
        .route("/schemes/:slug", get(handlers::scheme_page))
        .route("/compare", get(handlers::compare_page))
        .route("/reports", get(handlers::reports_page))
        .route("/reports/:id", get(handlers::report_page))
        // Legacy endpoints
        .route("/api/data/", get(handlers::dashboard_data))
        .route("/api/map/", get(handlers::map_data))
        .route("/reports/download/", get(handlers::download_report));

    let mut router = page_routes
        .nest("/api/v1", api_routes)
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router.with_state(state)
}
