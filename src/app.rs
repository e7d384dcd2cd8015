use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/options", get(handlers::get_options))
        .route("/api/year", get(handlers::get_year))
        .route("/api/month", get(handlers::get_month))
        .route("/api/countries", get(handlers::get_countries))
        .route("/api/stays", get(handlers::get_stays))
        .with_state(state)
}
