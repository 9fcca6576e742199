use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

fn omdb_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(handlers::search))
        .route("/movies", get(handlers::search_movies))
        .route("/series", get(handlers::search_series))
        .route("/details/{imdb_id}", get(handlers::details))
        .route("/import", post(handlers::import))
        .route("/import/bulk", post(handlers::bulk_import))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/omdb", omdb_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
