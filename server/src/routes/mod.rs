use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{apply_security_headers, create_cors_layer};
use crate::handlers::{create_event, get_event, get_keyword, get_place, health_check, list_events};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/v1/event/", get(list_events).post(create_event))
        .route("/v1/event/:id/", get(get_event))
        .route("/v1/place/:id/", get(get_place))
        .route("/v1/keyword/:id/", get(get_keyword))
        .with_state(state);

    apply_security_headers(router, config.production).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(&config.allowed_origins)),
    )
}
