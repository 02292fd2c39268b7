use axum::response::Response;
use serde::Serialize;

use crate::utils::response::success;

pub mod events;
pub mod resources;

pub use events::{create_event, get_event, list_events};
pub use resources::{get_keyword, get_place};

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "linkedevents-api",
    };

    success(payload, "Health check successful")
}
