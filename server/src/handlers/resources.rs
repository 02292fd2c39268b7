use axum::extract::{Path, State};
use axum::response::Response;

use crate::jsonld::{KeywordDocument, PlaceDocument};
use crate::state::AppState;
use crate::store::EventStore;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn get_place(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let place = state
        .store
        .place(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Place '{}' was not found", id)))?;

    Ok(success(
        PlaceDocument::new(&place, &state.config.public_url),
        "Place retrieved",
    ))
}

pub async fn get_keyword(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let keyword = state
        .store
        .keyword(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Keyword '{}' was not found", id)))?;

    Ok(success(
        KeywordDocument::new(&keyword, &state.config.public_url),
        "Keyword retrieved",
    ))
}
