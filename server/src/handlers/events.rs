use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::Response;

use crate::auth::Caller;
use crate::jsonld::{EventDocument, API_VERSION};
use crate::state::AppState;
use crate::store::{EventQuery, EventStore};
use crate::submission::submit_event;
use crate::utils::error::AppError;
use crate::utils::pagination::{Paginated, Pagination};
use crate::utils::response::{created, success};
use crate::validation::Language;

pub async fn create_event(
    State(state): State<AppState>,
    Caller(identity): Caller,
    language: Language,
    body: Bytes,
) -> Result<Response, AppError> {
    let event = submit_event(&state, &identity, &body, language).await?;
    let document = EventDocument::new(&event, &state.config.public_url);
    Ok(created(document, "Event created"))
}

/// Drafts the caller may not see are answered exactly like missing events.
pub async fn get_event(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let event = state
        .store
        .event(&id)
        .await?
        .filter(|event| identity.can_view(event))
        .ok_or_else(|| AppError::NotFound("No event matches the given query".to_string()))?;

    let document = EventDocument::new(&event, &state.config.public_url);
    Ok(success(document, "Event retrieved"))
}

pub async fn list_events(
    State(state): State<AppState>,
    Caller(identity): Caller,
    language: Language,
    uri: Uri,
) -> Result<Response, AppError> {
    let params = Query::<HashMap<String, String>>::try_from_uri(&uri)
        .map(|Query(params)| params)
        .unwrap_or_default();
    let pagination =
        Pagination::from_params(&params).map_err(|errors| AppError::validation(errors, language))?;

    let query = EventQuery {
        draft_publishers: identity.draft_publishers(),
        offset: pagination.offset(),
        limit: pagination.page_size,
    };
    let page = state.store.list_events(&query).await?;

    let base_url = &state.config.public_url;
    let list_url = format!("{}/{}/event/", base_url, API_VERSION);
    let body = Paginated {
        meta: pagination.meta(page.count, &list_url),
        data: page
            .events
            .iter()
            .map(|event| EventDocument::new(event, base_url))
            .collect(),
    };

    let message = format!("{} of {} event(s)", body.data.len(), page.count);
    Ok(success(body, message))
}
