//! Event creation: authorization first, then validation, then the write.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::auth::{Authorization, CallerContext, Identity};
use crate::models::{Actor, Event};
use crate::state::AppState;
use crate::store::EventStore;
use crate::utils::error::AppError;
use crate::validation::{decode_body, resolve_references, validate_event, EventInput, Language};

/// Accepts or rejects a create request.
///
/// Authorization short-circuits before the body is even decoded. Field
/// validation then reports every problem it finds in one response. Nothing
/// is written unless all checks pass.
pub async fn submit_event(
    state: &AppState,
    identity: &Identity,
    body: &[u8],
    language: Language,
) -> Result<Event, AppError> {
    let context = match identity.authorize_create(&state.config.system_data_source_id) {
        Authorization::Authorized(context) => context,
        Authorization::Unauthenticated => {
            return Err(AppError::AuthError(
                "Authentication credentials were not provided".to_string(),
            ))
        }
        Authorization::Forbidden => return Err(AppError::Forbidden(forbidden_reason(identity))),
    };

    let now = state.clock.now();
    let payload = decode_body(body).map_err(|errors| AppError::validation(errors, language))?;
    let input =
        validate_event(&payload, now, &state.config.public_url).map_err(|errors| AppError::validation(errors, language))?;

    let unresolved = resolve_references(state.store.as_ref(), &input).await?;
    if !unresolved.is_empty() {
        return Err(AppError::validation(unresolved, language));
    }

    if let Actor::User(_) = context.actor {
        ensure_system_data_source(state, &context.data_source_id).await?;
    }

    let event = build_event(input, &context, now);
    state.store.insert_event(&event).await?;

    info!(
        event_id = %event.id,
        publisher = %event.publisher_id,
        data_source = %event.data_source_id,
        status = event.publication_status.as_str(),
        "Event created"
    );
    Ok(event)
}

/// Events created by users are filed under the system data source, which
/// startup is expected to have created.
async fn ensure_system_data_source(state: &AppState, id: &str) -> Result<(), AppError> {
    match state.store.data_source(id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::InternalServerError(format!(
            "System data source '{}' does not exist",
            id
        ))),
    }
}

fn forbidden_reason(identity: &Identity) -> String {
    match identity {
        Identity::ApiKey { data_source, .. } => format!(
            "Data source '{}' has no owning organization",
            data_source.id
        ),
        _ => "Only organization admins may create events".to_string(),
    }
}

/// Combines validated input with the server-derived fields.
pub fn build_event(input: EventInput, context: &CallerContext, now: DateTime<Utc>) -> Event {
    Event {
        id: format!("{}:{}", context.data_source_id, Uuid::new_v4().simple()),
        name: input.name.unwrap_or_default(),
        short_description: input.short_description,
        description: input.description,
        info_url: input.info_url,
        start_time: input.start_time,
        end_time: input.end_time,
        location_id: input.location,
        keyword_ids: input.keywords,
        audience_ids: input.audience,
        publication_status: input.publication_status,
        data_source_id: context.data_source_id.clone(),
        publisher_id: context.publisher.id.clone(),
        created_by: context.actor.clone(),
        last_modified_by: context.actor.clone(),
        created_time: now,
        last_modified_time: now,
    }
}
