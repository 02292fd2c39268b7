//! Caller identification and create permission.
//!
//! A request carries at most one credential: an `api_key` query parameter
//! (checked first, even when empty) or an `Authorization: Bearer` session
//! token. Credentials that are present but do not resolve are rejected
//! outright; a request without any is anonymous.

use std::collections::HashMap;

use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::models::{Actor, DataSource, Event, Organization, User};
use crate::state::AppState;
use crate::store::EventStore;
use crate::utils::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    None,
    ApiKey(String),
    Bearer(String),
    /// An `Authorization` header with a scheme other than `Bearer`.
    Unsupported,
}

impl Credential {
    pub fn from_parts(parts: &Parts) -> Self {
        let api_key = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(mut params)| params.remove("api_key"));
        if let Some(key) = api_key {
            return Credential::ApiKey(key);
        }

        match parts.headers.get(AUTHORIZATION) {
            None => Credential::None,
            Some(value) => match value.to_str().ok().and_then(|v| v.trim().split_once(' ')) {
                Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
                    Credential::Bearer(token.trim().to_string())
                }
                _ => Credential::Unsupported,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    Anonymous,
    User {
        user: User,
        /// Organizations the user administers, ordered by id.
        organizations: Vec<Organization>,
    },
    ApiKey {
        data_source: DataSource,
        owner: Option<Organization>,
    },
}

/// Everything a creation needs to know about who is creating.
#[derive(Debug, Clone, PartialEq)]
pub struct CallerContext {
    pub actor: Actor,
    pub data_source_id: String,
    pub publisher: Organization,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Authorization {
    Authorized(CallerContext),
    Unauthenticated,
    Forbidden,
}

pub async fn identify(store: &dyn EventStore, credential: &Credential) -> Result<Identity, AppError> {
    match credential {
        Credential::None => Ok(Identity::Anonymous),
        Credential::Unsupported => Err(AppError::AuthError(
            "Unsupported authorization scheme".to_string(),
        )),
        Credential::ApiKey(key) if key.trim().is_empty() => {
            Err(AppError::AuthError("API key is empty".to_string()))
        }
        Credential::ApiKey(key) => {
            let data_source = store
                .data_source_by_api_key(key)
                .await?
                .ok_or_else(|| AppError::AuthError("Unknown API key".to_string()))?;
            let owner = match &data_source.owner_id {
                Some(owner_id) => store.organization(owner_id).await?,
                None => None,
            };
            Ok(Identity::ApiKey { data_source, owner })
        }
        Credential::Bearer(token) if token.is_empty() => {
            Err(AppError::AuthError("Session token is empty".to_string()))
        }
        Credential::Bearer(token) => {
            let user = store
                .user_by_token(token)
                .await?
                .ok_or_else(|| AppError::AuthError("Invalid session token".to_string()))?;
            let organizations = store.admin_organizations(user.id).await?;
            Ok(Identity::User { user, organizations })
        }
    }
}

impl Identity {
    /// Decides whether this caller may create events and on whose behalf.
    /// Users publish for the first organization they administer under the
    /// system data source; API keys publish for the owner of their data
    /// source.
    pub fn authorize_create(&self, system_data_source_id: &str) -> Authorization {
        match self {
            Identity::Anonymous => Authorization::Unauthenticated,
            Identity::User { user, organizations } => match organizations.first() {
                Some(organization) => Authorization::Authorized(CallerContext {
                    actor: Actor::User(user.id),
                    data_source_id: system_data_source_id.to_string(),
                    publisher: organization.clone(),
                }),
                None => Authorization::Forbidden,
            },
            Identity::ApiKey { data_source, owner } => match owner {
                Some(organization) => Authorization::Authorized(CallerContext {
                    actor: Actor::DataSource(data_source.id.clone()),
                    data_source_id: data_source.id.clone(),
                    publisher: organization.clone(),
                }),
                None => Authorization::Forbidden,
            },
        }
    }

    pub fn administers(&self, organization_id: &str) -> bool {
        match self {
            Identity::Anonymous => false,
            Identity::User { organizations, .. } => {
                organizations.iter().any(|o| o.id == organization_id)
            }
            Identity::ApiKey { owner, .. } => owner.as_ref().is_some_and(|o| o.id == organization_id),
        }
    }

    /// Organizations whose drafts this caller may see.
    pub fn draft_publishers(&self) -> Vec<String> {
        match self {
            Identity::Anonymous => Vec::new(),
            Identity::User { organizations, .. } => {
                organizations.iter().map(|o| o.id.clone()).collect()
            }
            Identity::ApiKey { owner, .. } => owner.iter().map(|o| o.id.clone()).collect(),
        }
    }

    /// Drafts are only visible to the publishing organization.
    pub fn can_view(&self, event: &Event) -> bool {
        !event.is_draft() || self.administers(&event.publisher_id)
    }
}

/// Extractor resolving the request credential into an [`Identity`].
pub struct Caller(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let credential = Credential::from_parts(parts);
        identify(state.store.as_ref(), &credential).await.map(Caller)
    }
}
