//! Persistence seam for the event API.
//!
//! Handlers only ever see `dyn EventStore`; `PgStore` backs the running
//! server and `MemoryStore` backs the tests.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{DataSource, Event, Keyword, Organization, Place, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One page of the event list as seen by a particular caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    /// Publishers whose drafts may be included. Other drafts are left out.
    pub draft_publishers: Vec<String>,
    pub offset: u64,
    pub limit: u64,
}

impl EventQuery {
    pub fn includes(&self, event: &Event) -> bool {
        !event.is_draft() || self.draft_publishers.iter().any(|p| *p == event.publisher_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventPage {
    pub events: Vec<Event>,
    /// Matching events across all pages.
    pub count: u64,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn user_by_token(&self, token: &str) -> StoreResult<Option<User>>;

    /// Organizations the user administers, ordered by id.
    async fn admin_organizations(&self, user_id: Uuid) -> StoreResult<Vec<Organization>>;

    async fn organization(&self, id: &str) -> StoreResult<Option<Organization>>;

    async fn data_source(&self, id: &str) -> StoreResult<Option<DataSource>>;

    async fn data_source_by_api_key(&self, api_key: &str) -> StoreResult<Option<DataSource>>;

    async fn place(&self, id: &str) -> StoreResult<Option<Place>>;

    async fn keyword(&self, id: &str) -> StoreResult<Option<Keyword>>;

    async fn insert_event(&self, event: &Event) -> StoreResult<()>;

    async fn event(&self, id: &str) -> StoreResult<Option<Event>>;

    /// Events matching `query`, oldest first.
    async fn list_events(&self, query: &EventQuery) -> StoreResult<EventPage>;
}
