use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::{EventPage, EventQuery, EventStore, StoreError, StoreResult};
use crate::config::Config;
use crate::models::event::EventRow;
use crate::models::{DataSource, Event, Keyword, LocalizedText, Organization, Place, User};

const EVENT_COLUMNS: &str = "id, name, short_description, description, info_url, \
     start_time, end_time, location_id, keyword_ids, audience_ids, publication_status, \
     data_source_id, publisher_id, created_by, last_modified_by, created_time, last_modified_time";

#[derive(FromRow)]
struct PlaceRow {
    id: String,
    data_source_id: String,
    name: Json<LocalizedText>,
    deleted: bool,
}

impl From<PlaceRow> for Place {
    fn from(row: PlaceRow) -> Self {
        Place {
            id: row.id,
            data_source_id: row.data_source_id,
            name: row.name.0,
            deleted: row.deleted,
        }
    }
}

#[derive(FromRow)]
struct KeywordRow {
    id: String,
    data_source_id: String,
    name: Json<LocalizedText>,
    deprecated: bool,
}

impl From<KeywordRow> for Keyword {
    fn from(row: KeywordRow) -> Self {
        Keyword {
            id: row.id,
            data_source_id: row.data_source_id,
            name: row.name.0,
            deprecated: row.deprecated,
        }
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }

    /// Creates the data source row if it is missing. Used at startup for the
    /// system data source that user submissions are attributed to.
    pub async fn ensure_data_source(&self, id: &str, name: &str) -> StoreResult<()> {
        sqlx::query("INSERT INTO data_sources (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn into_event(row: EventRow) -> StoreResult<Event> {
    Event::try_from(row).map_err(StoreError::Corrupt)
}

#[async_trait]
impl EventStore for PgStore {
    async fn user_by_token(&self, token: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, token, created_at FROM users WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn admin_organizations(&self, user_id: Uuid) -> StoreResult<Vec<Organization>> {
        let organizations = sqlx::query_as::<_, Organization>(
            "SELECT o.id, o.name, o.created_at FROM organizations o \
             JOIN organization_admins a ON a.organization_id = o.id \
             WHERE a.user_id = $1 ORDER BY o.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(organizations)
    }

    async fn organization(&self, id: &str) -> StoreResult<Option<Organization>> {
        let organization = sqlx::query_as::<_, Organization>(
            "SELECT id, name, created_at FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(organization)
    }

    async fn data_source(&self, id: &str) -> StoreResult<Option<DataSource>> {
        let data_source = sqlx::query_as::<_, DataSource>(
            "SELECT id, name, api_key, owner_id FROM data_sources WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(data_source)
    }

    async fn data_source_by_api_key(&self, api_key: &str) -> StoreResult<Option<DataSource>> {
        let data_source = sqlx::query_as::<_, DataSource>(
            "SELECT id, name, api_key, owner_id FROM data_sources WHERE api_key = $1",
        )
        .bind(api_key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(data_source)
    }

    async fn place(&self, id: &str) -> StoreResult<Option<Place>> {
        let row = sqlx::query_as::<_, PlaceRow>(
            "SELECT id, data_source_id, name, deleted FROM places WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Place::from))
    }

    async fn keyword(&self, id: &str) -> StoreResult<Option<Keyword>> {
        let row = sqlx::query_as::<_, KeywordRow>(
            "SELECT id, data_source_id, name, deprecated FROM keywords WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Keyword::from))
    }

    async fn insert_event(&self, event: &Event) -> StoreResult<()> {
        let sql = format!(
            "INSERT INTO events ({}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
            EVENT_COLUMNS
        );
        let result = sqlx::query(&sql)
            .bind(&event.id)
            .bind(Json(&event.name))
            .bind(Json(&event.short_description))
            .bind(Json(&event.description))
            .bind(Json(&event.info_url))
            .bind(event.start_time)
            .bind(event.end_time)
            .bind(&event.location_id)
            .bind(&event.keyword_ids)
            .bind(&event.audience_ids)
            .bind(event.publication_status.as_str())
            .bind(&event.data_source_id)
            .bind(&event.publisher_id)
            .bind(event.created_by.to_string())
            .bind(event.last_modified_by.to_string())
            .bind(event.created_time)
            .bind(event.last_modified_time)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Duplicate(event.id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn event(&self, id: &str) -> StoreResult<Option<Event>> {
        let sql = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(into_event).transpose()
    }

    async fn list_events(&self, query: &EventQuery) -> StoreResult<EventPage> {
        const VISIBLE: &str = "publication_status = 'public' OR publisher_id = ANY($1)";

        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM events WHERE {}", VISIBLE))
            .bind(&query.draft_publishers)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM events WHERE {} ORDER BY created_time, id LIMIT $2 OFFSET $3",
            EVENT_COLUMNS, VISIBLE
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(&query.draft_publishers)
            .bind(i64::try_from(query.limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(query.offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        let events = rows.into_iter().map(into_event).collect::<StoreResult<Vec<_>>>()?;
        Ok(EventPage {
            events,
            count: count.max(0) as u64,
        })
    }
}
