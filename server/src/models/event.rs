use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use super::{Actor, LocalizedText};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Draft,
    #[default]
    Public,
}

impl PublicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationStatus::Draft => "draft",
            PublicationStatus::Public => "public",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(PublicationStatus::Draft),
            "public" => Some(PublicationStatus::Public),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: LocalizedText,
    pub short_description: LocalizedText,
    pub description: LocalizedText,
    pub info_url: LocalizedText,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub location_id: Option<String>,
    pub keyword_ids: Vec<String>,
    pub audience_ids: Vec<String>,
    pub publication_status: PublicationStatus,
    pub data_source_id: String,
    pub publisher_id: String,
    pub created_by: Actor,
    pub last_modified_by: Actor,
    pub created_time: DateTime<Utc>,
    pub last_modified_time: DateTime<Utc>,
}

impl Event {
    pub fn is_draft(&self) -> bool {
        self.publication_status == PublicationStatus::Draft
    }
}

/// Column layout of the `events` table.
#[derive(Debug, FromRow)]
pub struct EventRow {
    pub id: String,
    pub name: Json<LocalizedText>,
    pub short_description: Json<LocalizedText>,
    pub description: Json<LocalizedText>,
    pub info_url: Json<LocalizedText>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub location_id: Option<String>,
    pub keyword_ids: Vec<String>,
    pub audience_ids: Vec<String>,
    pub publication_status: String,
    pub data_source_id: String,
    pub publisher_id: String,
    pub created_by: String,
    pub last_modified_by: String,
    pub created_time: DateTime<Utc>,
    pub last_modified_time: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = String;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let publication_status = PublicationStatus::parse(&row.publication_status).ok_or_else(
            || format!("event {} has unknown status '{}'", row.id, row.publication_status),
        )?;
        let created_by = row.created_by.parse().map_err(|e| format!("{}", e))?;
        let last_modified_by = row.last_modified_by.parse().map_err(|e| format!("{}", e))?;

        Ok(Event {
            id: row.id,
            name: row.name.0,
            short_description: row.short_description.0,
            description: row.description.0,
            info_url: row.info_url.0,
            start_time: row.start_time,
            end_time: row.end_time,
            location_id: row.location_id,
            keyword_ids: row.keyword_ids,
            audience_ids: row.audience_ids,
            publication_status,
            data_source_id: row.data_source_id,
            publisher_id: row.publisher_id,
            created_by,
            last_modified_by,
            created_time: row.created_time,
            last_modified_time: row.last_modified_time,
        })
    }
}
