use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An external system submitting events with an API key.
///
/// A data source may only create events once it has an owning
/// organization, which then becomes the publisher of everything it
/// submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DataSource {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub owner_id: Option<String>,
}

impl DataSource {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            api_key: None,
            owner_id: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn owned_by(mut self, organization_id: impl Into<String>) -> Self {
        self.owner_id = Some(organization_id.into());
        self
    }
}
