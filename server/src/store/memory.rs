use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EventPage, EventQuery, EventStore, StoreError, StoreResult};
use crate::models::{DataSource, Event, Keyword, Organization, Place, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    organizations: BTreeMap<String, Organization>,
    /// (organization id, user id)
    admins: BTreeSet<(String, Uuid)>,
    data_sources: HashMap<String, DataSource>,
    places: HashMap<String, Place>,
    keywords: HashMap<String, Keyword>,
    events: HashMap<String, Event>,
}

/// In-process store. Every method takes the lock once, so each call sees a
/// consistent snapshot.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_user(&self, user: User) {
        self.tables.write().await.users.insert(user.id, user);
    }

    pub async fn put_organization(&self, organization: Organization) {
        self.tables
            .write()
            .await
            .organizations
            .insert(organization.id.clone(), organization);
    }

    pub async fn add_admin(&self, organization_id: &str, user_id: Uuid) {
        self.tables
            .write()
            .await
            .admins
            .insert((organization_id.to_string(), user_id));
    }

    pub async fn remove_admin(&self, organization_id: &str, user_id: Uuid) {
        self.tables
            .write()
            .await
            .admins
            .remove(&(organization_id.to_string(), user_id));
    }

    pub async fn put_data_source(&self, data_source: DataSource) {
        self.tables
            .write()
            .await
            .data_sources
            .insert(data_source.id.clone(), data_source);
    }

    pub async fn put_place(&self, place: Place) {
        self.tables.write().await.places.insert(place.id.clone(), place);
    }

    pub async fn put_keyword(&self, keyword: Keyword) {
        self.tables
            .write()
            .await
            .keywords
            .insert(keyword.id.clone(), keyword);
    }

    pub async fn event_count(&self) -> usize {
        self.tables.read().await.events.len()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn user_by_token(&self, token: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.token == token).cloned())
    }

    async fn admin_organizations(&self, user_id: Uuid) -> StoreResult<Vec<Organization>> {
        let tables = self.tables.read().await;
        Ok(tables
            .admins
            .iter()
            .filter(|(_, admin)| *admin == user_id)
            .filter_map(|(org_id, _)| tables.organizations.get(org_id).cloned())
            .collect())
    }

    async fn organization(&self, id: &str) -> StoreResult<Option<Organization>> {
        Ok(self.tables.read().await.organizations.get(id).cloned())
    }

    async fn data_source(&self, id: &str) -> StoreResult<Option<DataSource>> {
        Ok(self.tables.read().await.data_sources.get(id).cloned())
    }

    async fn data_source_by_api_key(&self, api_key: &str) -> StoreResult<Option<DataSource>> {
        let tables = self.tables.read().await;
        Ok(tables
            .data_sources
            .values()
            .find(|ds| ds.api_key.as_deref() == Some(api_key))
            .cloned())
    }

    async fn place(&self, id: &str) -> StoreResult<Option<Place>> {
        Ok(self.tables.read().await.places.get(id).cloned())
    }

    async fn keyword(&self, id: &str) -> StoreResult<Option<Keyword>> {
        Ok(self.tables.read().await.keywords.get(id).cloned())
    }

    async fn insert_event(&self, event: &Event) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.events.contains_key(&event.id) {
            return Err(StoreError::Duplicate(event.id.clone()));
        }
        tables.events.insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn event(&self, id: &str) -> StoreResult<Option<Event>> {
        Ok(self.tables.read().await.events.get(id).cloned())
    }

    async fn list_events(&self, query: &EventQuery) -> StoreResult<EventPage> {
        let tables = self.tables.read().await;
        let mut events: Vec<&Event> = tables.events.values().filter(|e| query.includes(e)).collect();
        events.sort_by(|a, b| {
            a.created_time
                .cmp(&b.created_time)
                .then_with(|| a.id.cmp(&b.id))
        });

        let count = events.len() as u64;
        let events = events
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();
        Ok(EventPage { events, count })
    }
}
