#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

use linkedevents_server::clock::FixedClock;
use linkedevents_server::models::{DataSource, Keyword, LocalizedText, Organization, Place, User};
use linkedevents_server::routes::create_routes;
use linkedevents_server::store::MemoryStore;
use linkedevents_server::{AppState, Config};

pub const BASE: &str = "http://localhost:3001";
pub const LIST_URL: &str = "/v1/event/";

pub const ORGANIZATION: &str = "test_organization";
pub const ORGANIZATION2: &str = "test_organization2";
pub const DATA_SOURCE: &str = "test_source";
pub const OTHER_DATA_SOURCE: &str = "test_source2";
pub const API_KEY: &str = "test_api_key";
pub const OTHER_API_KEY: &str = "other_api_key";
pub const PLACE: &str = "test location";
pub const KEYWORD: &str = "test:keyword";
pub const AUDIENCE: &str = "test:audience";

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub user: User,
    pub user2: User,
    pub now: DateTime<Utc>,
}

/// Who a request is sent as.
#[derive(Clone, Copy)]
pub enum As<'a> {
    Anonymous,
    User(&'a User),
    ApiKey(&'a str),
    /// A raw `Authorization` header value.
    Authorization(&'a str),
}

fn text(fi: &str) -> LocalizedText {
    LocalizedText::from([("fi".to_string(), fi.to_string())])
}

pub async fn setup() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let user = User::new("test_user", "test-user-token");
    let user2 = User::new("test_user2", "test-user2-token");

    store.put_organization(Organization::new(ORGANIZATION, "Test organization")).await;
    store.put_organization(Organization::new(ORGANIZATION2, "Test organization 2")).await;
    store.put_user(user.clone()).await;
    store.put_user(user2.clone()).await;
    store.add_admin(ORGANIZATION, user.id).await;
    store.add_admin(ORGANIZATION2, user2.id).await;

    store.put_data_source(DataSource::new("system", "System")).await;
    store
        .put_data_source(DataSource::new(DATA_SOURCE, "Test source").with_api_key(API_KEY))
        .await;
    store
        .put_data_source(
            DataSource::new(OTHER_DATA_SOURCE, "Other test source")
                .with_api_key(OTHER_API_KEY)
                .owned_by(ORGANIZATION2),
        )
        .await;

    let mut place = Place::new(PLACE, DATA_SOURCE);
    place.name = text("Testipaikka");
    store.put_place(place).await;
    for id in [KEYWORD, AUDIENCE] {
        let mut keyword = Keyword::new(id, DATA_SOURCE);
        keyword.name = text("Testiavainsana");
        store.put_keyword(keyword).await;
    }

    let now = Utc::now();
    let state = AppState::new(store.clone(), Config::default())
        .with_clock(Arc::new(FixedClock(now)));

    TestApp {
        app: create_routes(state),
        store,
        user,
        user2,
        now,
    }
}

impl TestApp {
    pub fn minimal_event(&self) -> Value {
        json!({
            "name": {"fi": "minimal_event"},
            "start_time": (self.now + Duration::days(1)).to_rfc3339(),
            "location": {"@id": "/v1/place/test%20location/"},
            "keywords": [{"@id": "/v1/keyword/test:keyword/"}],
        })
    }

    pub fn complex_event(&self) -> Value {
        json!({
            "name": {"fi": "complex_event", "en": "complex event", "sv": "komplext evenemang"},
            "short_description": {"fi": "lyhyt kuvaus", "en": "short description"},
            "description": {"fi": "pitkä kuvaus", "en": "long description"},
            "info_url": {"fi": "https://example.fi/tapahtuma", "en": "https://example.org/event"},
            "start_time": (self.now + Duration::days(3)).to_rfc3339(),
            "end_time": (self.now + Duration::days(4)).to_rfc3339(),
            "location": {"@id": "/v1/place/test%20location/"},
            "keywords": [{"@id": "/v1/keyword/test:keyword/"}],
            "audience": [{"@id": "/v1/keyword/test:audience/"}],
            "publication_status": "public",
        })
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        who: As<'_>,
        body: Option<&Value>,
        language: Option<&str>,
    ) -> (StatusCode, Value) {
        let uri = match who {
            As::ApiKey(key) => format!("{}?api_key={}", uri, key),
            _ => uri.to_string(),
        };
        let mut builder = Request::builder().method(method).uri(uri);
        if let As::User(user) = who {
            builder = builder.header("authorization", format!("Bearer {}", user.token));
        }
        if let As::Authorization(value) = who {
            builder = builder.header("authorization", value);
        }
        if let Some(language) = language {
            builder = builder.header("accept-language", language);
        }
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(value).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn post(&self, who: As<'_>, body: &Value) -> (StatusCode, Value) {
        self.request("POST", LIST_URL, who, Some(body), None).await
    }

    pub async fn get(&self, url: &str, who: As<'_>) -> (StatusCode, Value) {
        let path = url.strip_prefix(BASE).unwrap_or(url);
        self.request("GET", path, who, None, None).await
    }

    /// Posts, expects 201, then reads the event back through its `@id`.
    pub async fn create_with_post(&self, who: As<'_>, body: &Value) -> Value {
        let (status, created) = self.post(who, body).await;
        assert_eq!(status, StatusCode::CREATED, "{}", created);

        let url = created["data"]["@id"].as_str().unwrap().to_string();
        let (status, fetched) = self.get(&url, who).await;
        assert_eq!(status, StatusCode::OK, "{}", fetched);
        fetched["data"].clone()
    }
}

/// Every submitted field must come back with the same meaning.
pub fn assert_event_data_is_equal(submitted: &Value, returned: &Value) {
    let submitted = submitted.as_object().unwrap();
    for (field, value) in submitted {
        let actual = &returned[field];
        match field.as_str() {
            "location" => assert_eq!(
                actual["@id"].as_str().unwrap(),
                format!("{}{}", BASE, value["@id"].as_str().unwrap())
            ),
            "keywords" | "audience" => {
                let expected: Vec<String> = value
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|k| format!("{}{}", BASE, k["@id"].as_str().unwrap()))
                    .collect();
                let actual: Vec<String> = actual
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|k| k["@id"].as_str().unwrap().to_string())
                    .collect();
                assert_eq!(actual, expected);
            }
            "start_time" | "end_time" => {
                let parse = |v: &Value| {
                    DateTime::parse_from_rfc3339(v.as_str().unwrap())
                        .unwrap()
                        .with_timezone(&Utc)
                };
                assert_eq!(parse(actual), parse(value), "{}", field);
            }
            _ => assert_eq!(actual, value, "{}", field),
        }
    }
}
