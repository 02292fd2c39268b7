//! JSON-LD references and resource documents.
//!
//! Related resources travel as `{"@id": "<url>"}` objects. The URL may be
//! absolute, in which case it must live under the public base URL, or just
//! the path, `/v1/<kind>/<percent-encoded id>/` (optionally behind the base
//! URL's own path prefix).

use chrono::{DateTime, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use serde_json::Value;

use crate::models::{Event, Keyword, LocalizedText, Place};
use crate::validation::messages::Message;

pub const API_VERSION: &str = "v1";
pub const CONTEXT: &str = "http://schema.org";

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Event,
    Place,
    Keyword,
}

impl ResourceKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            ResourceKind::Event => "event",
            ResourceKind::Place => "place",
            ResourceKind::Keyword => "keyword",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "event" => Some(ResourceKind::Event),
            "place" => Some(ResourceKind::Place),
            "keyword" => Some(ResourceKind::Keyword),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedRef {
    #[serde(rename = "@id")]
    pub id: String,
}

pub fn resource_url(base_url: &str, kind: ResourceKind, id: &str) -> String {
    format!(
        "{}/{}/{}/{}/",
        base_url,
        API_VERSION,
        kind.path_segment(),
        utf8_percent_encode(id, SEGMENT)
    )
}

pub fn link(base_url: &str, kind: ResourceKind, id: &str) -> LinkedRef {
    LinkedRef {
        id: resource_url(base_url, kind, id),
    }
}

/// Extracts the id of a `kind` resource from a reference value, or the
/// message explaining why the value is not a usable reference.
pub fn parse_reference(value: &Value, kind: ResourceKind, base_url: &str) -> Result<String, Message> {
    let object = match value {
        Value::Null => return Err(Message::NotNull),
        Value::Object(object) => object,
        _ => return Err(Message::ExpectedLinkedObject),
    };

    let url = match object.get("@id") {
        None => return Err(Message::MissingLinkedId),
        Some(Value::String(url)) => url.trim(),
        Some(_) => return Err(Message::ExpectedLinkedObject),
    };
    if url.is_empty() {
        return Err(Message::EmptyLinkedId);
    }

    let (found, id) = split_resource_path(url, base_url).ok_or(Message::InvalidHyperlink)?;
    if found != kind {
        return Err(Message::WrongResourceType);
    }
    Ok(id)
}

fn split_resource_path(url: &str, base_url: &str) -> Option<(ResourceKind, String)> {
    let path = if url.contains("://") {
        strip_prefix_ignore_ascii_case(url, base_url)?
    } else {
        url.strip_prefix(base_path(base_url)).unwrap_or(url)
    };
    if !path.starts_with('/') {
        return None;
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let [version, kind, raw_id] = segments.as_slice() else {
        return None;
    };
    if *version != API_VERSION {
        return None;
    }
    let kind = ResourceKind::from_segment(kind)?;
    let id = percent_decode_str(raw_id).decode_utf8().ok()?;
    Some((kind, id.into_owned()))
}

/// The path part of an absolute base URL, without a trailing slash.
fn base_path(base_url: &str) -> &str {
    let path = match base_url.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("", |at| &rest[at..]),
        None => base_url,
    };
    path.trim_end_matches('/')
}

/// `str::strip_prefix` with ASCII case folding.
fn strip_prefix_ignore_ascii_case<'a>(url: &'a str, prefix: &str) -> Option<&'a str> {
    let prefix = prefix.trim_end_matches('/');
    let head = url.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &url[prefix.len()..])
}

fn keyword_links(base_url: &str, ids: &[String]) -> Vec<LinkedRef> {
    ids.iter()
        .map(|id| link(base_url, ResourceKind::Keyword, id))
        .collect()
}

#[derive(Debug, Serialize)]
pub struct EventDocument {
    #[serde(rename = "@id")]
    pub url: String,
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub id: String,
    pub name: LocalizedText,
    pub short_description: LocalizedText,
    pub description: LocalizedText,
    pub info_url: LocalizedText,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub location: Option<LinkedRef>,
    pub keywords: Vec<LinkedRef>,
    pub audience: Vec<LinkedRef>,
    pub publication_status: &'static str,
    pub data_source: String,
    pub publisher: String,
    pub created_time: DateTime<Utc>,
    pub last_modified_time: DateTime<Utc>,
}

impl EventDocument {
    pub fn new(event: &Event, base_url: &str) -> Self {
        Self {
            url: resource_url(base_url, ResourceKind::Event, &event.id),
            context: CONTEXT,
            kind: "Event/LinkedEvent",
            id: event.id.clone(),
            name: event.name.clone(),
            short_description: event.short_description.clone(),
            description: event.description.clone(),
            info_url: event.info_url.clone(),
            start_time: event.start_time,
            end_time: event.end_time,
            location: event
                .location_id
                .as_deref()
                .map(|id| link(base_url, ResourceKind::Place, id)),
            keywords: keyword_links(base_url, &event.keyword_ids),
            audience: keyword_links(base_url, &event.audience_ids),
            publication_status: event.publication_status.as_str(),
            data_source: event.data_source_id.clone(),
            publisher: event.publisher_id.clone(),
            created_time: event.created_time,
            last_modified_time: event.last_modified_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlaceDocument {
    #[serde(rename = "@id")]
    pub url: String,
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub id: String,
    pub name: LocalizedText,
    pub data_source: String,
}

impl PlaceDocument {
    pub fn new(place: &Place, base_url: &str) -> Self {
        Self {
            url: resource_url(base_url, ResourceKind::Place, &place.id),
            context: CONTEXT,
            kind: "Place",
            id: place.id.clone(),
            name: place.name.clone(),
            data_source: place.data_source_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KeywordDocument {
    #[serde(rename = "@id")]
    pub url: String,
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub id: String,
    pub name: LocalizedText,
    pub data_source: String,
    pub deprecated: bool,
}

impl KeywordDocument {
    pub fn new(keyword: &Keyword, base_url: &str) -> Self {
        Self {
            url: resource_url(base_url, ResourceKind::Keyword, &keyword.id),
            context: CONTEXT,
            kind: "Keyword",
            id: keyword.id.clone(),
            name: keyword.name.clone(),
            data_source: keyword.data_source_id.clone(),
            deprecated: keyword.deprecated,
        }
    }
}
