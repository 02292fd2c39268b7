//! Event payload validation.
//!
//! Runs in stages: decode the body, parse every known field into
//! [`EventInput`], apply [`RULES`] in order, then resolve references
//! against the store. Errors accumulate per field within a stage; a later
//! stage only runs when the earlier ones came back clean, except that the
//! rules run over whatever parsed.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::jsonld::{parse_reference, ResourceKind};
use crate::models::{LocalizedText, PublicationStatus};
use crate::store::{EventStore, StoreResult};

pub mod messages;

pub use messages::{Language, Message};

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Fields only the server may set. Supplying any of them is an error.
pub const SERVER_ASSIGNED_FIELDS: &[&str] = &["id", "data_source", "publisher"];

/// Output-only fields. Clients often send back what they received, so
/// these are dropped silently.
const READ_ONLY_FIELDS: &[&str] = &[
    "@id",
    "@context",
    "@type",
    "created_time",
    "last_modified_time",
    "created_by",
    "last_modified_by",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<Message>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: Message) {
        let messages = self.0.entry(field.to_string()).or_default();
        if !messages.contains(&message) {
            messages.push(message);
        }
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[Message] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    /// `{field: [message, ...]}` in the given language.
    pub fn render(&self, language: Language) -> Value {
        let rendered: Map<String, Value> = self
            .0
            .iter()
            .map(|(field, messages)| {
                let texts = messages
                    .iter()
                    .map(|m| Value::String(m.text(language).to_string()))
                    .collect();
                (field.clone(), Value::Array(texts))
            })
            .collect();
        Value::Object(rendered)
    }
}

impl From<(&str, Message)> for FieldErrors {
    fn from((field, message): (&str, Message)) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        errors
    }
}

/// A submitted event after parsing, before anything is stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventInput {
    pub name: Option<LocalizedText>,
    pub short_description: LocalizedText,
    pub description: LocalizedText,
    pub info_url: LocalizedText,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub keywords: Vec<String>,
    pub audience: Vec<String>,
    pub publication_status: PublicationStatus,
}

/// Decodes a request body into a JSON object. An empty body counts as `{}`.
pub fn decode_body(body: &[u8]) -> Result<Map<String, Value>, FieldErrors> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err((NON_FIELD_ERRORS, Message::ExpectedObject).into()),
        Err(_) => Err((NON_FIELD_ERRORS, Message::InvalidJson).into()),
    }
}

/// Parses and rule-checks a payload. Does not touch the store.
///
/// `base_url` is the public URL absolute references must point under.
pub fn validate_event(
    payload: &Map<String, Value>,
    now: DateTime<Utc>,
    base_url: &str,
) -> Result<EventInput, FieldErrors> {
    let mut errors = FieldErrors::new();
    let input = parse_fields(payload, base_url, &mut errors);

    for rule in RULES {
        rule(&input, now, &mut errors);
    }

    errors.into_result(input)
}

fn parse_fields(payload: &Map<String, Value>, base_url: &str, errors: &mut FieldErrors) -> EventInput {
    let mut input = EventInput::default();

    for (field, value) in payload {
        match field.as_str() {
            f if SERVER_ASSIGNED_FIELDS.contains(&f) => errors.add(f, Message::ServerAssigned),
            f if READ_ONLY_FIELDS.contains(&f) => {}
            "name" => match value {
                Value::Null => errors.add("name", Message::NotNull),
                _ => input.name = record(errors, "name", parse_localized(value)),
            },
            "short_description" => {
                input.short_description =
                    record(errors, field, parse_localized(value)).unwrap_or_default()
            }
            "description" => {
                input.description = record(errors, field, parse_localized(value)).unwrap_or_default()
            }
            "info_url" => {
                input.info_url = record(errors, field, parse_localized(value)).unwrap_or_default()
            }
            "start_time" => input.start_time = record(errors, field, parse_datetime(value)).flatten(),
            "end_time" => input.end_time = record(errors, field, parse_datetime(value)).flatten(),
            "publication_status" => {
                if let Some(status) = record(errors, field, parse_status(value)) {
                    input.publication_status = status;
                }
            }
            "location" => {
                input.location = record(errors, field, parse_reference(value, ResourceKind::Place, base_url))
            }
            "keywords" => input.keywords = parse_keyword_list(value, field, base_url, errors),
            "audience" => input.audience = parse_keyword_list(value, field, base_url, errors),
            other => tracing::debug!(field = other, "ignoring unknown event field"),
        }
    }

    input
}

fn record<T>(errors: &mut FieldErrors, field: &str, parsed: Result<T, Message>) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(message) => {
            errors.add(field, message);
            None
        }
    }
}

/// Null translations are dropped; everything else must be a string.
fn parse_localized(value: &Value) -> Result<LocalizedText, Message> {
    match value {
        Value::Null => Ok(LocalizedText::new()),
        Value::Object(translations) => translations
            .iter()
            .filter(|(_, text)| !text.is_null())
            .map(|(language, text)| match text {
                Value::String(s) if !language.is_empty() => Ok((language.clone(), s.clone())),
                _ => Err(Message::ExpectedLocalizedText),
            })
            .collect(),
        _ => Err(Message::ExpectedLocalizedText),
    }
}

fn parse_datetime(value: &Value) -> Result<Option<DateTime<Utc>>, Message> {
    match value {
        Value::Null => Ok(None),
        Value::String(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| Message::InvalidDateTime),
        _ => Err(Message::InvalidDateTime),
    }
}

fn parse_status(value: &Value) -> Result<PublicationStatus, Message> {
    match value {
        Value::Null => Err(Message::NotNull),
        Value::String(raw) => PublicationStatus::parse(raw).ok_or(Message::InvalidChoice),
        _ => Err(Message::InvalidChoice),
    }
}

/// Keyword sets: duplicates collapse, order of first appearance is kept.
fn parse_keyword_list(
    value: &Value,
    field: &str,
    base_url: &str,
    errors: &mut FieldErrors,
) -> Vec<String> {
    let items = match value {
        Value::Null => {
            errors.add(field, Message::NotNull);
            return Vec::new();
        }
        Value::Array(items) => items,
        _ => {
            errors.add(field, Message::ExpectedList);
            return Vec::new();
        }
    };

    let mut ids: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if let Some(id) = record(errors, field, parse_reference(item, ResourceKind::Keyword, base_url)) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

pub type Rule = fn(&EventInput, DateTime<Utc>, &mut FieldErrors);

/// Cross-field rules, applied in this order after parsing.
pub const RULES: &[Rule] = &[
    require_name,
    require_publishing_fields,
    reject_past_times,
    check_time_order,
];

fn require_name(input: &EventInput, _now: DateTime<Utc>, errors: &mut FieldErrors) {
    if errors.has("name") {
        return;
    }
    let has_text = input
        .name
        .as_ref()
        .is_some_and(|name| name.values().any(|text| !text.trim().is_empty()));
    if !has_text {
        errors.add("name", Message::Required);
    }
}

/// Published events need a place and at least one keyword; drafts don't.
/// Skipped when the status itself did not parse.
fn require_publishing_fields(input: &EventInput, _now: DateTime<Utc>, errors: &mut FieldErrors) {
    if errors.has("publication_status") || input.publication_status != PublicationStatus::Public {
        return;
    }
    if input.location.is_none() && !errors.has("location") {
        errors.add("location", Message::Required);
    }
    if input.keywords.is_empty() && !errors.has("keywords") {
        errors.add("keywords", Message::Required);
    }
}

fn reject_past_times(input: &EventInput, now: DateTime<Utc>, errors: &mut FieldErrors) {
    if input.start_time.is_some_and(|start| start < now) {
        errors.add("start_time", Message::StartTimeInPast);
    }
    if input.end_time.is_some_and(|end| end < now) {
        errors.add("end_time", Message::EndTimeInPast);
    }
}

fn check_time_order(input: &EventInput, _now: DateTime<Utc>, errors: &mut FieldErrors) {
    if let (Some(start), Some(end)) = (input.start_time, input.end_time) {
        if end < start {
            errors.add("end_time", Message::EndBeforeStart);
        }
    }
}

/// Checks that every referenced place and keyword exists and may still be
/// referenced.
pub async fn resolve_references(store: &dyn EventStore, input: &EventInput) -> StoreResult<FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Some(place_id) = &input.location {
        let usable = store.place(place_id).await?.is_some_and(|p| p.is_referable());
        if !usable {
            errors.add("location", Message::ObjectDoesNotExist);
        }
    }

    for (field, ids) in [("keywords", &input.keywords), ("audience", &input.audience)] {
        for id in ids {
            let usable = store.keyword(id).await?.is_some_and(|k| k.is_referable());
            if !usable {
                errors.add(field, Message::ObjectDoesNotExist);
            }
        }
    }

    Ok(errors)
}
