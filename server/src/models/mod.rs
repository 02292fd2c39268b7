use std::collections::BTreeMap;

pub mod actor;
pub mod data_source;
pub mod event;
pub mod keyword;
pub mod organization;
pub mod place;
pub mod user;

pub use actor::Actor;
pub use data_source::DataSource;
pub use event::{Event, PublicationStatus};
pub use keyword::Keyword;
pub use organization::Organization;
pub use place::Place;
pub use user::User;

/// Translations keyed by language code, e.g. `{"fi": "Konsertti", "en": "Concert"}`.
pub type LocalizedText = BTreeMap<String, String>;
