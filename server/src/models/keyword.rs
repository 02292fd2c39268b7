use serde::{Deserialize, Serialize};

use super::LocalizedText;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: String,
    pub data_source_id: String,
    pub name: LocalizedText,
    pub deprecated: bool,
}

impl Keyword {
    pub fn new(id: impl Into<String>, data_source_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data_source_id: data_source_id.into(),
            name: LocalizedText::new(),
            deprecated: false,
        }
    }

    pub fn is_referable(&self) -> bool {
        !self.deprecated
    }
}
