use serde::{Deserialize, Serialize};

use super::LocalizedText;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub data_source_id: String,
    pub name: LocalizedText,
    /// Deleted places are kept for old events but cannot be referenced anew.
    pub deleted: bool,
}

impl Place {
    pub fn new(id: impl Into<String>, data_source_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data_source_id: data_source_id.into(),
            name: LocalizedText::new(),
            deleted: false,
        }
    }

    pub fn is_referable(&self) -> bool {
        !self.deleted
    }
}
