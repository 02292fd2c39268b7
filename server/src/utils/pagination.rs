//! `page` / `page_size` query parameters for list endpoints.

use std::collections::HashMap;

use serde::Serialize;

use crate::validation::{FieldErrors, Message};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based.
    pub page: u64,
    pub page_size: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Reads `page` and `page_size`. Sizes above [`MAX_PAGE_SIZE`] are capped.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut pagination = Pagination::default();

        if let Some(raw) = params.get("page") {
            match positive(raw) {
                Some(page) => pagination.page = page,
                None => errors.add("page", Message::InvalidPage),
            }
        }
        if let Some(raw) = params.get("page_size") {
            match positive(raw) {
                Some(size) => pagination.page_size = size.min(MAX_PAGE_SIZE),
                None => errors.add("page_size", Message::InvalidPage),
            }
        }

        errors.into_result(pagination)
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Links to the neighbouring pages of `list_url`, given `count` items in total.
    pub fn meta(&self, count: u64, list_url: &str) -> PageMeta {
        let link = |page: u64| format!("{}?page={}&page_size={}", list_url, page, self.page_size);
        let has_next = self.offset().saturating_add(self.page_size) < count;

        PageMeta {
            count,
            next: has_next.then(|| link(self.page + 1)),
            previous: (self.page > 1).then(|| link(self.page - 1)),
        }
    }
}

fn positive(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PageMeta {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub meta: PageMeta,
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_and_cap() {
        assert_eq!(Pagination::from_params(&params(&[])), Ok(Pagination::default()));

        let capped = Pagination::from_params(&params(&[("page", "3"), ("page_size", "5000")])).unwrap();
        assert_eq!(capped.page, 3);
        assert_eq!(capped.page_size, MAX_PAGE_SIZE);
        assert_eq!(capped.offset(), 2 * MAX_PAGE_SIZE);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let errors =
            Pagination::from_params(&params(&[("page", "0"), ("page_size", "ten")])).unwrap_err();
        assert_eq!(errors.get("page"), &[Message::InvalidPage]);
        assert_eq!(errors.get("page_size"), &[Message::InvalidPage]);
    }

    #[test]
    fn test_meta_links() {
        let url = "http://localhost:3001/v1/event/";
        let first = Pagination { page: 1, page_size: 2 };
        assert_eq!(
            first.meta(5, url),
            PageMeta {
                count: 5,
                next: Some(format!("{}?page=2&page_size=2", url)),
                previous: None,
            }
        );

        let last = Pagination { page: 3, page_size: 2 };
        let meta = last.meta(5, url);
        assert_eq!(meta.next, None);
        assert_eq!(meta.previous, Some(format!("{}?page=2&page_size=2", url)));
    }
}
