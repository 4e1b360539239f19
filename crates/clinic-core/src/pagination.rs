use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page metadata as sent by the backend alongside list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

/// Pagination state held by every list-bearing store.
///
/// `total_pages` and `total_items` stay `None` until the first successful
/// list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_items: Option<u64>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            total_pages: None,
            total_items: None,
        }
    }
}

impl Pagination {
    pub fn new(page_size: u32) -> Result<Self> {
        if page_size == 0 {
            return Err(CoreError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_size,
            ..Self::default()
        })
    }

    /// Same page size, different page. Totals are carried over until the next
    /// server response replaces them.
    pub fn with_page(self, current_page: u32) -> Self {
        Self {
            current_page,
            ..self
        }
    }

    /// Replace the whole state with the server's metadata.
    ///
    /// A zero page size from the server is ignored in favour of the current
    /// one, since a page size must stay positive.
    pub fn apply(&self, meta: &PageMeta) -> Self {
        Self {
            current_page: meta.current_page,
            page_size: if meta.page_size == 0 {
                self.page_size
            } else {
                meta.page_size
            },
            total_pages: Some(meta.total_pages),
            total_items: Some(meta.total_items),
        }
    }

    pub fn is_populated(&self) -> bool {
        self.total_pages.is_some()
    }

    /// `current_page < total_pages`, except for an empty result set.
    pub fn is_consistent(&self) -> bool {
        match self.total_pages {
            None | Some(0) => true,
            Some(total) => self.current_page < total,
        }
    }

    pub fn has_next(&self) -> bool {
        self.total_pages
            .is_some_and(|total| self.current_page.saturating_add(1) < total)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 0
    }

    /// Zero-based `page` and `size` request parameters.
    pub fn query_params(&self) -> [(&'static str, String); 2] {
        [
            ("page", self.current_page.to_string()),
            ("size", self.page_size.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pagination() {
        let p = Pagination::default();
        assert_eq!(p.current_page, 0);
        assert_eq!(p.page_size, 10);
        assert!(!p.is_populated());
        assert!(p.is_consistent());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(
            Pagination::new(0),
            Err(CoreError::InvalidPageSize(0))
        ));
        assert_eq!(Pagination::new(25).unwrap().page_size, 25);
    }

    #[test]
    fn test_apply_overwrites_wholesale() {
        let p = Pagination::default().with_page(3);
        let meta = PageMeta {
            current_page: 1,
            page_size: 20,
            total_pages: 4,
            total_items: 75,
        };
        let applied = p.apply(&meta);
        assert_eq!(applied.current_page, 1);
        assert_eq!(applied.page_size, 20);
        assert_eq!(applied.total_pages, Some(4));
        assert_eq!(applied.total_items, Some(75));
        assert!(applied.has_next());
        assert!(applied.has_previous());
    }

    #[test]
    fn test_apply_keeps_positive_page_size() {
        let meta = PageMeta {
            current_page: 0,
            page_size: 0,
            total_pages: 0,
            total_items: 0,
        };
        let applied = Pagination::default().apply(&meta);
        assert_eq!(applied.page_size, DEFAULT_PAGE_SIZE);
        assert!(applied.is_consistent());
        assert!(!applied.has_next());
    }

    #[test]
    fn test_page_meta_wire_names() {
        let meta: PageMeta = serde_json::from_str(
            r#"{"currentPage":2,"pageSize":10,"totalPages":3,"totalItems":21}"#,
        )
        .unwrap();
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.total_items, 21);
    }

    #[test]
    fn test_query_params() {
        let params = Pagination::new(5).unwrap().with_page(2).query_params();
        assert_eq!(params[0], ("page", "2".to_string()));
        assert_eq!(params[1], ("size", "5".to_string()));
    }

    #[test]
    fn test_inconsistent_page_detected() {
        let p = Pagination {
            current_page: 5,
            page_size: 10,
            total_pages: Some(2),
            total_items: Some(12),
        };
        assert!(!p.is_consistent());
    }
}
