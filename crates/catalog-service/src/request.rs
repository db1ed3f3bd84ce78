//! Search request parsing and cache keys.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use catalog_search::pagination::DEFAULT_PAGE_SIZE;
use catalog_search::SortBy;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Prefix of every search result cache key.
pub const SEARCH_KEY_PREFIX: &str = "search_";

/// A catalog search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Free-text query; must contain a non-whitespace character.
    #[serde(default)]
    pub query: String,
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub sort_by: SortBy,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl SearchRequest {
    /// First page of results for `query`, by relevance.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: default_page(),
            page_size: default_page_size(),
            sort_by: SortBy::default(),
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Parse a JSON request body. Malformed bodies, negative numbers and
    /// unknown sort keys are validation errors.
    pub fn from_json(body: &str) -> Result<Self> {
        let request: Self = serde_json::from_str(body)
            .map_err(|e| CatalogError::validation(format!("invalid search request: {e}")))?;
        request.validate()?;
        Ok(request)
    }

    /// Check the request before any cache or scoring work.
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(CatalogError::validation("Search query is required"));
        }
        if self.page == 0 {
            return Err(CatalogError::validation("page must be at least 1"));
        }
        if self.page_size == 0 {
            return Err(CatalogError::validation("pageSize must be at least 1"));
        }
        Ok(())
    }

    /// Cache key for this request's result.
    ///
    /// `search_` followed by the base64 of the request's JSON form with
    /// fields in the order query, page, pageSize, sortBy.
    pub fn cache_key(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        Ok(format!("{SEARCH_KEY_PREFIX}{}", STANDARD.encode(canonical)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn test_defaults_from_json() {
        let request = SearchRequest::from_json(r#"{"query": "hex bolt"}"#).unwrap();
        assert_eq!(request, SearchRequest::new("hex bolt"));
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 24);
        assert_eq!(request.sort_by, SortBy::Relevance);
    }

    #[test]
    fn test_camel_case_fields() {
        let request = SearchRequest::from_json(
            r#"{"query": "bolt", "page": 3, "pageSize": 10, "sortBy": "has-image"}"#,
        )
        .unwrap();
        assert_eq!(request.page, 3);
        assert_eq!(request.page_size, 10);
        assert_eq!(request.sort_by, SortBy::HasImage);
    }

    #[test]
    fn test_rejects_blank_query() {
        for body in [r#"{"query": ""}"#, r#"{"query": "  \t "}"#, "{}"] {
            let err = SearchRequest::from_json(body).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Validation, "{body}");
        }
    }

    #[test]
    fn test_rejects_bad_paging_and_sort() {
        for body in [
            r#"{"query": "bolt", "page": 0}"#,
            r#"{"query": "bolt", "page": -1}"#,
            r#"{"query": "bolt", "pageSize": 0}"#,
            r#"{"query": "bolt", "sortBy": "price-asc"}"#,
            "not json",
        ] {
            let err = SearchRequest::from_json(body).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Validation, "{body}");
        }
    }

    #[test]
    fn test_cache_key_format() {
        let key = SearchRequest::new("bolt").cache_key().unwrap();
        let encoded = key.strip_prefix(SEARCH_KEY_PREFIX).unwrap();
        let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(
            decoded,
            r#"{"query":"bolt","page":1,"pageSize":24,"sortBy":"relevance"}"#
        );
    }

    #[test]
    fn test_cache_key_depends_on_every_field() {
        let base = SearchRequest::new("bolt");
        let keys = [
            base.cache_key().unwrap(),
            base.clone().with_page(2).cache_key().unwrap(),
            base.clone().with_page_size(10).cache_key().unwrap(),
            base.clone().with_sort(SortBy::DescriptionAsc).cache_key().unwrap(),
            SearchRequest::new("Bolt").cache_key().unwrap(),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(keys[0], SearchRequest::new("bolt").cache_key().unwrap());
    }
}
