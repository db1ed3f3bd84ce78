//! Search responses.

use catalog_search::{Pagination, ScoredProduct, SearchHits, SortBy};
use serde::{Deserialize, Serialize};

use crate::request::SearchRequest;

/// `Cache-Control` value for search responses: one minute in browsers,
/// five minutes at the CDN.
pub const CACHE_CONTROL: &str = "public, max-age=60, s-maxage=300";

/// One page of search results as returned to the caller and stored in the
/// result cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub query: String,
    pub results: Vec<ScoredProduct>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: usize,
    pub sort_by: SortBy,
    /// Whether this response came from the result cache.
    pub cached: bool,
}

impl SearchResult {
    /// A freshly computed result.
    pub fn from_hits(request: &SearchRequest, hits: SearchHits) -> Self {
        Self {
            query: request.query.clone(),
            results: hits.results,
            total: hits.total,
            page: request.page,
            page_size: request.page_size,
            total_pages: hits.total_pages,
            sort_by: request.sort_by,
            cached: false,
        }
    }

    /// Mark the result as served from cache.
    pub fn into_cached(mut self) -> Self {
        self.cached = true;
        self
    }

    /// Page position of this result.
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.page_size, self.total)
    }

    /// Entity tag for HTTP responses, quotes included.
    pub fn etag(&self) -> String {
        format!("\"search-{}-{}-{}\"", self.query, self.page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_search::Product;

    fn result() -> SearchResult {
        let hits = SearchHits::paginate(
            &[ScoredProduct::new(Product::new("Hex bolt"), 1)],
            1,
            24,
        );
        SearchResult::from_hits(&SearchRequest::new("bolt"), hits)
    }

    #[test]
    fn test_pagination_of_middle_page() {
        let matches: Vec<_> = (0..25)
            .map(|i| ScoredProduct::new(Product::new(format!("Bolt {i:02}")), 1))
            .collect();
        let request = SearchRequest::new("bolt").with_page(2).with_page_size(10);
        let result = SearchResult::from_hits(&request, SearchHits::paginate(&matches, 2, 10));

        let pagination = result.pagination();
        assert_eq!(pagination.start_item(), 11);
        assert_eq!(pagination.end_item(), 20);
        assert!(pagination.has_next());
    }

    #[test]
    fn test_wire_shape() {
        let value = serde_json::to_value(result()).unwrap();
        assert_eq!(value["query"], "bolt");
        assert_eq!(value["pageSize"], 24);
        assert_eq!(value["totalPages"], 1);
        assert_eq!(value["sortBy"], "relevance");
        assert_eq!(value["cached"], false);
        assert_eq!(value["results"][0]["description"], "Hex bolt");
        assert_eq!(value["results"][0]["_score"], 1);
    }

    #[test]
    fn test_etag_and_cached_flag() {
        let r = result();
        assert_eq!(r.etag(), "\"search-bolt-1-24\"");
        let cached = r.clone().into_cached();
        assert!(cached.cached);
        assert_eq!(cached.results, r.results);
    }
}
