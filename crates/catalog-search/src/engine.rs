//! Score, filter, sort and paginate a product list.

use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;
use crate::product::{Product, ScoredProduct};
use crate::scoring::ScoringStrategy;
use crate::sort::SortBy;

/// One page of scored matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHits {
    /// Matches on the requested page, in sort order.
    pub results: Vec<ScoredProduct>,
    /// Number of matches across all pages.
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: usize,
}

impl SearchHits {
    /// Build a page from the full sorted match list.
    pub fn paginate(matches: &[ScoredProduct], page: u32, page_size: u32) -> Self {
        let pagination = Pagination::new(page, page_size, matches.len());
        Self {
            results: pagination.slice(matches),
            total: pagination.total,
            page: pagination.page,
            page_size: pagination.page_size,
            total_pages: pagination.total_pages,
        }
    }

    /// Check if this page is empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of results on this page.
    pub fn len(&self) -> usize {
        self.results.len()
    }
}

/// Score every product, keep those with a positive score, sort them.
pub fn rank<'a, I>(products: I, query: &str, strategy: ScoringStrategy, sort: SortBy) -> Vec<ScoredProduct>
where
    I: IntoIterator<Item = &'a Product>,
{
    let terms = strategy.query_terms(query);
    let mut matches: Vec<ScoredProduct> = products
        .into_iter()
        .filter_map(|product| {
            let score = strategy.score(&terms, product);
            (score > 0).then(|| ScoredProduct::new(product.clone(), score))
        })
        .collect();
    sort.apply(&mut matches);
    matches
}

/// Run a full search over `products`.
pub fn search_products(
    products: &[Product],
    query: &str,
    strategy: ScoringStrategy,
    sort: SortBy,
    page: u32,
    page_size: u32,
) -> SearchHits {
    let matches = rank(products, query, strategy, sort);
    SearchHits::paginate(&matches, page, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("Hex bolt M8").with_manufacturer("Acme"),
            Product::new("Flat washer").with_manufacturer("Bolt Co"),
            Product::new("Hex nut M8").with_manufacturer("Acme"),
            Product::new("Hex bolt M10 zinc").with_manufacturer("Zeta"),
        ]
    }

    #[test]
    fn test_filters_zero_scores_and_ranks() {
        let hits = search_products(
            &catalog(),
            "hex bolt",
            ScoringStrategy::Substring,
            SortBy::Relevance,
            1,
            24,
        );
        let names: Vec<_> = hits.results.iter().map(|r| r.product.description()).collect();
        // "Flat washer" matches "bolt" only through its manufacturer name.
        assert_eq!(
            names,
            vec!["Hex bolt M8", "Hex bolt M10 zinc", "Flat washer", "Hex nut M8"]
        );
        assert_eq!(hits.results[0].score, 2);
        assert_eq!(hits.total, 4);
        assert_eq!(hits.total_pages, 1);
    }

    #[test]
    fn test_no_match_gives_empty_page() {
        let hits = search_products(
            &catalog(),
            "gasket",
            ScoringStrategy::Substring,
            SortBy::Relevance,
            1,
            24,
        );
        assert!(hits.is_empty());
        assert_eq!(hits.total, 0);
        assert_eq!(hits.total_pages, 0);
    }

    #[test]
    fn test_sort_applies_before_pagination() {
        let hits = search_products(
            &catalog(),
            "m8 m10",
            ScoringStrategy::Substring,
            SortBy::ManufacturerAsc,
            2,
            2,
        );
        assert_eq!(hits.total, 3);
        assert_eq!(hits.total_pages, 2);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.results[0].product.manufacturer_name(), "Zeta");
    }

    #[test]
    fn test_paginate_twenty_five() {
        let matches: Vec<ScoredProduct> = (0..25)
            .map(|i| ScoredProduct::new(Product::new(format!("item {i:02}")), 1))
            .collect();
        let hits = SearchHits::paginate(&matches, 2, 10);
        assert_eq!(hits.results, matches[10..20].to_vec());
        assert_eq!(hits.total_pages, 3);
    }
}
