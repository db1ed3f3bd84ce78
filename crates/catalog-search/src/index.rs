//! Inverted term index for weighted search.

use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use tracing::info;

use crate::engine::{rank, SearchHits};
use crate::product::Product;
use crate::scoring::ScoringStrategy;
use crate::sort::SortBy;

/// Maps the lowercased whitespace tokens of the scored fields to the catalog
/// positions of products containing them.
///
/// Tokens are indexed as they appear, stop words and short tokens included.
/// A query term never contains whitespace, so it occurs in a product's
/// weighted text exactly when it occurs inside one of that product's tokens.
/// Candidates are therefore complete, and [`SearchIndex::search`] returns the
/// same hits as a full [`ScoringStrategy::Weighted`] scan.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    products: Vec<Product>,
    postings: HashMap<String, Vec<usize>>,
}

impl SearchIndex {
    /// Index a product list.
    pub fn build(products: Vec<Product>) -> Self {
        let started = Instant::now();
        let mut postings: HashMap<String, Vec<usize>> = HashMap::new();

        for (position, product) in products.iter().enumerate() {
            let text = [
                product.description(),
                product.mfg_part_no(),
                product.vendor_name(),
                product.manufacturer_name(),
            ]
            .join(" ")
            .to_lowercase();

            for token in text.split_whitespace() {
                let list = postings.entry(token.to_string()).or_default();
                if list.last() != Some(&position) {
                    list.push(position);
                }
            }
        }

        info!(
            products = products.len(),
            terms = postings.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "search index built"
        );
        Self { products, postings }
    }

    /// Number of distinct indexed terms.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Number of indexed products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the index holds no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products with a token equal to `term`, in catalog order.
    pub fn postings(&self, term: &str) -> Vec<&Product> {
        self.postings
            .get(term)
            .map(|positions| positions.iter().map(|&i| &self.products[i]).collect())
            .unwrap_or_default()
    }

    /// Positions of products that may match `terms`, in catalog order.
    fn candidates(&self, terms: &[String]) -> BTreeSet<usize> {
        let mut positions = BTreeSet::new();
        for (indexed, list) in &self.postings {
            if terms.iter().any(|term| indexed.contains(term.as_str())) {
                positions.extend(list.iter().copied());
            }
        }
        positions
    }

    /// Weighted search over the indexed products.
    pub fn search(&self, query: &str, sort: SortBy, page: u32, page_size: u32) -> SearchHits {
        let started = Instant::now();
        let terms = ScoringStrategy::Weighted.query_terms(query);
        let candidates = self.candidates(&terms);

        let matches = rank(
            candidates.iter().map(|&i| &self.products[i]),
            query,
            ScoringStrategy::Weighted,
            sort,
        );
        let hits = SearchHits::paginate(&matches, page, page_size);

        info!(
            query,
            candidates = candidates.len(),
            total = hits.total,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "indexed search completed"
        );
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::search_products;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("Bracket kit").with_mfg_part_no("XB200"),
            Product::new("Replacement xb200 bracket"),
            Product::new("Flat washer").with_long_description("for the xb200 series"),
            Product::new("Hex bolt").with_vendor("Fastenal"),
            Product::new("Hex nut M8").with_mfg_part_no("HN"),
            Product::new("Bracket with mount"),
        ]
    }

    fn index() -> SearchIndex {
        SearchIndex::build(catalog())
    }

    #[test]
    fn test_build_collects_tokens() {
        let idx = index();
        assert_eq!(idx.len(), 6);
        assert_eq!(idx.postings("xb200").len(), 2);
        assert_eq!(idx.postings("bracket").len(), 3);
        // Short tokens and stop words are indexed too.
        assert_eq!(idx.postings("hn").len(), 1);
        assert_eq!(idx.postings("with").len(), 1);
        // Long descriptions are not scored, so they are not indexed.
        assert!(idx.postings("series").is_empty());
        assert!(idx.term_count() > 0);
    }

    #[test]
    fn test_search_ranks_part_number_first() {
        let hits = index().search("XB200", SortBy::Relevance, 1, 24);
        let names: Vec<_> = hits.results.iter().map(|r| r.product.description()).collect();
        assert_eq!(names, vec!["Bracket kit", "Replacement xb200 bracket"]);
        assert_eq!(hits.results[0].score, 4);
        assert_eq!(hits.results[1].score, 3);
    }

    #[test]
    fn test_search_matches_term_substrings() {
        let hits = index().search("fasten", SortBy::Relevance, 1, 24);
        assert_eq!(hits.total, 1);
        assert_eq!(hits.results[0].product.description(), "Hex bolt");
    }

    #[test]
    fn test_search_with_only_stop_words_is_empty() {
        let hits = index().search("the and of", SortBy::Relevance, 1, 24);
        assert!(hits.is_empty());
        assert_eq!(hits.total_pages, 0);
    }

    #[test]
    fn test_search_finds_terms_inside_short_and_stop_word_tokens() {
        let idx = index();
        for query in ["(m8)", "ith", "hn-"] {
            let hits = idx.search(query, SortBy::Relevance, 1, 24);
            assert_eq!(hits.total, 1, "query {query:?}");
        }
    }

    #[test]
    fn test_search_agrees_with_weighted_scan() {
        let products = catalog();
        let idx = SearchIndex::build(products.clone());
        for query in [
            "xb200", "bracket mount", "(m8)", "ith", "hn-", "hex", "fasten", "series",
            "the and of", "nothing here",
        ] {
            for sort in [SortBy::Relevance, SortBy::DescriptionAsc] {
                let scan =
                    search_products(&products, query, ScoringStrategy::Weighted, sort, 1, 24);
                assert_eq!(idx.search(query, sort, 1, 24), scan, "query {query:?}");
            }
        }
    }
}
