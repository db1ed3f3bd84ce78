//! Product model, relevance scoring, sorting and pagination for catalog search.
//!
//! - **Product**: feed records, preserved field-for-field
//! - **Scoring**: plain substring scoring and weighted scoring, as separate strategies
//! - **Index**: inverted term index backing weighted search
//! - **Sort / Pagination**: result ordering and page slicing
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_search::prelude::*;
//!
//! let hits = search_products(&products, "hex bolt", ScoringStrategy::Substring, SortBy::Relevance, 1, 24);
//! println!("{} matches over {} pages", hits.total, hits.total_pages);
//! ```

pub mod engine;
pub mod index;
pub mod pagination;
pub mod product;
pub mod scoring;
pub mod sort;

pub use engine::{search_products, SearchHits};
pub use index::SearchIndex;
pub use pagination::Pagination;
pub use product::{CatalogPayload, CatalogResponse, Product, ScoredProduct};
pub use scoring::{ScoringStrategy, UnknownStrategy, STOP_WORDS};
pub use sort::{SortBy, UnknownSort};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::engine::{search_products, SearchHits};
    pub use crate::index::SearchIndex;
    pub use crate::pagination::Pagination;
    pub use crate::product::{CatalogPayload, Product, ScoredProduct};
    pub use crate::scoring::ScoringStrategy;
    pub use crate::sort::SortBy;
}
