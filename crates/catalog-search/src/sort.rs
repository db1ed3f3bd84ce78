//! Result ordering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::product::ScoredProduct;

/// Sort options for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Highest score first.
    #[default]
    Relevance,
    /// Description A-Z.
    DescriptionAsc,
    /// Manufacturer A-Z.
    ManufacturerAsc,
    /// Products with an image first.
    HasImage,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::DescriptionAsc => "description-asc",
            SortBy::ManufacturerAsc => "manufacturer-asc",
            SortBy::HasImage => "has-image",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortBy::Relevance => "Relevance",
            SortBy::DescriptionAsc => "Description: A-Z",
            SortBy::ManufacturerAsc => "Manufacturer: A-Z",
            SortBy::HasImage => "With image first",
        }
    }

    /// Sort in place. The sort is stable: ties keep their relative order.
    pub fn apply(&self, items: &mut [ScoredProduct]) {
        match self {
            SortBy::Relevance => items.sort_by(|a, b| b.score.cmp(&a.score)),
            SortBy::DescriptionAsc => {
                items.sort_by(|a, b| a.product.description().cmp(b.product.description()))
            }
            SortBy::ManufacturerAsc => items.sort_by(|a, b| {
                a.product
                    .manufacturer_name()
                    .cmp(b.product.manufacturer_name())
            }),
            SortBy::HasImage => {
                items.sort_by(|a, b| b.product.has_image().cmp(&a.product.has_image()))
            }
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised sort key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort option: {0}")]
pub struct UnknownSort(pub String);

impl FromStr for SortBy {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(SortBy::Relevance),
            "description-asc" => Ok(SortBy::DescriptionAsc),
            "manufacturer-asc" => Ok(SortBy::ManufacturerAsc),
            "has-image" => Ok(SortBy::HasImage),
            _ => Err(UnknownSort(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Product;

    fn scored(description: &str, score: u32) -> ScoredProduct {
        ScoredProduct::new(Product::new(description), score)
    }

    fn descriptions(items: &[ScoredProduct]) -> Vec<&str> {
        items.iter().map(|i| i.product.description()).collect()
    }

    #[test]
    fn test_relevance_descending_and_stable() {
        let mut items = vec![scored("a", 1), scored("b", 3), scored("c", 1), scored("d", 3)];
        SortBy::Relevance.apply(&mut items);
        assert_eq!(descriptions(&items), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_description_is_case_sensitive() {
        let mut items = vec![scored("bolt", 1), scored("Washer", 1), scored("anchor", 1)];
        SortBy::DescriptionAsc.apply(&mut items);
        assert_eq!(descriptions(&items), vec!["Washer", "anchor", "bolt"]);
    }

    #[test]
    fn test_missing_description_sorts_first() {
        let mut items = vec![scored("bolt", 1), ScoredProduct::new(Product::default(), 1)];
        SortBy::DescriptionAsc.apply(&mut items);
        assert_eq!(descriptions(&items), vec!["", "bolt"]);
    }

    #[test]
    fn test_manufacturer_ascending() {
        let mut items = vec![
            ScoredProduct::new(Product::new("x").with_manufacturer("Zeta"), 1),
            ScoredProduct::new(Product::new("y").with_manufacturer("Acme"), 1),
        ];
        SortBy::ManufacturerAsc.apply(&mut items);
        assert_eq!(descriptions(&items), vec!["y", "x"]);
    }

    #[test]
    fn test_has_image_first() {
        let mut items = vec![
            ScoredProduct::new(Product::new("none"), 1),
            ScoredProduct::new(Product::new("empty").with_image_url(""), 1),
            ScoredProduct::new(Product::new("img").with_image_url("https://img/1.jpg"), 1),
            ScoredProduct::new(Product::new("img2").with_image_url("https://img/2.jpg"), 1),
        ];
        SortBy::HasImage.apply(&mut items);
        assert_eq!(descriptions(&items), vec!["img", "img2", "none", "empty"]);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&SortBy::DescriptionAsc).unwrap(),
            "\"description-asc\""
        );
        assert_eq!(
            serde_json::from_str::<SortBy>("\"has-image\"").unwrap(),
            SortBy::HasImage
        );
        assert_eq!("manufacturer-asc".parse::<SortBy>(), Ok(SortBy::ManufacturerAsc));
        assert!("price-asc".parse::<SortBy>().is_err());
    }
}
