//! Catalog product records.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A product as delivered by the catalog feed.
///
/// Field names follow the feed. Fields the feed carries but search does not
/// use are kept in `extra` so a product survives a round-trip unchanged.
///
/// Feeds are loosely typed: a number or boolean in a text field is read as
/// its JSON text, and `null` or a nested value reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "text_field", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "longdescription",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub long_description: Option<String>,
    #[serde(
        rename = "mfgpartno",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub mfg_part_no: Option<String>,
    #[serde(
        rename = "vendorpartno",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub vendor_part_no: Option<String>,
    #[serde(
        rename = "vendorname",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub vendor_name: Option<String>,
    #[serde(
        rename = "manufacturername",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub manufacturer_name: Option<String>,
    #[serde(
        rename = "customerpartno",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_part_no: Option<String>,
    /// UNSPSC classification code.
    #[serde(
        rename = "UNSPSC",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub classification_code: Option<String>,
    /// Image URL, or empty when the product has no image.
    #[serde(
        rename = "imageurl",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    /// Decimal price as a string, e.g. `"10.00"`.
    #[serde(
        rename = "extendedprice",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<String>,
    /// Unit of measure.
    #[serde(default, deserialize_with = "text_field", skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,
    /// Remaining feed fields, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a product with only a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Default::default()
        }
    }

    /// Set the manufacturer part number.
    pub fn with_mfg_part_no(mut self, part_no: impl Into<String>) -> Self {
        self.mfg_part_no = Some(part_no.into());
        self
    }

    /// Set the manufacturer name.
    pub fn with_manufacturer(mut self, name: impl Into<String>) -> Self {
        self.manufacturer_name = Some(name.into());
        self
    }

    /// Set the vendor name.
    pub fn with_vendor(mut self, name: impl Into<String>) -> Self {
        self.vendor_name = Some(name.into());
        self
    }

    /// Set the long description.
    pub fn with_long_description(mut self, text: impl Into<String>) -> Self {
        self.long_description = Some(text.into());
        self
    }

    /// Set the image URL.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Description, or `""` when absent.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Manufacturer part number, or `""` when absent.
    pub fn mfg_part_no(&self) -> &str {
        self.mfg_part_no.as_deref().unwrap_or_default()
    }

    /// Manufacturer name, or `""` when absent.
    pub fn manufacturer_name(&self) -> &str {
        self.manufacturer_name.as_deref().unwrap_or_default()
    }

    /// Vendor name, or `""` when absent.
    pub fn vendor_name(&self) -> &str {
        self.vendor_name.as_deref().unwrap_or_default()
    }

    /// Long description, or `""` when absent.
    pub fn long_description(&self) -> &str {
        self.long_description.as_deref().unwrap_or_default()
    }

    /// Whether the product has a non-empty image URL.
    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

fn text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// A product annotated with its search score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "_score")]
    pub score: u32,
}

impl ScoredProduct {
    pub fn new(product: Product, score: u32) -> Self {
        Self { product, score }
    }
}

/// The catalog document stored under the products key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPayload {
    pub response: CatalogResponse,
}

/// Body of a [`CatalogPayload`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub data: Vec<Product>,
}

impl CatalogPayload {
    /// Wrap a product list in a successful payload.
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            response: CatalogResponse {
                status: Some("success".to_string()),
                description: None,
                data: products,
            },
        }
    }

    /// The products, in feed order.
    pub fn products(&self) -> &[Product] {
        &self.response.data
    }

    /// Consume the payload, keeping only the products.
    pub fn into_products(self) -> Vec<Product> {
        self.response.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"{
        "response": {
            "status": "success",
            "data": [
                {
                    "description": "Sample Product 1",
                    "mfgpartno": "SAMPLE001",
                    "pc_itempricecodeguid": "sample-001",
                    "uom": "EA",
                    "extendedprice": "10.00",
                    "imageurl": "",
                    "vendorpartno": "VENDOR001",
                    "vendorname": "Sample Vendor",
                    "longdescription": "This is a sample product for testing",
                    "vendorid": "123456",
                    "customerpartno": "CUST001",
                    "UNSPSC": "12345678",
                    "manufacturername": "Sample Manufacturer",
                    "expirydate": ""
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_feed_fields() {
        let payload: CatalogPayload = serde_json::from_str(FEED).unwrap();
        let product = &payload.products()[0];

        assert_eq!(product.description(), "Sample Product 1");
        assert_eq!(product.mfg_part_no(), "SAMPLE001");
        assert_eq!(product.classification_code.as_deref(), Some("12345678"));
        assert_eq!(product.price.as_deref(), Some("10.00"));
        assert!(!product.has_image());
        assert_eq!(product.extra["vendorid"], "123456");
    }

    #[test]
    fn test_round_trip_keeps_unknown_fields() {
        let payload: CatalogPayload = serde_json::from_str(FEED).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        let original: Value = serde_json::from_str(FEED).unwrap();
        assert_eq!(json, original);
    }

    #[test]
    fn test_loosely_typed_fields() {
        let feed = r#"{
            "response": {
                "data": [
                    {
                        "description": "Hex bolt",
                        "mfgpartno": 4412,
                        "extendedprice": 10.5,
                        "UNSPSC": 31161500,
                        "imageurl": null,
                        "uom": ["EA"],
                        "vendorid": 7
                    },
                    { "description": null }
                ]
            }
        }"#;
        let payload: CatalogPayload = serde_json::from_str(feed).unwrap();
        let bolt = &payload.products()[0];

        assert_eq!(bolt.mfg_part_no(), "4412");
        assert_eq!(bolt.price.as_deref(), Some("10.5"));
        assert_eq!(bolt.classification_code.as_deref(), Some("31161500"));
        assert_eq!(bolt.image_url, None);
        assert_eq!(bolt.uom, None);
        assert_eq!(bolt.extra["vendorid"], 7);
        assert_eq!(payload.products()[1].description(), "");
    }

    #[test]
    fn test_scored_product_flattens() {
        let scored = ScoredProduct::new(Product::new("Widget").with_mfg_part_no("W-1"), 2);
        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["description"], "Widget");
        assert_eq!(json["mfgpartno"], "W-1");
        assert_eq!(json["_score"], 2);

        let back: ScoredProduct = serde_json::from_value(json).unwrap();
        assert_eq!(back, scored);
    }
}
