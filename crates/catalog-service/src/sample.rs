//! Built-in sample catalog used by `populate`.

use catalog_search::{CatalogPayload, CatalogResponse, Product};
use serde_json::{Map, Value};

fn sample_product(n: u32, price: &str, long_description: &str) -> Product {
    let mut extra = Map::new();
    extra.insert(
        "pc_itempricecodeguid".into(),
        Value::String(format!("sample-{n:03}")),
    );
    extra.insert(
        "pc_itempropertysetguid".into(),
        Value::String(format!("prop-{n:03}")),
    );
    extra.insert("vendorid".into(), Value::String("123456".into()));
    extra.insert("expirydate".into(), Value::String(String::new()));

    Product {
        description: Some(format!("Sample Product {n}")),
        long_description: Some(long_description.to_string()),
        mfg_part_no: Some(format!("SAMPLE{n:03}")),
        vendor_part_no: Some(format!("VENDOR{n:03}")),
        vendor_name: Some("Sample Vendor".into()),
        manufacturer_name: Some("Sample Manufacturer".into()),
        customer_part_no: Some(format!("CUST{n:03}")),
        classification_code: Some("12345678".into()),
        image_url: Some(String::new()),
        price: Some(price.to_string()),
        uom: Some("EA".into()),
        extra,
    }
}

/// Two placeholder products for an empty namespace.
pub fn sample_catalog() -> CatalogPayload {
    CatalogPayload {
        response: CatalogResponse {
            status: Some("success".into()),
            description: Some("Sample product data".into()),
            data: vec![
                sample_product(1, "10.00", "This is a sample product for testing"),
                sample_product(2, "20.00", "This is another sample product for testing"),
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog() {
        let catalog = sample_catalog();
        assert_eq!(catalog.products().len(), 2);

        let first = &catalog.products()[0];
        assert_eq!(first.mfg_part_no(), "SAMPLE001");
        assert!(!first.has_image());

        let value = serde_json::to_value(first).unwrap();
        assert_eq!(value["pc_itempricecodeguid"], "sample-001");
        assert_eq!(value["extendedprice"], "10.00");
        assert_eq!(value["UNSPSC"], "12345678");
    }
}
