//! Persisted shape of a [`Product`]
//!
//! Field names are camelCase. `price` is written as BSON Decimal128 so the
//! server compares prices numerically; string and plain numeric prices left
//! by older writers are still read.

use mongodb::bson::{oid::ObjectId, DateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::models::Product;
use crate::page::SortField;

/// Default collection name
pub const COLLECTION: &str = "products";

/// Document field names used in filters, sorts and indexes
pub mod fields {
    pub const ID: &str = "_id";
    pub const NAME: &str = "name";
    pub const CATEGORY: &str = "category";
    pub const PRICE: &str = "price";
    pub const STOCK: &str = "stock";
    pub const ACTIVE: &str = "active";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "decimal128"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Serde adapter between `Option<Decimal>` and a BSON Decimal128 field
mod decimal128 {
    use std::str::FromStr;

    use mongodb::bson::{Bson, Decimal128};
    use rust_decimal::Decimal;
    use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(price: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error> {
        price
            .map(|price| Decimal128::from_str(&price.to_string()))
            .transpose()
            .map_err(<S::Error as ser::Error>::custom)?
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
        let price = match Option::<Bson>::deserialize(deserializer)? {
            None | Some(Bson::Null) => return Ok(None),
            Some(Bson::Decimal128(price)) => parse(&price.to_string()),
            Some(Bson::String(price)) => parse(&price),
            Some(Bson::Int32(price)) => Ok(Decimal::from(price)),
            Some(Bson::Int64(price)) => Ok(Decimal::from(price)),
            Some(Bson::Double(price)) => Decimal::try_from(price),
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "expected a decimal price, found {:?}",
                    other.element_type()
                )))
            }
        };
        price.map(Some).map_err(de::Error::custom)
    }

    // Decimal128 renders very small or very large values in exponent form.
    fn parse(raw: &str) -> Result<Decimal, rust_decimal::Error> {
        Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw))
    }
}

/// Parse a hex product id into an ObjectId
pub fn parse_id(id: &str) -> Result<ObjectId, CatalogError> {
    ObjectId::parse_str(id).map_err(|_| CatalogError::InvalidId(id.to_string()))
}

/// Document field backing a sort key
pub fn sort_field_name(field: SortField) -> &'static str {
    match field {
        SortField::Name => fields::NAME,
        SortField::Price => fields::PRICE,
        SortField::Category => fields::CATEGORY,
        SortField::Stock => fields::STOCK,
        SortField::CreatedAt => fields::CREATED_AT,
        SortField::UpdatedAt => fields::UPDATED_AT,
    }
}

impl TryFrom<Product> for ProductDocument {
    type Error = CatalogError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        let id = product.id.as_deref().map(parse_id).transpose()?;

        Ok(Self {
            id,
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category,
            stock: product.stock,
            created_at: product.created_at.map(DateTime::from_chrono),
            updated_at: product.updated_at.map(DateTime::from_chrono),
            active: product.active,
        })
    }
}

impl From<ProductDocument> for Product {
    fn from(document: ProductDocument) -> Self {
        Self {
            id: document.id.map(|id| id.to_hex()),
            name: document.name,
            description: document.description,
            price: document.price,
            category: document.category,
            stock: document.stock,
            created_at: document.created_at.map(DateTime::to_chrono),
            updated_at: document.updated_at.map(DateTime::to_chrono),
            active: document.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc, Bson, Decimal128};
    use chrono::{TimeZone, Utc};

    fn full_product() -> Product {
        Product {
            id: Some("65f1c2a4b7e8d9f0a1b2c3d4".to_string()),
            name: Some("Espresso machine".to_string()),
            description: Some("15 bar pump".to_string()),
            price: Some(Decimal::new(24999, 2)),
            category: Some("kitchen".to_string()),
            stock: Some(7),
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
            updated_at: Some(Utc.timestamp_millis_opt(1_709_900_000_123).unwrap()),
            active: Some(true),
        }
    }

    #[test]
    fn test_mapping_preserves_every_field() {
        let product = full_product();

        let document = ProductDocument::try_from(product.clone()).unwrap();
        assert_eq!(
            document.id.map(|id| id.to_hex()).as_deref(),
            Some("65f1c2a4b7e8d9f0a1b2c3d4")
        );

        assert_eq!(Product::from(document), product);
    }

    #[test]
    fn test_mapping_truncates_timestamps_to_millis() {
        let precise = Utc.timestamp_nanos(1_709_900_000_123_456_789);
        let product = Product {
            updated_at: Some(precise),
            ..Default::default()
        };

        let restored = Product::from(ProductDocument::try_from(product).unwrap());

        assert_eq!(
            restored.updated_at,
            Some(Utc.timestamp_millis_opt(1_709_900_000_123).unwrap())
        );
    }

    #[test]
    fn test_invalid_id_is_rejected() {
        let product = Product {
            id: Some("not-an-object-id".to_string()),
            ..Default::default()
        };

        let err = ProductDocument::try_from(product).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidId(id) if id == "not-an-object-id"));
    }

    #[test]
    fn test_bson_shape() {
        let document = ProductDocument::try_from(full_product()).unwrap();
        let stored = bson::to_document(&document).unwrap();

        assert!(stored.get_object_id("_id").is_ok());
        assert_eq!(
            stored.get("price"),
            Some(&Bson::Decimal128("249.99".parse().unwrap()))
        );
        assert!(stored.get_datetime("createdAt").is_ok());
        assert!(stored.get_datetime("updatedAt").is_ok());
        assert!(stored.get_bool("active").unwrap());
        assert_eq!(stored.get_i32("stock").unwrap(), 7);
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let stored = bson::to_document(&ProductDocument::default()).unwrap();
        assert!(stored.is_empty());
    }

    #[test]
    fn test_reads_documents_with_extra_and_missing_fields() {
        let raw = doc! {
            "_id": ObjectId::parse_str("65f1c2a4b7e8d9f0a1b2c3d4").unwrap(),
            "name": "Kettle",
            "price": "19.90",
            "_class": "com.example.ProductDocument",
            "stock": Bson::Null,
        };

        let product = Product::from(bson::from_document::<ProductDocument>(raw).unwrap());

        assert_eq!(product.name.as_deref(), Some("Kettle"));
        assert_eq!(product.price, Some(Decimal::new(1990, 2)));
        assert_eq!(product.stock, None);
        assert_eq!(product.active, None);
    }

    #[test]
    fn test_price_is_stored_as_decimal128() {
        for raw in ["9.50", "10.00", "99.00", "100.00", "0.0000001", "79228162514264337593543950335"] {
            let price = Decimal::from_str_exact(raw).unwrap();
            let document = ProductDocument {
                price: Some(price),
                ..Default::default()
            };

            let stored = bson::to_document(&document).unwrap();
            let Some(Bson::Decimal128(stored_price)) = stored.get("price") else {
                panic!("price {raw} not stored as Decimal128: {stored:?}");
            };
            assert_eq!(stored_price, &raw.parse::<Decimal128>().unwrap());

            let restored: ProductDocument = bson::from_document(stored).unwrap();
            assert_eq!(restored.price, Some(price));
        }
    }

    #[test]
    fn test_reads_legacy_price_representations() {
        let read = |price: Bson| {
            bson::from_document::<ProductDocument>(doc! { "price": price })
                .unwrap()
                .price
        };

        assert_eq!(read(Bson::String("19.90".to_string())), Some(Decimal::new(1990, 2)));
        assert_eq!(read(Bson::Int32(12)), Some(Decimal::from(12)));
        assert_eq!(read(Bson::Int64(40)), Some(Decimal::from(40)));
        assert_eq!(read(Bson::Double(2.5)), Some(Decimal::new(25, 1)));
        assert_eq!(read(Bson::Null), None);
    }

    #[test]
    fn test_rejects_non_numeric_price() {
        let result = bson::from_document::<ProductDocument>(doc! { "price": true });
        assert!(result.is_err());

        let result = bson::from_document::<ProductDocument>(doc! { "price": "cheap" });
        assert!(result.is_err());
    }

    #[test]
    fn test_sort_field_names() {
        assert_eq!(sort_field_name(SortField::CreatedAt), "createdAt");
        assert_eq!(sort_field_name(SortField::Name), "name");
    }
}
