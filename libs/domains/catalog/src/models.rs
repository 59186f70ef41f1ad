use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{CatalogError, CatalogResult};

/// Product entity
///
/// Every attribute is optional so a product can be built from a partial
/// record, e.g. `Product { stock: Some(5), ..Default::default() }`. Stock
/// changes go through [`Product::reduce_stock`] and [`Product::increase_stock`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier (hex ObjectId); `None` until first save
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Exact monetary amount
    pub price: Option<Decimal>,
    pub category: Option<String>,
    /// Units on hand; `None` means the quantity is unknown
    pub stock: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub active: Option<bool>,
}

/// Input for creating a product
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Filters understood by [`crate::service::CatalogService::list_products`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductQuery {
    /// Exact category match
    pub category: Option<String>,
    /// Case-insensitive substring of the name
    pub name: Option<String>,
}

fn default_active() -> bool {
    true
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}

impl Product {
    /// Build an unsaved product; the store assigns `id` and timestamps.
    pub fn new(input: NewProduct) -> Self {
        Self {
            id: None,
            name: Some(input.name),
            description: input.description,
            price: Some(input.price),
            category: Some(input.category),
            stock: Some(input.stock),
            created_at: None,
            updated_at: None,
            active: Some(input.active),
        }
    }

    /// True only when the product is explicitly active and has known, positive stock.
    pub fn is_available(&self) -> bool {
        self.active == Some(true) && self.stock.is_some_and(|stock| stock > 0)
    }

    /// Remove `quantity` units from stock.
    ///
    /// Fails with [`CatalogError::InsufficientStock`] when stock is unknown
    /// or lower than `quantity`, and with [`CatalogError::InvalidQuantity`]
    /// when `quantity` is not positive. The product is untouched on error.
    pub fn reduce_stock(&mut self, quantity: i32) -> CatalogResult<()> {
        if quantity <= 0 {
            return Err(CatalogError::InvalidQuantity(quantity));
        }

        match self.stock {
            Some(stock) if stock >= quantity => {
                self.stock = Some(stock - quantity);
                self.touch();
                Ok(())
            }
            available => Err(CatalogError::InsufficientStock {
                available,
                requested: quantity,
            }),
        }
    }

    /// Add `quantity` units to stock.
    ///
    /// Does nothing when stock is unknown, `quantity` is not positive, or the
    /// sum would overflow. Returns whether stock changed.
    pub fn increase_stock(&mut self, quantity: i32) -> bool {
        if quantity <= 0 {
            return false;
        }

        match self.stock.and_then(|stock| stock.checked_add(quantity)) {
            Some(increased) => {
                self.stock = Some(increased);
                self.touch();
                true
            }
            None => false,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
