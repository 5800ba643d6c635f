//! Catalog products.

use serde::{Deserialize, Serialize};

use lumiere_core::{Price, ProductId};

/// A product as returned by `GET /products`.
///
/// Cart items embed a full copy of the product taken at add-to-cart time,
/// so this type round-trips through client storage as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Price before promotion, shown struck through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl Product {
    /// Whether the product is marked down from its original price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.original_price.is_some_and(|original| original > self.price)
    }

    /// Whether at least one unit can be ordered.
    ///
    /// Products without stock tracking are always available.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock.is_none_or(|stock| stock > 0)
    }
}
