//! Product data as served by the remote catalog.

use serde::{Deserialize, Serialize};

use super::{ProductId, Price};

/// A catalog product.
///
/// Immutable once fetched: the storefront only reads products and copies
/// them into cart rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// One of the catalog's category strings (see [`super::Category`]).
    pub category: String,
    /// Absolute image URL.
    pub image: String,
    pub description: String,
    pub rating: Rating,
}

/// Average review score and number of reviews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_catalog_shape() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(10995));
        assert_eq!(product.category, "men's clothing");
        assert_eq!(product.rating.count, 120);
    }
}
