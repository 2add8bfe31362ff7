//! Cart rows and the cart mutation rules.
//!
//! The cart is an ordered list of `(product, quantity)` rows. Adding a
//! product always appends a row, even when the product is already in the
//! cart; quantity edits and removals address every row carrying the
//! product's identifier.

use serde::{Deserialize, Serialize};

use crate::{Price, Product, ProductId};

/// Smallest quantity a cart row may hold.
pub const MIN_QUANTITY: u32 = 1;

/// Error returned when a quantity change is rejected.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// The requested quantity is below [`MIN_QUANTITY`].
    #[error("quantity must be at least {MIN_QUANTITY} (requested {requested})")]
    BelowMinimum { requested: i64 },
}

/// A product in the cart with its quantity.
///
/// Stored flattened, so a row is the catalog's product object plus a
/// `quantity` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Price of this row (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<CartItem>);

impl Cart {
    /// Append a row for `product` with quantity 1.
    ///
    /// Does not merge with an existing row for the same product.
    pub fn add(&mut self, product: Product) {
        self.0.push(CartItem {
            product,
            quantity: MIN_QUANTITY,
        });
    }

    /// Set the quantity of every row for `id`.
    ///
    /// Returns the number of rows updated.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::BelowMinimum` without touching the cart when
    /// `quantity` is below [`MIN_QUANTITY`]. A rejected change never removes
    /// the row.
    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) -> Result<usize, QuantityError> {
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q >= MIN_QUANTITY)
            .ok_or(QuantityError::BelowMinimum {
                requested: quantity,
            })?;

        let mut updated = 0;
        for item in self.0.iter_mut().filter(|item| item.product.id == id) {
            item.quantity = quantity;
            updated += 1;
        }
        Ok(updated)
    }

    /// Remove every row for `id`, returning how many were removed.
    pub fn remove(&mut self, id: ProductId) -> usize {
        let before = self.0.len();
        self.0.retain(|item| item.product.id != id);
        before - self.0.len()
    }

    /// Sum of `price * quantity` over all rows. Zero when empty.
    #[must_use]
    pub fn total(&self) -> Price {
        self.0.iter().map(CartItem::line_total).sum()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.0
    }

    /// Number of rows (not the sum of quantities).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Rating;

    fn product(id: i32, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents),
            category: "electronics".to_string(),
            image: format!("https://img.example/{id}.jpg"),
            description: String::new(),
            rating: Rating {
                rate: 4.5,
                count: 10,
            },
        }
    }

    fn cart_of(products: &[(i32, i64)]) -> Cart {
        let mut cart = Cart::default();
        for (id, cents) in products {
            cart.add(product(*id, *cents));
        }
        cart
    }

    #[test]
    fn test_add_twice_appends_two_rows() {
        let mut cart = Cart::default();
        cart.add(product(7, 999));
        cart.add(product(7, 999));

        assert_eq!(cart.len(), 2);
        assert!(cart.items().iter().all(|item| item.product.id == ProductId::new(7)));
        assert!(cart.items().iter().all(|item| item.quantity == 1));
    }

    #[test]
    fn test_quantity_below_one_is_rejected() {
        for requested in [0, -1, -50, i64::MIN] {
            let mut cart = cart_of(&[(1, 500), (2, 250)]);
            cart.set_quantity(ProductId::new(1), 3).unwrap();
            let before = cart.clone();

            let err = cart.set_quantity(ProductId::new(1), requested).unwrap_err();
            assert_eq!(err, QuantityError::BelowMinimum { requested });
            assert_eq!(cart, before);
        }
    }

    #[test]
    fn test_decrement_from_one_keeps_one() {
        let mut cart = cart_of(&[(4, 100)]);
        let current = i64::from(cart.items()[0].quantity);

        assert!(cart.set_quantity(ProductId::new(4), current - 1).is_err());
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_quantity_updates_every_row_with_id() {
        let mut cart = cart_of(&[(7, 999), (3, 100), (7, 999)]);
        assert_eq!(cart.set_quantity(ProductId::new(7), 4).unwrap(), 2);
        let quantities: Vec<u32> = cart.items().iter().map(|item| item.quantity).collect();
        assert_eq!(quantities, vec![4, 1, 4]);
    }

    #[test]
    fn test_quantity_for_absent_id_updates_nothing() {
        let mut cart = cart_of(&[(1, 100)]);
        assert_eq!(cart.set_quantity(ProductId::new(99), 2).unwrap(), 0);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_remove_leaves_others_unchanged() {
        let mut cart = cart_of(&[(1, 100), (2, 200), (3, 300)]);
        cart.set_quantity(ProductId::new(3), 5).unwrap();
        let expected: Vec<CartItem> = cart
            .items()
            .iter()
            .filter(|item| item.product.id != ProductId::new(2))
            .cloned()
            .collect();

        assert_eq!(cart.remove(ProductId::new(2)), 1);
        assert_eq!(cart.items(), expected.as_slice());
        assert_eq!(cart.remove(ProductId::new(2)), 0);
    }

    #[test]
    fn test_total_is_sum_of_line_totals() {
        let mut cart = cart_of(&[(1, 999), (2, 1050)]);
        cart.set_quantity(ProductId::new(1), 3).unwrap();
        assert_eq!(cart.total(), Price::from_cents(999 * 3 + 1050));
        assert_eq!(cart.total().display_rounded(), "$40.47");
    }

    #[test]
    fn test_empty_total_is_zero() {
        assert_eq!(Cart::default().total(), Price::ZERO);
    }

    #[test]
    fn test_row_is_flattened_product_with_quantity() {
        let cart = cart_of(&[(7, 999)]);
        let value = serde_json::to_value(&cart).unwrap();

        let row = &value[0];
        assert_eq!(row["id"], 7);
        assert_eq!(row["quantity"], 1);
        assert_eq!(row["price"], 9.99);
        assert_eq!(row["rating"]["count"], 10);

        let decoded: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, cart);
    }
}
