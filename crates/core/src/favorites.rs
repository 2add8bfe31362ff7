//! The shopper's favorites set.

use serde::{Deserialize, Serialize};

use crate::ProductId;

/// Ordered set of liked product identifiers.
///
/// Serialized as a plain JSON array of integers. Duplicates found in stored
/// data are dropped on load, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ProductId>")]
pub struct Favorites(Vec<ProductId>);

impl Favorites {
    /// Add `id` if absent, remove it if present.
    ///
    /// Returns whether `id` is a favorite afterwards.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        if let Some(pos) = self.0.iter().position(|fav| *fav == id) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(id);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.0.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Favorite identifiers in the order they were added.
    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.0
    }
}

impl From<Vec<ProductId>> for Favorites {
    fn from(ids: Vec<ProductId>) -> Self {
        let mut favorites = Self(Vec::with_capacity(ids.len()));
        for id in ids {
            if !favorites.contains(id) {
                favorites.0.push(id);
            }
        }
        favorites
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_follows_toggle_parity() {
        let id = ProductId::new(5);
        for toggles in 0..7 {
            let mut favorites = Favorites::default();
            for _ in 0..toggles {
                favorites.toggle(id);
            }
            assert_eq!(favorites.contains(id), toggles % 2 == 1, "after {toggles} toggles");
            assert!(favorites.len() <= 1);
        }
    }

    #[test]
    fn test_toggle_keeps_other_ids_in_order() {
        let mut favorites = Favorites::default();
        favorites.toggle(ProductId::new(1));
        favorites.toggle(ProductId::new(2));
        favorites.toggle(ProductId::new(3));
        assert!(!favorites.toggle(ProductId::new(2)));
        assert_eq!(favorites.ids(), &[ProductId::new(1), ProductId::new(3)]);
    }

    #[test]
    fn test_stored_duplicates_are_dropped() {
        let favorites: Favorites = serde_json::from_str("[4, 2, 4, 9, 2]").unwrap();
        assert_eq!(
            favorites.ids(),
            &[ProductId::new(4), ProductId::new(2), ProductId::new(9)]
        );
    }

    #[test]
    fn test_serializes_as_integer_array() {
        let mut favorites = Favorites::default();
        favorites.toggle(ProductId::new(3));
        favorites.toggle(ProductId::new(1));
        assert_eq!(serde_json::to_string(&favorites).unwrap(), "[3,1]");
    }
}
