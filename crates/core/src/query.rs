//! Listing filter over a fetched product list.

use crate::{Category, Favorites, Product};

/// The two listing predicates, applied in conjunction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Category,
    /// Live search text, matched case-insensitively against product titles.
    pub search: String,
}

impl ProductQuery {
    #[must_use]
    pub fn new(category: Category, search: impl Into<String>) -> Self {
        Self {
            category,
            search: search.into(),
        }
    }

    /// Whether `product` passes both the search and the category predicate.
    #[must_use]
    pub fn matches(&self, product: &Product, favorites: &Favorites) -> bool {
        let needle = self.search.to_lowercase();
        product.title.to_lowercase().contains(&needle)
            && self.category.matches(product, favorites)
    }

    /// Products passing the query, in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product], favorites: &Favorites) -> Vec<&'a Product> {
        products
            .iter()
            .filter(|product| self.matches(product, favorites))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Price, ProductId, Rating};

    fn product(id: i32, title: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_cents(1000),
            category: category.to_string(),
            image: String::new(),
            description: String::new(),
            rating: Rating {
                rate: 3.0,
                count: 2,
            },
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Mens Cotton Jacket", "men's clothing"),
            product(2, "Solid Gold Petite Micropave", "jewelery"),
            product(3, "WD 2TB Elements Portable Hard Drive", "electronics"),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_category_matching_one_item() {
        let products = catalog();
        let query = ProductQuery::new(Category::Jewelery, "");
        assert_eq!(ids(&query.apply(&products, &Favorites::default())), vec![2]);
    }

    #[test]
    fn test_empty_search_returns_all() {
        let products = catalog();
        let query = ProductQuery::new(Category::All, "");
        assert_eq!(
            ids(&query.apply(&products, &Favorites::default())),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let products = catalog();
        let query = ProductQuery::new(Category::All, "jACKet");
        assert_eq!(ids(&query.apply(&products, &Favorites::default())), vec![1]);
        assert!(query.matches(&products[0], &Favorites::default()));
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let products = catalog();
        let mut favorites = Favorites::default();
        favorites.toggle(ProductId::new(3));
        favorites.toggle(ProductId::new(1));

        let query = ProductQuery::new(Category::Favorites, "drive");
        assert_eq!(ids(&query.apply(&products, &favorites)), vec![3]);

        let query = ProductQuery::new(Category::Electronics, "jacket");
        assert!(query.apply(&products, &favorites).is_empty());
    }

    #[test]
    fn test_favorites_with_empty_set_matches_nothing() {
        let products = catalog();
        let query = ProductQuery::new(Category::Favorites, "");
        assert!(query.apply(&products, &Favorites::default()).is_empty());
    }
}
