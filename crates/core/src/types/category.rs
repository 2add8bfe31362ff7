//! Listing category filter values.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Product;
use crate::Favorites;

/// Error returned when a string is not a known category.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// The single active predicate narrowing the visible product set.
///
/// Four values name catalog categories. `All` matches every product and
/// `Favorites` matches products in the shopper's favorites collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "men's clothing")]
    MensClothing,
    #[serde(rename = "women's clothing")]
    WomensClothing,
    #[serde(rename = "electronics")]
    Electronics,
    #[serde(rename = "jewelery")]
    Jewelery,
    #[serde(rename = "favorites")]
    Favorites,
}

impl Category {
    /// Categories offered as navigation tabs, in display order.
    pub const TABS: [Self; 5] = [
        Self::All,
        Self::MensClothing,
        Self::WomensClothing,
        Self::Electronics,
        Self::Jewelery,
    ];

    /// Wire value, identical to the catalog's category string for the
    /// concrete categories.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::MensClothing => "men's clothing",
            Self::WomensClothing => "women's clothing",
            Self::Electronics => "electronics",
            Self::Jewelery => "jewelery",
            Self::Favorites => "favorites",
        }
    }

    /// Navigation label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::MensClothing => "Men",
            Self::WomensClothing => "Women",
            Self::Electronics => "Electronics",
            Self::Jewelery => "Jewelry",
            Self::Favorites => "Favorites",
        }
    }

    /// Whether `product` passes this category predicate.
    #[must_use]
    pub fn matches(self, product: &Product, favorites: &Favorites) -> bool {
        match self {
            Self::All => true,
            Self::Favorites => favorites.contains(product.id),
            concrete => product.category == concrete.as_str(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "men's clothing" => Ok(Self::MensClothing),
            "women's clothing" => Ok(Self::WomensClothing),
            "electronics" => Ok(Self::Electronics),
            "jewelery" => Ok(Self::Jewelery),
            "favorites" => Ok(Self::Favorites),
            other => Err(CategoryError(other.to_string())),
        }
    }
}
