//! Product lookup for new rounds.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;

use crate::domain::{Price, Product};
use crate::error::GameError;

/// Asynchronous source of products to guess.
#[async_trait]
pub trait ProductSource: Send + Sync + fmt::Debug {
    /// Returns the product for a new round.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ProductLookup`] when no product can be
    /// provided. The round is not started in that case.
    async fn fetch(&self) -> Result<Product, GameError>;
}

/// Picks a uniformly random product from a fixed catalog.
#[derive(Debug, Clone)]
pub struct CatalogProductSource {
    products: Vec<Product>,
}

impl CatalogProductSource {
    /// Creates a source over the given products.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Loads a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] if the file cannot be read or
    /// is not a JSON array of products with positive prices.
    pub fn from_json_file(path: &Path) -> Result<Self, GameError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            GameError::InvalidConfig(format!("cannot read catalog {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    /// Parses a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] on malformed JSON or
    /// non-positive prices.
    pub fn from_json(raw: &str) -> Result<Self, GameError> {
        let products: Vec<Product> = serde_json::from_str(raw)
            .map_err(|e| GameError::InvalidConfig(format!("invalid catalog: {e}")))?;
        Ok(Self::new(products))
    }

    /// A small catalog used when none is configured.
    #[must_use]
    pub fn builtin() -> Self {
        let entries: [(&str, i64, u32); 6] = [
            ("Stainless steel electric kettle 1.7L", 2_499, 2),
            ("Wireless noise-cancelling headphones", 19_990, 2),
            ("Cast iron skillet 28cm", 3_450, 2),
            ("Robot vacuum cleaner", 24_900, 2),
            ("Box of 12 smoked sausages", 899, 2),
            ("Espresso machine 15 bar", 12_999, 2),
        ];
        let products = entries
            .iter()
            .filter_map(|(name, mantissa, scale)| {
                Price::new(Decimal::new(*mantissa, *scale))
                    .ok()
                    .map(|price| Product::new(*name, price))
            })
            .collect();
        Self::new(products)
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl ProductSource for CatalogProductSource {
    async fn fetch(&self) -> Result<Product, GameError> {
        self.products
            .choose(&mut rand::rng())
            .cloned()
            .ok_or_else(|| GameError::ProductLookup("product catalog is empty".to_string()))
    }
}
