//! Product presented to participants at the start of a round.

use serde::{Deserialize, Serialize};

use super::Price;

/// A product with a hidden price.
///
/// Only `price` takes part in the game rules; the remaining fields are
/// presentation data forwarded to the chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Human-readable product name.
    pub name: String,

    /// The true price participants try to guess.
    pub price: Price,

    /// Optional picture shown with the product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Optional link to the product page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Product {
    /// Creates a product with no presentation links.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            price,
            image_url: None,
            url: None,
        }
    }

    /// The part of the product participants may see while guessing.
    #[must_use]
    pub fn showcase(&self) -> Showcase {
        Showcase {
            name: self.name.clone(),
            image_url: self.image_url.clone(),
            url: self.url.clone(),
        }
    }
}

/// A product without its price, safe to publish while a round is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Showcase {
    /// Human-readable product name.
    pub name: String,

    /// Optional picture shown with the product.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Optional link to the product page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
