//! Normalized catalog records.
//!
//! The remote API's field names vary between endpoints; these types hold the
//! values after fallback resolution (see `conversions`).

use green_earth_core::{CategoryId, PlantId, Price};
use rust_decimal::Decimal;
use serde::Serialize;

/// Maximum characters of blurb shown on a product card.
pub const CARD_BLURB_CHARS: usize = 120;

/// Image used when a plant record has none.
pub const PLACEHOLDER_IMAGE: &str =
    "https://img.daisyui.com/images/stock/photo-1606107557195-0e29a4b5b4aa.webp";

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// May be empty when the API omits every id field.
    pub id: CategoryId,
    pub name: String,
}

/// A plant product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plant {
    /// `None` when the record carries no usable id.
    pub id: Option<PlantId>,
    /// `None` when the record carries no usable name.
    pub name: Option<String>,
    pub image: String,
    /// Short text for the product card (untruncated).
    pub summary: String,
    /// Long text for the detail view.
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub origin: Option<String>,
    pub sun: Option<String>,
}

impl Plant {
    /// Heading used on product cards.
    #[must_use]
    pub fn card_title(&self) -> &str {
        self.name.as_deref().unwrap_or("Plant Name")
    }

    /// Name used in the detail view, alt text and the cart.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Plant")
    }

    /// Card blurb, cut to [`CARD_BLURB_CHARS`] characters with a trailing `...`.
    #[must_use]
    pub fn card_blurb(&self) -> String {
        if self.summary.chars().count() > CARD_BLURB_CHARS {
            let cut: String = self.summary.chars().take(CARD_BLURB_CHARS).collect();
            format!("{cut}...")
        } else {
            self.summary.clone()
        }
    }

    /// The id as sent with add-to-cart forms (empty when unknown).
    #[must_use]
    pub fn id_str(&self) -> &str {
        self.id.as_ref().map_or("", PlantId::as_str)
    }

    /// Price with currency for display.
    #[must_use]
    pub const fn display_price(&self) -> Price {
        Price::usd(self.price)
    }
}
