//! Cart line items and the cart merge rules.
//!
//! A [`Cart`] holds at most one [`CartLineItem`] per id, in first-add order.
//! Adding an id that is already present bumps its quantity instead of
//! appending. Persistence lives outside this crate; the serde representation
//! here is the persisted format (a JSON array of line items).

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::id::LineItemId;
use super::price::{self, Price};

/// Name used when a line item arrives without one.
pub const DEFAULT_ITEM_NAME: &str = "Plant";

/// One cart entry: a distinct product id and its accumulated quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product id, compared as a string.
    pub id: LineItemId,
    /// Display name captured at add time.
    #[serde(default = "default_name")]
    pub name: String,
    /// Unit price, never negative.
    #[serde(with = "price::lenient", default)]
    pub price: Decimal,
    /// Quantity, at least 1.
    #[serde(default = "default_qty", deserialize_with = "deserialize_qty")]
    pub qty: u32,
}

impl CartLineItem {
    /// Create a line item with quantity 1.
    #[must_use]
    pub fn new(id: LineItemId, name: impl Into<String>, price: Decimal) -> Self {
        let name = name.into();
        Self {
            id,
            name: if name.trim().is_empty() {
                default_name()
            } else {
                name
            },
            price: price::normalize_amount(price),
            qty: 1,
        }
    }

    /// `price * qty`, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price
            .checked_mul(Decimal::from(self.qty))
            .unwrap_or(Decimal::MAX)
    }

    /// Unit price as a display price.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }
}

fn default_name() -> String {
    DEFAULT_ITEM_NAME.to_owned()
}

const fn default_qty() -> u32 {
    1
}

/// Read a quantity leniently: anything that is not a positive number becomes 1.
fn deserialize_qty<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let qty = match &value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 1.0)
                    // `as` saturates for out-of-range floats
                    .map(|f| {
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        let whole = f.floor() as u64;
                        whole
                    })
            })
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    };
    Ok(u32::try_from(qty).unwrap_or(u32::MAX).max(1))
}

/// An ordered collection of line items with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from raw line items, merging any duplicate ids.
    ///
    /// The first occurrence keeps its position, name and price; quantities of
    /// later duplicates are added to it.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartLineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if let Some(existing) = cart.items.iter_mut().find(|c| c.id == item.id) {
                existing.qty = existing.qty.saturating_add(item.qty);
            } else {
                cart.items.push(item);
            }
        }
        cart
    }

    /// Add one unit of a product.
    ///
    /// If a line item with the same id exists its quantity is incremented,
    /// otherwise a new line item with quantity 1 is appended. Returns the
    /// line item's quantity after the add.
    ///
    /// ```
    /// use green_earth_core::{Cart, LineItemId};
    /// use rust_decimal::Decimal;
    ///
    /// let mut cart = Cart::new();
    /// cart.add(LineItemId::new("p1"), "Fern", Decimal::new(999, 2));
    /// let qty = cart.add(LineItemId::new("p1"), "Fern", Decimal::new(999, 2));
    ///
    /// assert_eq!(qty, 2);
    /// assert_eq!(cart.len(), 1);
    /// assert_eq!(cart.total(), Decimal::new(1998, 2));
    /// ```
    pub fn add(&mut self, id: LineItemId, name: impl Into<String>, price: Decimal) -> u32 {
        if let Some(existing) = self.items.iter_mut().find(|c| c.id == id) {
            existing.qty = existing.qty.saturating_add(1);
            return existing.qty;
        }
        self.items.push(CartLineItem::new(id, name, price));
        1
    }

    /// Remove the line item at `index`, if it exists.
    pub fn remove(&mut self, index: usize) -> Option<CartLineItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price * qty`, rounded to cents and saturating at `Decimal::MAX`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(CartLineItem::line_total)
            .try_fold(Decimal::ZERO, Decimal::checked_add)
            .unwrap_or(Decimal::MAX)
            .round_dp(2)
    }

    /// Total quantity across all line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.qty))
    }

    /// Look up a line item by id.
    #[must_use]
    pub fn get(&self, id: &LineItemId) -> Option<&CartLineItem> {
        self.items.iter().find(|c| &c.id == id)
    }

    /// Line items in first-add order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<CartLineItem>> for Cart {
    fn from(items: Vec<CartLineItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}
