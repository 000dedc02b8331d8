//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog and cart prices arrive as loosely typed values (numbers, numeric
//! strings, or garbage). [`coerce_amount`] and [`coerce_json_amount`] turn any
//! of those into a non-negative [`Decimal`], falling back to zero.
//!
//! Every coerced amount is normalized: whole cents, at most [`MAX_AMOUNT`].
//! Normalized amounts have few enough significant digits to survive the JSON
//! number round trip exactly, and cart arithmetic on them cannot overflow.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a US dollar price.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Amount rounded to cents, without a currency symbol (e.g., `"19.98"`).
    #[must_use]
    pub fn amount_string(&self) -> String {
        format_amount(self.amount)
    }

    /// Format for display (e.g., `"$19.98"`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{}", self.currency_code.symbol(), self.amount_string())
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes. The campaign sells in US dollars only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
        }
    }
}

/// Largest unit price accepted; larger inputs are clamped to it.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Clamp to `0..=MAX_AMOUNT` and round to cents.
///
/// ```
/// use green_earth_core::types::price::{MAX_AMOUNT, normalize_amount};
/// use rust_decimal::Decimal;
///
/// assert_eq!(normalize_amount(Decimal::new(19_986, 3)), Decimal::new(1999, 2));
/// assert_eq!(normalize_amount(Decimal::MAX), MAX_AMOUNT);
/// assert_eq!(normalize_amount(Decimal::NEGATIVE_ONE), Decimal::ZERO);
/// ```
#[must_use]
pub fn normalize_amount(amount: Decimal) -> Decimal {
    amount.clamp(Decimal::ZERO, MAX_AMOUNT).round_dp(2).normalize()
}

/// Round to two decimal places and render with exactly two fraction digits.
///
/// ```
/// use green_earth_core::types::price::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::new(1998, 2)), "19.98");
/// assert_eq!(format_amount(Decimal::new(5, 0)), "5.00");
/// ```
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Coerce a user- or API-supplied string into a normalized amount.
///
/// Blank input, unparseable input and negative values all become zero.
/// Values beyond the decimal range (`1e30`) clamp like any other large value.
///
/// ```
/// use green_earth_core::types::price::coerce_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(coerce_amount("9.99"), Decimal::new(999, 2));
/// assert_eq!(coerce_amount(" 12 "), Decimal::new(12, 0));
/// assert_eq!(coerce_amount("free"), Decimal::ZERO);
/// assert_eq!(coerce_amount("-3"), Decimal::ZERO);
/// ```
#[must_use]
pub fn coerce_amount(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    let parsed = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .or_else(|| decimal_from_float_text(trimmed));
    parsed.map_or(Decimal::ZERO, normalize_amount)
}

/// Last resort for numeric text `Decimal` cannot hold, such as `1e30` or a
/// fraction with more digits than it keeps.
fn decimal_from_float_text(raw: &str) -> Option<Decimal> {
    let value = raw.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if value >= MAX_AMOUNT.to_f64().unwrap_or(f64::MAX) {
        return Some(MAX_AMOUNT);
    }
    Decimal::from_f64(value)
}

/// Coerce a JSON value into a non-negative amount.
///
/// Numbers are read through their JSON text so `9.99` stays exactly `9.99`.
/// Booleans follow numeric conversion (`true` is 1); everything else is zero.
#[must_use]
pub fn coerce_json_amount(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => coerce_amount(&n.to_string()),
        Value::String(s) => coerce_amount(s),
        Value::Bool(true) => Decimal::ONE,
        _ => Decimal::ZERO,
    }
}

/// Serde adapter that stores amounts as JSON numbers and reads them leniently.
///
/// Amounts are normalized before writing, so the number text reads back as
/// the same decimal. Persisted carts written by older clients may hold prices
/// as strings; those are coerced rather than rejected.
pub mod lenient {
    use super::{Decimal, Deserialize, Deserializer, Serializer, ToPrimitive, Value, normalize_amount};

    /// Serialize an amount as a JSON number.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(normalize_amount(*amount).to_f64().unwrap_or(0.0))
    }

    /// Deserialize an amount from any JSON value, coercing invalid input to zero.
    ///
    /// # Errors
    ///
    /// Only fails if the input is not valid JSON.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(super::coerce_json_amount(&value))
    }
}
