//! Conversions from raw catalog JSON into [`Category`] and [`Plant`].
//!
//! Every field is resolved through an ordered list of candidate names; the
//! first present, non-empty value wins and missing fields fall back to
//! display defaults rather than failing.

use green_earth_core::types::price::{coerce_json_amount, normalize_amount};
use green_earth_core::{CategoryId, PlantId};
use rust_decimal::Decimal;
use serde_json::Value;

use super::envelope::{Collection, record_id};
use super::types::{Category, PLACEHOLDER_IMAGE, Plant};

/// Price shown when a plant has neither a price nor an id to derive one from.
const FALLBACK_PRICE: Decimal = Decimal::from_parts(999, 0, 0, false, 2);

/// Multiplier used to derive a demo price from a numeric plant id.
const ID_PRICE_MULTIPLIER: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Convert a list of raw category records, skipping non-objects.
#[must_use]
pub fn convert_categories(records: &[Value]) -> Vec<Category> {
    records.iter().filter_map(convert_category).collect()
}

/// Convert a list of raw plant records, skipping non-objects.
#[must_use]
pub fn convert_plants(records: &[Value]) -> Vec<Plant> {
    records.iter().filter_map(convert_plant).collect()
}

/// Convert one raw category record.
#[must_use]
pub fn convert_category(record: &Value) -> Option<Category> {
    if !record.is_object() {
        return None;
    }

    let id = record_id(record, Collection::Categories).unwrap_or_default();
    let name = first_text(record, &[&["name"], &["category_name"]])
        .unwrap_or_else(|| format!("Category {id}"));

    Some(Category {
        id: CategoryId::new(id),
        name,
    })
}

/// Convert one raw plant record.
#[must_use]
pub fn convert_plant(record: &Value) -> Option<Plant> {
    if !record.is_object() {
        return None;
    }

    Some(Plant {
        id: record_id(record, Collection::Plants).map(PlantId::new),
        name: first_text(record, &[&["name"], &["plant_name"]]),
        image: first_text(record, &[&["image"], &["thumbnail"]])
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        summary: first_text(
            record,
            &[&["description"], &["short_description"], &["care", "summary"]],
        )
        .unwrap_or_default(),
        description: first_text(
            record,
            &[&["description"], &["long_description"], &["care", "description"]],
        )
        .unwrap_or_else(|| "No description available.".to_string()),
        category: first_text(record, &[&["category"], &["category_name"]])
            .unwrap_or_else(|| "General".to_string()),
        price: resolve_price(record),
        origin: first_text(record, &[&["origin"]]),
        sun: first_text(record, &[&["sun"]]),
    })
}

/// Resolve a plant's price.
///
/// `price` wins whenever it is present and not `null`, even if it does not
/// parse (it then coerces to zero). Otherwise a truthy `price_usd`, otherwise
/// five times a truthy `id`, otherwise 9.99.
fn resolve_price(record: &Value) -> Decimal {
    if let Some(price) = record.get("price").filter(|v| !v.is_null()) {
        return coerce_json_amount(price);
    }
    if let Some(price) = record.get("price_usd").filter(|v| is_truthy(v)) {
        return coerce_json_amount(price);
    }
    if let Some(id) = record.get("id").filter(|v| is_truthy(v)) {
        return coerce_json_amount(id)
            .checked_mul(ID_PRICE_MULTIPLIER)
            .map_or(FALLBACK_PRICE, normalize_amount);
    }
    FALLBACK_PRICE
}

/// The first candidate path holding a non-empty string or a number.
fn first_text(record: &Value, paths: &[&[&str]]) -> Option<String> {
    paths.iter().find_map(|path| {
        let value = path
            .iter()
            .try_fold(record, |current, key| current.get(*key))?;
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    })
}

/// JSON truthiness: everything except `null`, `false`, `0`, `NaN` and `""`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
