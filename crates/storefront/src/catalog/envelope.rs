//! Shape-tolerant extraction of payloads from catalog API envelopes.
//!
//! The catalog API wraps its payload inconsistently: sometimes under `data`,
//! sometimes under `data.data`, sometimes under a named collection, and the
//! live service puts lists at the top level (`{"categories": [...]}`).
//! Extraction is an ordered list of pure strategies; the first one that
//! yields an array wins.

use green_earth_core::types::id::json_id_string;
use serde_json::Value;

/// Which kind of record an endpoint returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Categories,
    Plants,
}

impl Collection {
    /// Field name of the collection inside an envelope.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Plants => "plants",
        }
    }

    /// Field name used by single-record responses.
    #[must_use]
    pub const fn singular_key(self) -> &'static str {
        match self {
            Self::Categories => "category",
            Self::Plants => "plant",
        }
    }

    /// Fields that may carry a record's id, in lookup order.
    #[must_use]
    pub const fn id_keys(self) -> &'static [&'static str] {
        match self {
            Self::Categories => &["id", "category_id", "_id"],
            Self::Plants => &["id", "_id", "plant_id"],
        }
    }
}

/// A pure list-extraction rule.
pub type ListStrategy = fn(&Value, Collection) -> Option<&[Value]>;

/// List-extraction rules, in precedence order.
pub const LIST_STRATEGIES: &[(&str, ListStrategy)] = &[
    ("primary", primary_array),
    ("nested_data", nested_data_array),
    ("named_collection", named_collection_array),
    ("first_array", first_top_level_array),
];

/// The primary payload: `body.data` unless it is absent or `null`, else the body.
#[must_use]
pub fn primary_payload(body: &Value) -> &Value {
    match body.get("data") {
        Some(data) if !data.is_null() => data,
        _ => body,
    }
}

/// Rule 1: the primary payload is itself an array.
#[must_use]
pub fn primary_array(body: &Value, _collection: Collection) -> Option<&[Value]> {
    primary_payload(body).as_array().map(Vec::as_slice)
}

/// Rule 2: an array one level deeper, at `body.data.data`.
#[must_use]
pub fn nested_data_array(body: &Value, _collection: Collection) -> Option<&[Value]> {
    body.get("data")?.get("data")?.as_array().map(Vec::as_slice)
}

/// Rule 3: an array under the named collection, at `body.data.<collection>`.
#[must_use]
pub fn named_collection_array(body: &Value, collection: Collection) -> Option<&[Value]> {
    body.get("data")?
        .get(collection.key())?
        .as_array()
        .map(Vec::as_slice)
}

/// Rule 4: the first array among the body's top-level values, in document order.
#[must_use]
pub fn first_top_level_array(body: &Value, _collection: Collection) -> Option<&[Value]> {
    body.as_object()?
        .values()
        .find_map(Value::as_array)
        .map(Vec::as_slice)
}

/// Apply [`LIST_STRATEGIES`] in order, returning the first match.
#[must_use]
pub fn find_list(body: &Value, collection: Collection) -> Option<&[Value]> {
    LIST_STRATEGIES.iter().find_map(|(name, strategy)| {
        let found = strategy(body, collection)?;
        tracing::trace!(strategy = name, len = found.len(), "Envelope list matched");
        Some(found)
    })
}

/// Extract the record list from a response body; empty if no rule matches.
///
/// ```
/// use green_earth_storefront::catalog::envelope::{extract_list, Collection};
/// use serde_json::json;
///
/// let body = json!({"data": {"data": [{"id": 1, "name": "Oak"}]}});
/// assert_eq!(extract_list(&body, Collection::Categories), &[json!({"id": 1, "name": "Oak"})]);
/// ```
#[must_use]
pub fn extract_list(body: &Value, collection: Collection) -> &[Value] {
    find_list(body, collection).unwrap_or(&[])
}

/// The id of a raw record, using the collection's id fields.
#[must_use]
pub fn record_id(record: &Value, collection: Collection) -> Option<String> {
    collection
        .id_keys()
        .iter()
        .find_map(|key| record.get(*key).and_then(json_id_string))
}

/// Pick the record matching `id` from a list, falling back to the first.
#[must_use]
pub fn select_by_id<'a>(list: &'a [Value], collection: Collection, id: &str) -> Option<&'a Value> {
    list.iter()
        .find(|record| record_id(record, collection).as_deref() == Some(id))
        .or_else(|| list.first())
}

/// Extract a single record from a detail response.
///
/// Lookup order:
/// 1. the primary payload, if it is an array (select by id, else first)
/// 2. `body.data` when it is an object; if it wraps a list under `data` or the
///    collection key, select from that list instead
/// 3. an object under the top-level collection key (`plants` / `plant`)
/// 4. the first top-level array (select by id, else first)
/// 5. the body itself, if it looks like a record (has an id or a name)
#[must_use]
pub fn extract_record<'a>(body: &'a Value, collection: Collection, id: &str) -> Option<&'a Value> {
    if let Some(list) = primary_array(body, collection) {
        return select_by_id(list, collection, id);
    }

    if let Some(data) = body.get("data").filter(|d| d.is_object()) {
        if let Some(list) =
            nested_data_array(body, collection).or_else(|| named_collection_array(body, collection))
        {
            return select_by_id(list, collection, id);
        }
        return Some(data);
    }

    if let Some(record) = [collection.key(), collection.singular_key()]
        .iter()
        .find_map(|key| body.get(*key).filter(|v| v.is_object()))
    {
        return Some(record);
    }

    if let Some(list) = first_top_level_array(body, collection) {
        return select_by_id(list, collection, id);
    }

    let looks_like_record =
        record_id(body, collection).is_some() || body.get("name").is_some_and(Value::is_string);
    looks_like_record.then_some(body)
}
