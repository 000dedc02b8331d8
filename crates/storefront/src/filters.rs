//! Askama filters shared by the page and fragment templates.

#![allow(clippy::unnecessary_wraps)]

use std::borrow::Borrow;
use std::fmt::Display;

/// Footer year. Usage: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Stylesheet content hash from `build.rs`, used as a cache-busting query.
///
/// Usage: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Cart badge label: `1 tree`, `3 trees`.
///
/// Usage: `{{ cart.item_count|trees }}`
#[askama::filter_fn]
pub fn trees(count: impl Borrow<u32>, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(tree_label(*count.borrow()))
}

fn tree_label(count: u32) -> String {
    if count == 1 {
        "1 tree".to_string()
    } else {
        format!("{count} trees")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_label() {
        assert_eq!(tree_label(0), "0 trees");
        assert_eq!(tree_label(1), "1 tree");
        assert_eq!(tree_label(12), "12 trees");
    }
}
