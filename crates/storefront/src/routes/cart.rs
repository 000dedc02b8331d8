//! Cart route handlers.
//!
//! Cart operations use HTMX: every mutation returns the re-rendered cart
//! panel (swapped into `#cart`) and fires `cart-updated` for the badge.
//! The cart itself lives in the process-wide [`CartStore`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse},
};
use green_earth_core::types::price::format_amount;
use serde::Deserialize;
use tracing::instrument;

use super::NoticeView;
use crate::cart::{CartStore, CheckoutOutcome};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// HTMX event fired after any cart mutation.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Name used when the add form omits one.
const DEFAULT_FORM_NAME: &str = "Plant";

/// Price used when the add form omits one.
const DEFAULT_FORM_PRICE: &str = "9.99";

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    /// Position in the cart, posted back by the remove button.
    pub index: usize,
    pub name: String,
    pub qty: u32,
    /// `price * qty`, two decimals.
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// `"0"` for an empty cart, otherwise two decimals.
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: "0".to_string(),
            item_count: 0,
        }
    }
}

impl From<&CartStore> for CartView {
    fn from(store: &CartStore) -> Self {
        if store.cart().is_empty() {
            return Self::empty();
        }

        Self {
            items: store
                .cart()
                .items()
                .iter()
                .enumerate()
                .map(|(index, item)| CartItemView {
                    index,
                    name: item.name.clone(),
                    qty: item.qty,
                    line_total: format_amount(item.line_total()),
                })
                .collect(),
            total: store.total_display(),
            item_count: store.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Default, Deserialize)]
pub struct AddToCartForm {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
}

/// Remove from cart form data.
///
/// The index is kept as text so that malformed values are ignored rather
/// than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct RemoveFromCartForm {
    pub index: Option<String>,
}

/// Cart panel fragment with an out-of-band notice.
#[derive(Template, WebTemplate)]
#[template(path = "fragments/cart.html")]
pub struct CartFragmentTemplate {
    pub cart: CartView,
    pub notice: Option<NoticeView>,
}

/// Render the cart panel with the `cart-updated` trigger.
fn updated(cart: CartView, notice: Option<NoticeView>) -> impl IntoResponse {
    (
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        CartFragmentTemplate { cart, notice },
    )
}

/// Display the cart panel (HTMX).
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    CartFragmentTemplate {
        cart: CartView::from(&*state.cart()),
        notice: None,
    }
}

/// Add one unit of a plant to the cart (HTMX).
///
/// Missing fields fall back to name `Plant` and price `9.99`; a missing id
/// gets a placeholder.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<impl IntoResponse> {
    let id = form.id.unwrap_or_default();
    let name = form.name.unwrap_or_else(|| DEFAULT_FORM_NAME.to_string());
    let price = form.price.unwrap_or_else(|| DEFAULT_FORM_PRICE.to_string());

    let cart = {
        let mut store = state.cart();
        let stored_id = store.add(&id, &name, &price)?;
        add_breadcrumb("cart", "Added to cart", Some(&[("id", stored_id.as_str())]));
        CartView::from(&*store)
    };

    Ok(updated(cart, None))
}

/// Remove a cart line by index (HTMX).
///
/// A missing, non-integer or out-of-range index leaves the cart unchanged.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<impl IntoResponse> {
    let index = form
        .index
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i64>().ok());

    let cart = {
        let mut store = state.cart();
        if let Some(index) = index {
            store.remove(index)?;
        }
        CartView::from(&*store)
    };

    Ok(updated(cart, None))
}

/// Simulated checkout (HTMX).
///
/// An empty cart only shows a notice; otherwise the total is confirmed and
/// the cart is cleared.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let (outcome, cart) = {
        let mut store = state.cart();
        let outcome = store.checkout()?;
        (outcome, CartView::from(&*store))
    };

    let notice = match outcome {
        CheckoutOutcome::EmptyCart => NoticeView::info(outcome.message()),
        CheckoutOutcome::Completed { total } => {
            add_breadcrumb(
                "cart",
                "Checkout completed",
                Some(&[("total", format_amount(total).as_str())]),
            );
            NoticeView::success(outcome.message())
        }
    };

    Ok(updated(cart, Some(notice)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cart::MemoryStore;
    use std::sync::Arc;

    fn store() -> CartStore {
        CartStore::load(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from(&store());
        assert!(view.items.is_empty());
        assert_eq!(view.total, "0");
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_cart_view_lines() {
        let mut store = store();
        store.add("p1", "Fern", "9.99").unwrap();
        store.add("p1", "Fern", "9.99").unwrap();
        store.add("p2", "Oak", "12").unwrap();

        let view = CartView::from(&store);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[1].index, 1);
        assert_eq!(view.items[0].qty, 2);
        assert_eq!(view.items[0].line_total, "19.98");
        assert_eq!(view.total, "31.98");
        assert_eq!(view.item_count, 3);
    }

    #[test]
    fn test_cart_fragment_renders() {
        let html = CartFragmentTemplate {
            cart: CartView::empty(),
            notice: Some(NoticeView::info("Cart is empty. Add some trees first 🌱")),
        }
        .render()
        .unwrap();

        assert!(html.contains("Cart is empty"));
        assert!(html.contains("Add some trees first"));
    }
}
