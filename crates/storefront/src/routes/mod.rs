//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Full page (?category=all|{id})
//! GET  /health                 - Health check (registered in `app`)
//!
//! # Catalog (HTMX fragments)
//! GET  /catalog/{selection}    - Product grid + out-of-band sidebar refresh
//! GET  /plants/{id}            - Plant detail modal
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart panel
//! POST /cart/add               - Add one unit (form: id, name, price)
//! POST /cart/remove            - Remove line by index (form: index)
//! POST /checkout               - Simulated checkout, clears the cart
//!
//! # Donation
//! POST /donate                 - Validate the tree donation form
//! ```
//!
//! Fragments that carry a user notice render it out-of-band into `#notice`.

pub mod cart;
pub mod catalog;
pub mod donation;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl NoticeLevel {
    /// CSS modifier used by the notice partial.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Info => "alert-info",
            Self::Success => "alert-success",
            Self::Error => "alert-error",
        }
    }
}

/// A one-shot message shown above the page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeView {
    pub level: NoticeLevel,
    pub message: String,
}

impl NoticeView {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Full page
        .route("/", get(home::home))
        // Catalog fragments
        .route("/catalog/{selection}", get(catalog::grid))
        .route("/plants/{id}", get(catalog::plant_detail))
        // Cart fragments
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
        // Donation form
        .route("/donate", post(donation::donate))
}
