//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use green_earth_core::CategorySelection;
use serde::Deserialize;
use tracing::instrument;

use super::NoticeView;
use super::cart::CartView;
use super::catalog::{CategoryView, PlantCardView, category_views};
use super::donation::DonationForm;
use crate::catalog::state::{ensure_categories, load_selection};
use crate::catalog::{NETWORK_ERROR_NOTICE, SelectionOutcome};
use crate::filters;
use crate::state::AppState;

/// Home page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    /// `all` or a category id; blank means `all`.
    pub category: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub categories: Vec<CategoryView>,
    pub plants: Vec<PlantCardView>,
    pub cart: CartView,
    pub donation: DonationForm,
    pub notice: Option<NoticeView>,
}

/// Display the full page.
///
/// Loads categories (if not yet loaded) and the plants for the requested
/// selection, then renders everything including the cart panel.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>, Query(query): Query<HomeQuery>) -> impl IntoResponse {
    let selection = CategorySelection::from_optional(query.category.as_deref());

    let categories_ok = ensure_categories(state.catalog(), state.catalog_state()).await;
    let failed = match load_selection(state.catalog(), state.catalog_state(), selection).await {
        SelectionOutcome::Applied { failed } => failed,
        // A concurrent selection won; render whatever it applied.
        SelectionOutcome::Superseded => false,
    };

    let cart = CartView::from(&*state.cart());
    let catalog = state.lock_catalog_state();

    HomeTemplate {
        categories: category_views(&catalog),
        plants: catalog.plants().iter().map(PlantCardView::from).collect(),
        cart,
        donation: DonationForm::default(),
        notice: (failed || !categories_ok).then(|| NoticeView::error(NETWORK_ERROR_NOTICE)),
    }
}
