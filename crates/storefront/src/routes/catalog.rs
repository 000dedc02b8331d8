//! Catalog route handlers: category selection and plant detail.
//!
//! Selecting a category returns the product grid (swapped into
//! `#product-grid`) plus an out-of-band refresh of the category sidebar.
//! When a newer selection has been made before this one's fetch finishes,
//! the handler answers `204 No Content` so HTMX leaves the page alone.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use green_earth_core::types::price::format_amount;
use green_earth_core::types::selection::ALL_SENTINEL;
use green_earth_core::{CategorySelection, PlantId};
use tracing::instrument;

use super::NoticeView;
use crate::catalog::state::{ensure_categories, load_selection};
use crate::catalog::{CatalogState, Category, NETWORK_ERROR_NOTICE, Plant, SelectionOutcome};
use crate::error::add_breadcrumb;
use crate::state::AppState;

/// HTMX event that opens the plant detail dialog.
pub const OPEN_MODAL_EVENT: &str = "open-modal";

/// Category button data for templates.
#[derive(Clone)]
pub struct CategoryView {
    pub name: String,
    /// Fragment URL that selects this category.
    pub url: String,
    pub active: bool,
}

impl CategoryView {
    /// The leading "All" button.
    fn all(active: bool) -> Self {
        Self {
            name: "All".to_string(),
            url: selection_url(ALL_SENTINEL),
            active,
        }
    }

    fn from_category(category: &Category, state: &CatalogState) -> Self {
        Self {
            name: category.name.clone(),
            url: selection_url(category.id.as_str()),
            active: state.is_active(&category.id),
        }
    }
}

/// Sidebar buttons for the current state: "All" first, then each category.
#[must_use]
pub fn category_views(state: &CatalogState) -> Vec<CategoryView> {
    std::iter::once(CategoryView::all(state.selected().is_all()))
        .chain(
            state
                .categories()
                .iter()
                .map(|c| CategoryView::from_category(c, state)),
        )
        .collect()
}

/// Product card data for templates.
#[derive(Clone)]
pub struct PlantCardView {
    /// Sent with add-to-cart; empty when the record has no id.
    pub id: String,
    pub title: String,
    /// Name stored in the cart.
    pub cart_name: String,
    pub blurb: String,
    pub image: String,
    pub category: String,
    /// Two-decimal price without currency symbol.
    pub price: String,
    /// Detail fragment URL, absent when the record has no id.
    pub detail_url: Option<String>,
}

impl From<&Plant> for PlantCardView {
    fn from(plant: &Plant) -> Self {
        Self {
            id: plant.id_str().to_string(),
            title: plant.card_title().to_string(),
            cart_name: plant.display_name().to_string(),
            blurb: plant.card_blurb(),
            image: plant.image.clone(),
            category: plant.category.clone(),
            price: format_amount(plant.price),
            detail_url: plant.id.as_ref().map(plant_url),
        }
    }
}

/// Plant detail data for the modal.
#[derive(Clone)]
pub struct PlantDetailView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub origin: Option<String>,
    pub sun: Option<String>,
}

impl From<&Plant> for PlantDetailView {
    fn from(plant: &Plant) -> Self {
        Self {
            id: plant.id_str().to_string(),
            name: plant.display_name().to_string(),
            image: plant.image.clone(),
            description: plant.description.clone(),
            category: plant.category.clone(),
            price: format_amount(plant.price),
            origin: plant.origin.clone(),
            sun: plant.sun.clone(),
        }
    }
}

/// URL of the grid fragment for a selection parameter.
#[must_use]
pub fn selection_url(param: &str) -> String {
    format!("/catalog/{}", urlencoding::encode(param))
}

/// URL of the detail fragment for a plant.
#[must_use]
pub fn plant_url(id: &PlantId) -> String {
    format!("/plants/{}", urlencoding::encode(id.as_str()))
}

/// Product grid fragment with out-of-band sidebar and notice.
#[derive(Template, WebTemplate)]
#[template(path = "fragments/catalog.html")]
pub struct CatalogFragmentTemplate {
    pub categories: Vec<CategoryView>,
    pub plants: Vec<PlantCardView>,
    pub notice: Option<NoticeView>,
}

/// Plant detail modal fragment.
#[derive(Template, WebTemplate)]
#[template(path = "fragments/plant_modal.html")]
pub struct PlantModalTemplate {
    pub plant: Option<PlantDetailView>,
    pub notice: Option<NoticeView>,
}

/// Select a category and render its plants (HTMX).
#[instrument(skip(state))]
pub async fn grid(State(state): State<AppState>, Path(selection): Path<String>) -> Response {
    let selection = CategorySelection::parse(&selection);
    add_breadcrumb(
        "catalog",
        "Selected category",
        Some(&[("selection", selection.as_param())]),
    );

    let categories_ok = ensure_categories(state.catalog(), state.catalog_state()).await;
    let outcome = load_selection(state.catalog(), state.catalog_state(), selection).await;

    let failed = match outcome {
        SelectionOutcome::Superseded => return StatusCode::NO_CONTENT.into_response(),
        SelectionOutcome::Applied { failed } => failed || !categories_ok,
    };

    let catalog = state.lock_catalog_state();
    CatalogFragmentTemplate {
        categories: category_views(&catalog),
        plants: catalog.plants().iter().map(PlantCardView::from).collect(),
        notice: failed.then(|| NoticeView::error(NETWORK_ERROR_NOTICE)),
    }
    .into_response()
}

/// Fetch one plant and render the detail modal (HTMX).
///
/// On success the response triggers [`OPEN_MODAL_EVENT`]; on failure only
/// the notice is shown.
#[instrument(skip(state))]
pub async fn plant_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = PlantId::new(id);

    match state.catalog().fetch_plant_by_id(&id).await {
        Some(plant) => (
            AppendHeaders([("HX-Trigger", OPEN_MODAL_EVENT)]),
            PlantModalTemplate {
                plant: Some(PlantDetailView::from(&plant)),
                notice: None,
            },
        )
            .into_response(),
        None => PlantModalTemplate {
            plant: None,
            notice: Some(NoticeView::error(NETWORK_ERROR_NOTICE)),
        }
        .into_response(),
    }
}
