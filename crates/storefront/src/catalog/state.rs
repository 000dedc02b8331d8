//! Catalog view state: active category, category list and displayed plants.
//!
//! Selecting a category hands out a [`SelectionTicket`]. The plants fetched
//! for that selection are applied only if no newer selection has been made
//! in the meantime, so the most recent selection always wins even when
//! responses arrive out of order.

use std::sync::{Mutex, PoisonError};

use green_earth_core::{CategoryId, CategorySelection};

use super::CatalogClient;
use super::types::{Category, Plant};

/// Proof of a selection, used to apply its fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTicket {
    generation: u64,
    selection: CategorySelection,
}

impl SelectionTicket {
    /// The selection this ticket was issued for.
    #[must_use]
    pub const fn selection(&self) -> &CategorySelection {
        &self.selection
    }
}

/// What happened to a selection's fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The result replaced the displayed plants. `failed` is set when the
    /// fetch failed and an empty set was applied.
    Applied { failed: bool },
    /// A newer selection was made; the result was discarded.
    Superseded,
}

/// Catalog view state.
#[derive(Debug, Default)]
pub struct CatalogState {
    selected: CategorySelection,
    generation: u64,
    categories: Option<Vec<Category>>,
    plants: Vec<Plant>,
}

impl CatalogState {
    /// Create an empty state with `All` selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `selection` active and issue a ticket for its fetch.
    ///
    /// Reselecting the current category issues a fresh ticket.
    pub fn select(&mut self, selection: CategorySelection) -> SelectionTicket {
        self.generation += 1;
        self.selected = selection.clone();
        SelectionTicket {
            generation: self.generation,
            selection,
        }
    }

    /// Whether `ticket` belongs to the latest selection.
    #[must_use]
    pub const fn is_current(&self, ticket: &SelectionTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Replace the displayed plants if `ticket` is still current.
    ///
    /// Returns `false` (and leaves state untouched) for a superseded ticket.
    pub fn complete(&mut self, ticket: &SelectionTicket, plants: Vec<Plant>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.plants = plants;
        true
    }

    /// The active selection.
    #[must_use]
    pub const fn selected(&self) -> &CategorySelection {
        &self.selected
    }

    /// Whether a category button should be highlighted.
    #[must_use]
    pub fn is_active(&self, id: &CategoryId) -> bool {
        self.selected.is_active(id)
    }

    /// Plants currently displayed.
    #[must_use]
    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    /// Loaded categories (empty until loaded).
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        self.categories.as_deref().unwrap_or(&[])
    }

    /// Whether a non-empty category list has been loaded.
    #[must_use]
    pub fn has_categories(&self) -> bool {
        self.categories.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Store the category list.
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = Some(categories);
    }
}

fn lock(state: &Mutex<CatalogState>) -> std::sync::MutexGuard<'_, CatalogState> {
    // Poisoning is ignored: the state is plain data
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Select a category, fetch its plants and apply them if still current.
///
/// The lock is released while the request is in flight.
pub async fn load_selection(
    client: &CatalogClient,
    state: &Mutex<CatalogState>,
    selection: CategorySelection,
) -> SelectionOutcome {
    let ticket = lock(state).select(selection);

    let fetched = client.fetch_plants(ticket.selection()).await;
    let failed = fetched.is_none();

    if lock(state).complete(&ticket, fetched.unwrap_or_default()) {
        SelectionOutcome::Applied { failed }
    } else {
        tracing::debug!(selection = %ticket.selection(), "Discarding superseded catalog result");
        SelectionOutcome::Superseded
    }
}

/// Fetch categories unless a non-empty list is already loaded.
///
/// Returns `false` if a fetch was needed and failed.
pub async fn ensure_categories(client: &CatalogClient, state: &Mutex<CatalogState>) -> bool {
    if lock(state).has_categories() {
        return true;
    }

    match client.fetch_categories().await {
        Some(categories) => {
            tracing::info!(count = categories.len(), "Loaded catalog categories");
            lock(state).set_categories(categories);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::PLACEHOLDER_IMAGE;
    use green_earth_core::PlantId;
    use rust_decimal::Decimal;

    fn plant(id: &str) -> Plant {
        Plant {
            id: Some(PlantId::new(id)),
            name: Some(format!("Plant {id}")),
            image: PLACEHOLDER_IMAGE.to_string(),
            summary: String::new(),
            description: String::new(),
            category: "General".to_string(),
            price: Decimal::ONE,
            origin: None,
            sun: None,
        }
    }

    #[test]
    fn test_initial_state_selects_all() {
        let state = CatalogState::new();
        assert!(state.selected().is_all());
        assert!(state.plants().is_empty());
        assert!(!state.has_categories());
    }

    #[test]
    fn test_last_selection_wins_when_responses_arrive_out_of_order() {
        let mut state = CatalogState::new();
        let all = state.select(CategorySelection::All);
        let two = state.select(CategorySelection::parse("2"));

        // Category 2 answers first, then the stale "all" response lands.
        assert!(state.complete(&two, vec![plant("c2")]));
        assert!(!state.complete(&all, vec![plant("a1"), plant("a2")]));

        assert_eq!(state.plants(), &[plant("c2")]);
        assert_eq!(state.selected(), &CategorySelection::parse("2"));
    }

    #[test]
    fn test_reselecting_issues_new_ticket() {
        let mut state = CatalogState::new();
        let first = state.select(CategorySelection::parse("1"));
        let second = state.select(CategorySelection::parse("1"));

        assert_ne!(first, second);
        assert!(!state.is_current(&first));
        assert!(state.is_current(&second));
    }

    #[test]
    fn test_active_highlighting() {
        let mut state = CatalogState::new();
        state.select(CategorySelection::parse("3"));
        assert!(state.is_active(&CategoryId::new("3")));
        assert!(!state.is_active(&CategoryId::new("4")));
    }

    #[test]
    fn test_empty_category_list_is_not_loaded() {
        let mut state = CatalogState::new();
        state.set_categories(Vec::new());
        assert!(!state.has_categories());
        state.set_categories(vec![Category {
            id: CategoryId::new("1"),
            name: "Fruit".to_string(),
        }]);
        assert!(state.has_categories());
        assert_eq!(state.categories().len(), 1);
    }
}
