//! Integration tests for the remote catalog client.
//!
//! Each test serves fixture envelopes from an in-process axum server.

use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use green_earth_core::{CategoryId, CategorySelection, PlantId};
use green_earth_integration_tests::{
    FixtureApi, config_for, delayed_json_route, guava, jacaranda, json_route, mango,
    standard_catalog, unreachable_api_base,
};
use green_earth_storefront::catalog::state::{ensure_categories, load_selection};
use green_earth_storefront::catalog::{CatalogClient, CatalogState, SelectionOutcome};
use rust_decimal::Decimal;
use serde_json::json;

fn client_for(api: &FixtureApi) -> CatalogClient {
    CatalogClient::new(&api.config(std::path::Path::new("unused")).catalog)
}

// =============================================================================
// Live API Shapes
// =============================================================================

#[tokio::test]
async fn test_fetch_categories() {
    let api = FixtureApi::spawn(standard_catalog()).await;
    let categories = client_for(&api).fetch_categories().await.expect("categories");

    let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Fruit Tree", "Flowering Tree"]);
    assert_eq!(categories.first().map(|c| c.id.clone()), Some(CategoryId::new("1")));
}

#[tokio::test]
async fn test_fetch_all_plants() {
    let api = FixtureApi::spawn(standard_catalog()).await;
    let plants = client_for(&api).fetch_all_plants().await.expect("plants");

    assert_eq!(plants.len(), 3);
    let mango = plants.first().expect("first plant");
    assert_eq!(mango.card_title(), "Mango Tree");
    assert_eq!(mango.price, Decimal::new(500, 0));
}

#[tokio::test]
async fn test_fetch_plants_by_category() {
    let api = FixtureApi::spawn(standard_catalog()).await;
    let client = client_for(&api);

    let fruit = client
        .fetch_plants_by_category(&CategoryId::new("1"))
        .await
        .expect("fruit trees");
    assert_eq!(fruit.len(), 2);

    let flowering = client
        .fetch_plants(&CategorySelection::parse("2"))
        .await
        .expect("flowering trees");
    assert_eq!(flowering.len(), 1);
    assert_eq!(flowering.first().map(|p| p.display_name()), Some("Jacaranda"));
}

#[tokio::test]
async fn test_fetch_plant_by_id_object_envelope() {
    let api = FixtureApi::spawn(standard_catalog()).await;
    let plant = client_for(&api)
        .fetch_plant_by_id(&PlantId::new("1"))
        .await
        .expect("plant detail");

    assert_eq!(plant.display_name(), "Mango Tree");
    assert_eq!(plant.category, "Fruit Tree");
}

// =============================================================================
// Alternate Envelopes
// =============================================================================

#[tokio::test]
async fn test_nested_data_envelope() {
    let router = Router::new().route(
        "/api/plants",
        json_route(json!({"data": {"data": [mango(), guava()]}})),
    );
    let api = FixtureApi::spawn(router).await;

    let plants = client_for(&api).fetch_all_plants().await.expect("plants");
    assert_eq!(plants.len(), 2);
}

#[tokio::test]
async fn test_named_collection_envelope() {
    let router = Router::new().route(
        "/api/categories",
        json_route(json!({"data": {"total": 1, "categories": [{"category_id": 9, "name": "Shrubs"}]}})),
    );
    let api = FixtureApi::spawn(router).await;

    let categories = client_for(&api).fetch_categories().await.expect("categories");
    assert_eq!(categories.len(), 1);
    assert_eq!(categories.first().map(|c| c.id.as_str()), Some("9"));
}

#[tokio::test]
async fn test_unrecognized_envelope_is_empty_not_failure() {
    let router = Router::new().route("/api/plants", json_route(json!({"status": true})));
    let api = FixtureApi::spawn(router).await;

    let plants = client_for(&api).fetch_all_plants().await;
    assert_eq!(plants.map(|p| p.len()), Some(0));
}

#[tokio::test]
async fn test_detail_list_selects_matching_id() {
    let router = Router::new()
        .route(
            "/api/plant/2",
            json_route(json!({"data": [mango(), guava(), jacaranda()]})),
        )
        .route("/api/plant/42", json_route(json!({"data": [jacaranda(), mango()]})));
    let api = FixtureApi::spawn(router).await;
    let client = client_for(&api);

    let matched = client.fetch_plant_by_id(&PlantId::new("2")).await.expect("plant 2");
    assert_eq!(matched.display_name(), "Guava Tree");

    let fallback = client.fetch_plant_by_id(&PlantId::new("42")).await.expect("first plant");
    assert_eq!(fallback.display_name(), "Jacaranda");
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_non_success_status_is_absent() {
    let router = Router::new().route(
        "/api/plants",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let api = FixtureApi::spawn(router).await;

    assert!(client_for(&api).fetch_all_plants().await.is_none());
}

#[tokio::test]
async fn test_missing_endpoint_is_absent() {
    let api = FixtureApi::spawn(standard_catalog()).await;
    let client = client_for(&api);

    assert!(
        client
            .fetch_plants_by_category(&CategoryId::new("99"))
            .await
            .is_none()
    );
    assert!(client.fetch_plant_by_id(&PlantId::new("99")).await.is_none());
}

#[tokio::test]
async fn test_malformed_json_is_absent() {
    let router = Router::new().route("/api/categories", get(|| async { "not json" }));
    let api = FixtureApi::spawn(router).await;

    assert!(client_for(&api).fetch_categories().await.is_none());
}

#[tokio::test]
async fn test_unreachable_api_is_absent() {
    let config = config_for(&unreachable_api_base().await, std::path::Path::new("unused"));
    let client = CatalogClient::new(&config.catalog);

    assert!(client.fetch_categories().await.is_none());
}

// =============================================================================
// Catalog State
// =============================================================================

#[tokio::test]
async fn test_last_selection_wins_over_slow_response() {
    let router = Router::new()
        .route(
            "/api/plants",
            delayed_json_route(
                json!({"plants": [mango(), guava(), jacaranda()]}),
                Duration::from_millis(300),
            ),
        )
        .route("/api/category/2", json_route(json!({"plants": [jacaranda()]})));
    let api = FixtureApi::spawn(router).await;
    let client = client_for(&api);
    let state = Mutex::new(CatalogState::new());

    let slow = load_selection(&client, &state, CategorySelection::All);
    let fast = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        load_selection(&client, &state, CategorySelection::parse("2")).await
    };
    let (slow_outcome, fast_outcome) = tokio::join!(slow, fast);

    assert_eq!(slow_outcome, SelectionOutcome::Superseded);
    assert_eq!(fast_outcome, SelectionOutcome::Applied { failed: false });

    let state = state.lock().expect("state lock");
    assert_eq!(state.selected(), &CategorySelection::parse("2"));
    let names: Vec<_> = state.plants().iter().map(|p| p.display_name()).collect();
    assert_eq!(names, ["Jacaranda"]);
}

#[tokio::test]
async fn test_failed_selection_applies_empty_set() {
    let api = FixtureApi::spawn(standard_catalog()).await;
    let client = client_for(&api);
    let state = Mutex::new(CatalogState::new());

    let outcome = load_selection(&client, &state, CategorySelection::All).await;
    assert_eq!(outcome, SelectionOutcome::Applied { failed: false });
    assert_eq!(state.lock().expect("state lock").plants().len(), 3);

    let outcome = load_selection(&client, &state, CategorySelection::parse("99")).await;
    assert_eq!(outcome, SelectionOutcome::Applied { failed: true });
    assert!(state.lock().expect("state lock").plants().is_empty());
}

#[tokio::test]
async fn test_categories_retry_until_loaded() {
    let config = config_for(&unreachable_api_base().await, std::path::Path::new("unused"));
    let offline = CatalogClient::new(&config.catalog);
    let state = Mutex::new(CatalogState::new());

    assert!(!ensure_categories(&offline, &state).await);
    assert!(!state.lock().expect("state lock").has_categories());

    let api = FixtureApi::spawn(standard_catalog()).await;
    assert!(ensure_categories(&client_for(&api), &state).await);
    assert_eq!(state.lock().expect("state lock").categories().len(), 2);
}
