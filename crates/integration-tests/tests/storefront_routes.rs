//! Integration tests for the storefront router.
//!
//! The router is driven with `tower::ServiceExt::oneshot` against a fixture
//! catalog API and an in-memory cart slot.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use green_earth_integration_tests::{FixtureApi, config_for, standard_catalog, unreachable_api_base};
use green_earth_storefront::app;
use green_earth_storefront::cart::MemoryStore;
use green_earth_storefront::config::StorefrontConfig;
use green_earth_storefront::state::AppState;
use tower::ServiceExt;

fn storefront(config: StorefrontConfig) -> Router {
    app(AppState::with_storage(config, Arc::new(MemoryStore::new())))
}

async fn fixture_storefront() -> (FixtureApi, Router) {
    let api = FixtureApi::spawn(standard_catalog()).await;
    let router = storefront(api.config(std::path::Path::new("unused")));
    (api, router)
}

async fn get(router: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request");
    router.clone().oneshot(request).await.expect("infallible")
}

async fn post_form(router: &Router, uri: &str, form: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("valid request");
    router.clone().oneshot(request).await.expect("infallible")
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

fn hx_trigger(response: &Response) -> Option<&str> {
    response
        .headers()
        .get("HX-Trigger")
        .and_then(|v| v.to_str().ok())
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (_api, router) = fixture_storefront().await;
    let response = get(&router, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_home_renders_catalog_and_empty_cart() {
    let (_api, router) = fixture_storefront().await;
    let response = get(&router, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Mango Tree"));
    assert!(html.contains("Flowering Tree"));
    assert!(html.contains("Cart is empty"));
    assert!(!html.contains("Network error. Try again."));
}

#[tokio::test]
async fn test_home_with_catalog_offline_still_renders() {
    let config = config_for(&unreachable_api_base().await, std::path::Path::new("unused"));
    let router = storefront(config);
    let response = get(&router, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("No plants found for this category."));
    assert!(html.contains("Network error. Try again."));
}

// =============================================================================
// Catalog Fragments
// =============================================================================

#[tokio::test]
async fn test_category_fragment_highlights_selection() {
    let (_api, router) = fixture_storefront().await;
    let response = get(&router, "/catalog/2").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Jacaranda"));
    assert!(!html.contains("Mango Tree"));
    assert!(html.contains("category-btn active"));
    assert!(html.contains(r#"id="categories""#));
    assert!(html.contains(r#"hx-swap-oob="true""#));
}

#[tokio::test]
async fn test_failing_category_shows_empty_grid_and_notice() {
    let (_api, router) = fixture_storefront().await;
    let response = get(&router, "/catalog/99").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("No plants found for this category."));
    assert!(html.contains("Network error. Try again."));
}

#[tokio::test]
async fn test_plant_detail_opens_modal() {
    let (_api, router) = fixture_storefront().await;
    let response = get(&router, "/plants/1").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hx_trigger(&response), Some("open-modal"));
    let html = body_text(response).await;
    assert!(html.contains("Mango Tree"));
    assert!(html.contains("Fruit Tree"));
}

#[tokio::test]
async fn test_plant_detail_failure_shows_notice_without_modal() {
    let (_api, router) = fixture_storefront().await;
    let response = get(&router, "/plants/99").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(hx_trigger(&response).is_none());
    let html = body_text(response).await;
    assert!(html.contains("Network error. Try again."));
    assert!(!html.contains("modal-card"));
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_add_same_plant_twice_merges() {
    let (_api, router) = fixture_storefront().await;

    post_form(&router, "/cart/add", "id=p1&name=Fern&price=9.99").await;
    let response = post_form(&router, "/cart/add", "id=p1&name=Fern&price=9.99").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hx_trigger(&response), Some("cart-updated"));
    let html = body_text(response).await;
    assert!(html.contains("Fern x 2"));
    assert!(html.contains("19.98"));
    assert!(html.contains("2 trees"));
}

#[tokio::test]
async fn test_add_with_empty_form_uses_defaults() {
    let (_api, router) = fixture_storefront().await;
    let html = body_text(post_form(&router, "/cart/add", "").await).await;

    assert!(html.contains("Plant x 1"));
    assert!(html.contains("9.99"));
}

#[tokio::test]
async fn test_remove_ignores_bad_index_then_removes() {
    let (_api, router) = fixture_storefront().await;
    post_form(&router, "/cart/add", "id=p1&name=Fern&price=9.99").await;

    let html = body_text(post_form(&router, "/cart/remove", "index=abc").await).await;
    assert!(html.contains("Fern x 1"));

    let html = body_text(post_form(&router, "/cart/remove", "index=7").await).await;
    assert!(html.contains("Fern x 1"));

    let html = body_text(post_form(&router, "/cart/remove", "index=0").await).await;
    assert!(html.contains("Cart is empty"));
}

#[tokio::test]
async fn test_cart_panel_reflects_state() {
    let (_api, router) = fixture_storefront().await;
    post_form(&router, "/cart/add", "id=1&name=Mango%20Tree&price=500").await;

    let html = body_text(get(&router, "/cart").await).await;
    assert!(html.contains("Mango Tree x 1"));
    assert!(html.contains("500.00"));
}

#[tokio::test]
async fn test_extreme_and_precise_prices_render() {
    let (_api, router) = fixture_storefront().await;
    let cases = [
        ("79228162514264337593543950335", "2000000000.00"),
        ("1e30", "2000000000.00"),
        ("0.1234567890123456789", "0.24"),
        ("-1e30", "0.00"),
    ];

    for (price, line_total) in cases {
        let form = format!("id=big&name=Big&price={price}");
        post_form(&router, "/cart/remove", "index=0").await;
        post_form(&router, "/cart/add", &form).await;
        let response = post_form(&router, "/cart/add", &form).await;
        assert_eq!(response.status(), StatusCode::OK, "{price}");

        let html = body_text(get(&router, "/cart").await).await;
        assert!(html.contains("Big x 2"), "{price}");
        assert!(html.contains(line_total), "{price}: {html}");
    }
}

#[tokio::test]
async fn test_checkout_empty_cart() {
    let (_api, router) = fixture_storefront().await;
    let html = body_text(post_form(&router, "/checkout", "").await).await;

    assert!(html.contains("Cart is empty. Add some trees first"));
}

#[tokio::test]
async fn test_checkout_reports_total_and_clears() {
    let (_api, router) = fixture_storefront().await;
    post_form(&router, "/cart/add", "id=p1&name=Fern&price=9.99").await;
    post_form(&router, "/cart/add", "id=p1&name=Fern&price=9.99").await;

    let html = body_text(post_form(&router, "/checkout", "").await).await;
    assert!(html.contains("Thanks for supporting Green Earth! Your order total: $19.98"));
    assert!(html.contains("Cart is empty"));
}

// =============================================================================
// Donation
// =============================================================================

#[tokio::test]
async fn test_valid_donation_is_confirmed() {
    let (_api, router) = fixture_storefront().await;
    let response = post_form(&router, "/donate", "name=Ada&email=ada%40example.com&count=3").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Thank you Ada!"));
    assert!(html.contains("plant 3 tree(s)"));
    assert!(html.contains("ada@example.com"));
}

#[tokio::test]
async fn test_donation_count_accepts_fraction_and_exponent() {
    let (_api, router) = fixture_storefront().await;
    for (count, planted) in [("2.5", "plant 2.5 tree(s)"), ("1e3", "plant 1000 tree(s)")] {
        let form = format!("name=Ada&email=ada%40example.com&count={count}");
        let response = post_form(&router, "/donate", &form).await;

        assert_eq!(response.status(), StatusCode::OK, "{count}");
        assert!(body_text(response).await.contains(planted), "{count}");
    }

    let response = post_form(&router, "/donate", "name=Ada&email=ada%40example.com&count=0.5").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_invalid_donation_is_rejected() {
    let (_api, router) = fixture_storefront().await;
    let response = post_form(&router, "/donate", "name=Ada&email=not-an-email&count=2").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("Please fill valid details."));
    assert!(html.contains(r#"value="not-an-email""#));
}

// =============================================================================
// Served Over HTTP
// =============================================================================

#[tokio::test]
async fn test_served_storefront_round_trip_over_http() {
    let api = FixtureApi::spawn(standard_catalog()).await;
    let server = FixtureApi::spawn(storefront(api.config(std::path::Path::new("unused")))).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/cart/add", server.base_url()))
        .form(&[("id", "3"), ("name", "Jacaranda"), ("price", "900")])
        .send()
        .await
        .expect("add request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let page = client
        .get(format!("{}/?category=2", server.base_url()))
        .send()
        .await
        .expect("page request")
        .text()
        .await
        .expect("page body");
    assert!(page.contains("Jacaranda x 1"));
    assert!(page.contains("900.00"));
    assert!(page.contains("category-btn active"));
}
