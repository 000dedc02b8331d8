//! Integration tests for Green Earth.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p green-earth-integration-tests
//! ```
//!
//! No external services are needed: each test spawns an in-process fixture
//! catalog API on an ephemeral loopback port and points the storefront at it.
//!
//! # Test Categories
//!
//! - `catalog_client` - Catalog client against fixture envelopes
//! - `cart_persistence` - File-backed cart store
//! - `storefront_routes` - Router driven with `tower::ServiceExt::oneshot`

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::routing::{MethodRouter, get};
use axum::{Json, Router};
use green_earth_storefront::config::StorefrontConfig;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// An axum server running in the background, usually a fixture catalog API.
pub struct FixtureApi {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl FixtureApi {
    /// Serve `router` (whose routes start with `/api`) on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the loopback listener cannot be bound.
    pub async fn spawn(router: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fixture listener");
        let addr = listener
            .local_addr()
            .expect("Fixture listener has no address");

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self { addr, handle }
    }

    /// Root URL of the server.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// API base URL to configure the catalog client with.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}/api", self.base_url())
    }

    /// Storefront configuration pointing at this fixture.
    #[must_use]
    pub fn config(&self, data_dir: &Path) -> StorefrontConfig {
        config_for(&self.api_base(), data_dir)
    }
}

impl Drop for FixtureApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Storefront configuration for an arbitrary API base.
///
/// # Panics
///
/// Panics if `api_base` is not a valid http(s) URL.
#[must_use]
pub fn config_for(api_base: &str, data_dir: &Path) -> StorefrontConfig {
    let api_base = api_base.to_string();
    let data_dir = data_dir.display().to_string();
    StorefrontConfig::from_lookup(|key| match key {
        "GREEN_EARTH_API_BASE" => Some(api_base.clone()),
        "GREEN_EARTH_DATA_DIR" => Some(data_dir.clone()),
        _ => None,
    })
    .expect("Fixture configuration is valid")
}

/// An API base on a port nothing listens on.
///
/// # Panics
///
/// Panics if the probe listener cannot be bound.
pub async fn unreachable_api_base() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Probe listener has no address");
    drop(listener);
    format!("http://{addr}/api")
}

/// GET route answering with a fixed JSON body.
pub fn json_route(body: Value) -> MethodRouter {
    get(move || {
        let body = body.clone();
        async move { Json(body) }
    })
}

/// GET route answering with a fixed JSON body after `delay`.
pub fn delayed_json_route(body: Value, delay: Duration) -> MethodRouter {
    get(move || {
        let body = body.clone();
        async move {
            tokio::time::sleep(delay).await;
            Json(body)
        }
    })
}

#[must_use]
pub fn mango() -> Value {
    json!({
        "id": 1,
        "image": "https://example.com/mango.png",
        "name": "Mango Tree",
        "description": "A fast-growing tropical tree that produces delicious, juicy mangoes.",
        "category": "Fruit Tree",
        "price": 500
    })
}

#[must_use]
pub fn guava() -> Value {
    json!({
        "id": 2,
        "image": "https://example.com/guava.png",
        "name": "Guava Tree",
        "description": "Hardy and fruitful.",
        "category": "Fruit Tree",
        "price": 350
    })
}

#[must_use]
pub fn jacaranda() -> Value {
    json!({
        "id": 3,
        "image": "https://example.com/jacaranda.png",
        "name": "Jacaranda",
        "description": "Purple blossoms in spring.",
        "category": "Flowering Tree",
        "price": 900
    })
}

/// Fixture matching the live API's envelope shapes.
#[must_use]
pub fn standard_catalog() -> Router {
    Router::new()
        .route(
            "/api/categories",
            json_route(json!({
                "status": true,
                "message": "successfully fetched categories",
                "categories": [
                    {"id": 1, "category_name": "Fruit Tree", "small_description": "Trees that bear fruit"},
                    {"id": 2, "category_name": "Flowering Tree", "small_description": "Blooms"}
                ]
            })),
        )
        .route(
            "/api/plants",
            json_route(json!({"status": true, "plants": [mango(), guava(), jacaranda()]})),
        )
        .route(
            "/api/category/1",
            json_route(json!({"status": true, "plants": [mango(), guava()]})),
        )
        .route(
            "/api/category/2",
            json_route(json!({"status": true, "plants": [jacaranda()]})),
        )
        .route(
            "/api/plant/1",
            json_route(json!({"status": true, "plants": mango()})),
        )
}
