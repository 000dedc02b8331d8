//! Remote catalog API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`, one GET per call, no retry and no caching
//! - Responses are parsed as untyped JSON and normalized through the ordered
//!   extraction strategies in [`envelope`]
//! - Failures (transport, non-success status, malformed JSON) are logged and
//!   surface to callers as `None`, which the UI renders as an empty view plus
//!   a generic notice
//!
//! # Endpoints
//!
//! ```text
//! GET {api_base}/categories
//! GET {api_base}/plants
//! GET {api_base}/category/{id}
//! GET {api_base}/plant/{id}
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use green_earth_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog);
//!
//! let categories = client.fetch_categories().await.unwrap_or_default();
//! let plant = client.fetch_plant_by_id(&PlantId::new("1")).await;
//! ```

pub mod conversions;
pub mod envelope;
pub mod state;
pub mod types;

pub use state::{CatalogState, SelectionOutcome, SelectionTicket};
pub use types::{Category, Plant};

use std::sync::Arc;

use green_earth_core::{CategoryId, CategorySelection, PlantId};
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::CatalogConfig;
use crate::error::add_breadcrumb;

use conversions::{convert_categories, convert_plant, convert_plants};
use envelope::{Collection, extract_list, extract_record};

/// Notice shown to users whenever a catalog request fails.
pub const NETWORK_ERROR_NOTICE: &str = "Network error. Try again.";

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Unexpected status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot take path segments.
    #[error("Invalid endpoint for base URL {0}")]
    InvalidEndpoint(String),
}

/// Client for the remote plant catalog.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    api_base: Url,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Create a catalog client around an existing `reqwest` client.
    #[must_use]
    pub fn with_http_client(config: &CatalogConfig, client: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client,
                api_base: config.api_base.clone(),
            }),
        }
    }

    /// The configured API base URL.
    #[must_use]
    pub fn api_base(&self) -> &Url {
        &self.inner.api_base
    }

    /// Build the URL for an endpoint, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.inner.api_base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| CatalogError::InvalidEndpoint(self.inner.api_base.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Perform a GET and parse the body as JSON.
    #[instrument(skip(self), fields(url))]
    async fn get_json(&self, segments: &[&str]) -> Result<Value, CatalogError> {
        let url = self.endpoint(segments)?;
        tracing::Span::current().record("url", tracing::field::display(&url));

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(CatalogError::Status {
                status,
                body: response_text.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(body) => Ok(body),
            Err(e) => {
                tracing::debug!(
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Catalog response is not valid JSON"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }

    /// Best-effort GET: failures are logged and returned as `None`.
    async fn fetch(&self, segments: &[&str]) -> Option<Value> {
        match self.get_json(segments).await {
            Ok(body) => Some(body),
            Err(e) => {
                let endpoint = segments.join("/");
                let error = e.to_string();
                tracing::warn!(endpoint = %endpoint, error = %error, "Catalog request failed");
                add_breadcrumb(
                    "catalog",
                    "Catalog request failed",
                    Some(&[("endpoint", endpoint.as_str()), ("error", error.as_str())]),
                );
                None
            }
        }
    }

    /// Fetch every category.
    ///
    /// Returns `None` if the request failed.
    #[instrument(skip(self))]
    pub async fn fetch_categories(&self) -> Option<Vec<Category>> {
        let body = self.fetch(&["categories"]).await?;
        Some(convert_categories(extract_list(&body, Collection::Categories)))
    }

    /// Fetch every plant.
    ///
    /// Returns `None` if the request failed.
    #[instrument(skip(self))]
    pub async fn fetch_all_plants(&self) -> Option<Vec<Plant>> {
        let body = self.fetch(&["plants"]).await?;
        Some(convert_plants(extract_list(&body, Collection::Plants)))
    }

    /// Fetch the plants of one category.
    ///
    /// Returns `None` if the request failed.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn fetch_plants_by_category(&self, id: &CategoryId) -> Option<Vec<Plant>> {
        let body = self.fetch(&["category", id.as_str()]).await?;
        Some(convert_plants(extract_list(&body, Collection::Plants)))
    }

    /// Fetch the plants for a selection (`All` uses the all-plants endpoint).
    pub async fn fetch_plants(&self, selection: &CategorySelection) -> Option<Vec<Plant>> {
        match selection {
            CategorySelection::All => self.fetch_all_plants().await,
            CategorySelection::Category(id) => self.fetch_plants_by_category(id).await,
        }
    }

    /// Fetch a single plant.
    ///
    /// If the response carries a list, the entry whose id matches `id` is
    /// used, falling back to the first entry. Returns `None` if the request
    /// failed or no record could be found.
    #[instrument(skip(self), fields(plant_id = %id))]
    pub async fn fetch_plant_by_id(&self, id: &PlantId) -> Option<Plant> {
        let body = self.fetch(&["plant", id.as_str()]).await?;
        let plant = extract_record(&body, Collection::Plants, id.as_str()).and_then(convert_plant);
        if plant.is_none() {
            tracing::warn!("Plant detail response contained no record");
        }
        plant
    }
}
