//! Remote catalog queries.
//!
//! # Usage
//!
//! ```bash
//! ge-cli catalog categories
//! ge-cli catalog plants --category 3
//! ge-cli catalog plant 7
//! ```

use green_earth_core::types::price::format_amount;
use green_earth_core::{CategorySelection, PlantId};
use green_earth_storefront::catalog::{CatalogClient, Category, NETWORK_ERROR_NOTICE, Plant};
use green_earth_storefront::config::StorefrontConfig;
use thiserror::Error;

/// Errors that can occur during catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    /// The catalog request failed; details are in the log.
    #[error("{}", NETWORK_ERROR_NOTICE)]
    Network,
}

/// List every category.
pub async fn categories(config: &StorefrontConfig) -> Result<(), CatalogCommandError> {
    let client = CatalogClient::new(&config.catalog);
    let categories = client
        .fetch_categories()
        .await
        .ok_or(CatalogCommandError::Network)?;

    tracing::info!(count = categories.len(), "Fetched categories");
    print_lines(categories.iter().map(category_line));
    Ok(())
}

/// List the plants for a selection (`None` or `all` lists every plant).
pub async fn plants(
    config: &StorefrontConfig,
    category: Option<&str>,
) -> Result<(), CatalogCommandError> {
    let selection = CategorySelection::from_optional(category);
    let client = CatalogClient::new(&config.catalog);
    let plants = client
        .fetch_plants(&selection)
        .await
        .ok_or(CatalogCommandError::Network)?;

    tracing::info!(count = plants.len(), selection = %selection, "Fetched plants");
    if plants.is_empty() {
        print_lines(["No plants found for this category.".to_string()]);
    } else {
        print_lines(plants.iter().map(plant_line));
    }
    Ok(())
}

/// Show one plant's details.
pub async fn plant(config: &StorefrontConfig, id: &str) -> Result<(), CatalogCommandError> {
    let client = CatalogClient::new(&config.catalog);
    let plant = client
        .fetch_plant_by_id(&PlantId::new(id))
        .await
        .ok_or(CatalogCommandError::Network)?;

    print_lines(plant_details(&plant));
    Ok(())
}

fn category_line(category: &Category) -> String {
    format!("{}\t{}", category.id, category.name)
}

fn plant_line(plant: &Plant) -> String {
    format!(
        "{}\t{}\t${}\t{}",
        plant.id_str(),
        plant.card_title(),
        format_amount(plant.price),
        plant.category
    )
}

fn plant_details(plant: &Plant) -> Vec<String> {
    let mut lines = vec![
        plant.display_name().to_string(),
        plant.description.clone(),
        format!("Category: {}", plant.category),
        format!("Price: ${}", format_amount(plant.price)),
    ];
    if let Some(origin) = &plant.origin {
        lines.push(format!("Origin: {origin}"));
    }
    if let Some(sun) = &plant.sun {
        lines.push(format!("Sun: {sun}"));
    }
    lines
}

#[allow(clippy::print_stdout)]
fn print_lines(lines: impl IntoIterator<Item = String>) {
    for line in lines {
        println!("{line}");
    }
}
