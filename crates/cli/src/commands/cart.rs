//! Local cart management.
//!
//! Operates on the same persisted slot as the storefront, so run it while
//! the server is stopped: the server only reads the slot at startup.

use std::sync::Arc;

use green_earth_core::types::price::format_amount;
use green_earth_storefront::cart::{CartStore, FileStore, StorageError};
use green_earth_storefront::config::StorefrontConfig;

/// Open the cart stored in the configured data directory.
pub fn open(config: &StorefrontConfig) -> CartStore {
    tracing::debug!(data_dir = %config.data_dir.display(), "Opening cart");
    CartStore::load(Arc::new(FileStore::new(config.data_dir.clone())))
}

/// Print the cart contents and total.
pub fn show(store: &CartStore) {
    print_lines(render(store));
}

/// Add one unit of a plant and print the cart.
pub fn add(store: &mut CartStore, id: &str, name: &str, price: &str) -> Result<(), StorageError> {
    let stored_id = store.add(id, name, price)?;
    tracing::info!(id = %stored_id, "Added to cart");
    show(store);
    Ok(())
}

/// Remove the line at `index` and print the cart.
pub fn remove(store: &mut CartStore, index: i64) -> Result<(), StorageError> {
    match store.remove(index)? {
        Some(item) => tracing::info!(name = %item.name, "Removed from cart"),
        None => tracing::warn!(index, "No cart line at this index; cart unchanged"),
    }
    show(store);
    Ok(())
}

/// Empty the cart.
pub fn clear(store: &mut CartStore) -> Result<(), StorageError> {
    store.clear()?;
    tracing::info!("Cart cleared");
    Ok(())
}

/// Simulated checkout.
pub fn checkout(store: &mut CartStore) -> Result<(), StorageError> {
    let outcome = store.checkout()?;
    print_lines([outcome.message()]);
    Ok(())
}

/// Cart as printable lines: one per item, then the total.
fn render(store: &CartStore) -> Vec<String> {
    let cart = store.cart();
    if cart.is_empty() {
        return vec!["Cart is empty".to_string(), "Total: $0".to_string()];
    }

    cart.items()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            format!(
                "{index}. {} x {}\t${}",
                item.name,
                item.qty,
                format_amount(item.line_total())
            )
        })
        .chain(std::iter::once(format!("Total: ${}", store.total_display())))
        .collect()
}

#[allow(clippy::print_stdout)]
fn print_lines(lines: impl IntoIterator<Item = String>) {
    for line in lines {
        println!("{line}");
    }
}
