//! Product listing.

use tienda_storefront::catalog::{Catalog, Product};

/// Print the catalog, or one category of it.
pub fn list(catalog: &Catalog, category: Option<&str>) {
    let products: Vec<&Product> = match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(category) => catalog.in_category(category).collect(),
        None => catalog.products().iter().collect(),
    };

    if products.is_empty() {
        let known = catalog.categories().join(", ");
        tracing::info!("No products found. Categories: {known}");
        return;
    }

    for product in products {
        tracing::info!(
            "#{:<4} {:<32} {:>10}  [{}]",
            product.id.as_i32(),
            product.name,
            product.unit_price().to_string(),
            product.category
        );
    }
}
