//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! tienda cart add 3
//! tienda cart remove 3
//! tienda cart clear --yes
//! ```

use std::io::BufRead;

use tienda_core::ProductId;
use tienda_storefront::models::Confirmation;
use tienda_storefront::services::{Intent, Screen};

use super::{CommandError, Profile};

/// Print the cart lines and total.
pub fn show(profile: &Profile) {
    let cart = profile.shop().cart();
    if cart.is_empty() {
        tracing::info!("Your cart is empty.");
        return;
    }

    for line in cart.lines() {
        tracing::info!(
            "#{:<4} {:<32} {:>3} x {:>10} = {:>10}",
            line.product.id.as_i32(),
            line.product.name,
            line.quantity,
            line.product.unit_price().to_string(),
            line.product.unit_price().times(line.quantity).to_string()
        );
    }
    tracing::info!("{} item(s), total {}", cart.item_count(), cart.total_price());
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns `CommandError::Rejected` if the product is not in the catalog.
pub fn add(profile: &mut Profile, id: ProductId) -> Result<(), CommandError> {
    profile.apply(Intent::AddToCart(id))?;
    Ok(())
}

/// Remove one unit of a product. Products not in the cart are ignored.
///
/// # Errors
///
/// Returns `CommandError::Storage` if the profile cannot be written.
pub fn remove(profile: &mut Profile, id: ProductId) -> Result<(), CommandError> {
    if profile.shop().cart().quantity_of(id) == 0 {
        tracing::info!("Product {id} is not in your cart.");
    }
    profile.apply(Intent::RemoveFromCart(id))?;
    Ok(())
}

/// Empty the cart, asking on stdin unless `yes` is set.
///
/// # Errors
///
/// Returns `CommandError::Prompt` if stdin cannot be read, or
/// `CommandError::Storage` if the profile cannot be written.
pub fn clear(profile: &mut Profile, yes: bool) -> Result<(), CommandError> {
    let transition = profile.apply(Intent::RequestClearCart)?;
    if transition.screen != Screen::ConfirmClear {
        return Ok(());
    }

    let confirmation = if yes {
        Confirmation::Confirmed
    } else {
        tracing::info!("Empty your cart? [y/N]");
        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Confirmation::from_answer(&answer)
    };

    if confirmation == Confirmation::Declined {
        tracing::info!("Cart kept.");
    }
    profile.apply(Intent::ClearCart(confirmation))?;
    Ok(())
}
