//! Checkout command.
//!
//! Runs the whole flow in one go: enter checkout, submit the card details,
//! wait for the simulated gateway and record the outcome.

use tienda_core::Price;
use tienda_storefront::config::CheckoutConfig;
use tienda_storefront::services::checkout::{PaymentForm, PaymentSimulator};
use tienda_storefront::services::{Effect, Intent, Screen};

use super::{CommandError, Profile};

/// Pay for the cart.
///
/// # Errors
///
/// Returns `CommandError::SignInRequired` when nobody is signed in, and
/// `CommandError::Rejected` for an empty cart, an incomplete form or a
/// declined payment. A declined payment leaves the cart as it was.
pub async fn pay(
    profile: &mut Profile,
    config: &CheckoutConfig,
    name: String,
    card: String,
    expiry: String,
) -> Result<(), CommandError> {
    let transition = profile.apply(Intent::BeginCheckout)?;
    if transition.screen == Screen::AuthPrompt {
        return Err(CommandError::SignInRequired);
    }

    let transition = profile.apply(Intent::SubmitPayment(PaymentForm::new(name, card, expiry)))?;
    let Some(Effect::ProcessPayment(request)) = transition.effect else {
        return Ok(());
    };

    tracing::info!(
        "Charging {} to card ending {}...",
        Price::from_amount(request.amount),
        request.card_last4
    );
    let outcome = PaymentSimulator::new(config).process(&request).await;

    profile.apply(Intent::PaymentCompleted(outcome))?;
    Ok(())
}
