//! Checkout route handlers.
//!
//! The checkout stage is not kept between requests: every request re-enters
//! checkout from the shopper's current session and cart, so a signed-out
//! shopper is always sent to the auth prompt and an empty cart never reaches
//! payment.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use super::LayoutView;
use super::cart::CartView;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::ShopSession;
use crate::services::checkout::PaymentForm;
use crate::services::{Effect, Intent, Screen};
use crate::state::AppState;

/// Payment form data. Not `Debug`: it carries the raw card number.
#[derive(Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiry: String,
}

impl From<CheckoutForm> for PaymentForm {
    fn from(form: CheckoutForm) -> Self {
        Self::new(form.name, form.card_number, form.expiry)
    }
}

/// Payment form page.
#[derive(Template, WebTemplate)]
#[template(path = "pages/checkout.html")]
pub struct CheckoutTemplate {
    pub layout: LayoutView,
    pub cart: CartView,
    pub delay_ms: u128,
}

/// Where to send the shopper when checkout cannot show the form.
fn redirect_for(screen: Screen) -> Redirect {
    match screen {
        Screen::AuthPrompt => Redirect::to("/auth?mode=login"),
        Screen::PaymentForm | Screen::Processing => Redirect::to("/checkout"),
        Screen::Storefront | Screen::ConfirmClear => Redirect::to("/"),
    }
}

/// Enter checkout on behalf of the shopper, returning the resulting screen.
fn begin(state: &AppState, shop: &mut ShopSession) -> Screen {
    match shop.apply(state.catalog(), Intent::BeginCheckout) {
        Ok(transition) => transition.screen,
        Err(e) => e.screen(),
    }
}

/// Display the payment form, or redirect if checkout cannot start.
#[instrument(skip(state, shop))]
pub async fn show(State(state): State<AppState>, mut shop: ShopSession) -> Result<Response> {
    let screen = begin(&state, &mut shop);
    if screen != Screen::PaymentForm {
        shop.commit().await?;
        return Ok(redirect_for(screen).into_response());
    }

    let notices = shop.take_notices().await?;
    Ok(CheckoutTemplate {
        layout: LayoutView::new(&state, shop.shop(), notices),
        cart: CartView::from(shop.shop().cart()),
        delay_ms: state.payments().delay().as_millis(),
    }
    .into_response())
}

/// Submit the payment form and wait for the simulated gateway.
#[instrument(skip(state, shop, form))]
pub async fn submit(
    State(state): State<AppState>,
    mut shop: ShopSession,
    Form(form): Form<CheckoutForm>,
) -> Result<Redirect> {
    let screen = begin(&state, &mut shop);
    if screen != Screen::PaymentForm {
        shop.commit().await?;
        return Ok(redirect_for(screen));
    }

    let request = match shop.apply(state.catalog(), Intent::SubmitPayment(form.into())) {
        Ok(transition) => match transition.effect {
            Some(Effect::ProcessPayment(request)) => request,
            None => {
                shop.commit().await?;
                return Ok(redirect_for(transition.screen));
            }
        },
        Err(e) => {
            shop.commit().await?;
            return Ok(redirect_for(e.screen()));
        }
    };

    add_breadcrumb("checkout", "Payment submitted", None);
    let outcome = state.payments().process(&request).await;

    let screen = match shop.apply(state.catalog(), Intent::PaymentCompleted(outcome)) {
        Ok(transition) => transition.screen,
        Err(e) => e.screen(),
    };
    shop.commit().await?;
    Ok(redirect_for(screen))
}

/// Close the payment form.
#[instrument(skip(state, shop))]
pub async fn cancel(State(state): State<AppState>, mut shop: ShopSession) -> Result<Redirect> {
    let _ = shop.apply(state.catalog(), Intent::CancelCheckout);
    shop.commit().await?;
    Ok(Redirect::to("/"))
}
