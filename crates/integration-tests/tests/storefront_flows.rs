//! End-to-end storefront flows over HTTP.
//!
//! Each test serves its own storefront; the context's client keeps cookies
//! like a browser, and redirects are checked rather than followed.

#![allow(clippy::unwrap_used)]

use tienda_integration_tests::{TestContext, location};
use tienda_storefront::catalog::LoadError;

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::start().await;

    let resp = ctx.get("/health").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");

    assert_eq!(ctx.get("/health/ready").await.status(), 200);
}

#[tokio::test]
async fn test_missing_catalog_reports_not_ready() {
    let ctx = TestContext::start_with(Err(LoadError::Status(500)), &[]).await;

    assert_eq!(ctx.get("/health").await.status(), 200);
    assert_eq!(ctx.get("/health/ready").await.status(), 503);

    let home = ctx.page("/").await;
    assert!(home.contains("The catalog could not be loaded"));
    assert!(home.contains("HTTP status 500"));
}

// ============================================================================
// Catalog and cart
// ============================================================================

#[tokio::test]
async fn test_home_lists_products_and_filters_by_category() {
    let ctx = TestContext::start().await;

    let home = ctx.page("/").await;
    assert!(home.contains("Ceramic mug"));
    assert!(home.contains("Brass pen"));
    assert!(home.contains("$12.50"));
    assert!(home.contains("Your cart is empty."));

    let kitchen = ctx.page("/?category=kitchen").await;
    assert!(kitchen.contains("Pour-over kettle"));
    assert!(!kitchen.contains("Brass pen"));
}

#[tokio::test]
async fn test_add_and_remove_update_cart_and_notify_once() {
    let ctx = TestContext::start().await;

    let resp = ctx.add_to_cart(1).await;
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/");

    let home = ctx.page("/").await;
    assert!(home.contains("Ceramic mug added to cart"));
    assert!(home.contains("Cart (1)"));

    // Notices are shown on one page only
    let again = ctx.page("/").await;
    assert!(!again.contains("Ceramic mug added to cart"));
    assert!(again.contains("Cart (1)"));

    ctx.add_to_cart(1).await;
    ctx.add_to_cart(3).await;
    let home = ctx.page("/").await;
    assert!(home.contains("Added another Ceramic mug to cart"));
    assert!(home.contains("Canvas tote added to cart"));
    assert!(home.contains("Cart (3)"));
    assert!(home.contains("$43.00"));

    ctx.post("/cart/remove", &[("product_id", "1")]).await;
    let home = ctx.page("/").await;
    assert!(home.contains("Reduced Ceramic mug in cart"));
    assert!(home.contains("$30.50"));

    ctx.post("/cart/remove", &[("product_id", "3")]).await;
    let home = ctx.page("/").await;
    assert!(home.contains("Canvas tote removed from cart"));
    assert!(home.contains("Cart (1)"));
}

#[tokio::test]
async fn test_unknown_product_is_rejected() {
    let ctx = TestContext::start().await;

    let resp = ctx.add_to_cart(999).await;
    assert_eq!(location(&resp), "/");

    let home = ctx.page("/").await;
    assert!(home.contains("That product is no longer available."));
    assert!(home.contains("Cart (0)"));
}

#[tokio::test]
async fn test_removing_product_not_in_cart_is_silent() {
    let ctx = TestContext::start().await;
    ctx.add_to_cart(2).await;
    ctx.page("/").await;

    ctx.post("/cart/remove", &[("product_id", "5")]).await;
    let home = ctx.page("/").await;
    assert!(home.contains("Cart (1)"));
    assert!(!home.contains("removed from cart"));
}

#[tokio::test]
async fn test_carts_are_per_browser() {
    let ctx = TestContext::start().await;
    ctx.add_to_cart(4).await;

    let other = ctx.new_browser();
    let home = other
        .get(ctx.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(home.contains("Cart (0)"));

    assert!(ctx.page("/").await.contains("Cart (1)"));
}

#[tokio::test]
async fn test_clear_cart_asks_first() {
    let ctx = TestContext::start().await;
    ctx.add_to_cart(1).await;
    ctx.add_to_cart(6).await;
    ctx.page("/").await;

    let prompt = ctx.page("/cart/clear").await;
    assert!(prompt.contains("Yes, empty it"));

    let resp = ctx.post("/cart/clear", &[("confirm", "no")]).await;
    assert_eq!(location(&resp), "/");
    assert!(ctx.page("/").await.contains("Cart (2)"));

    ctx.post("/cart/clear", &[("confirm", "yes")]).await;
    let home = ctx.page("/").await;
    assert!(home.contains("Cart cleared"));
    assert!(home.contains("Cart (0)"));
}

#[tokio::test]
async fn test_clear_empty_cart_skips_prompt() {
    let ctx = TestContext::start().await;

    let resp = ctx.get("/cart/clear").await;
    assert_eq!(location(&resp), "/");
    assert!(ctx.page("/").await.contains("Your cart is already empty."));
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_register_logout_login() {
    let ctx = TestContext::start().await;

    ctx.register("ana").await;
    let home = ctx.page("/").await;
    assert!(home.contains("Welcome, ana!"));
    assert!(home.contains("Hi, ana"));
    assert!(!home.contains(r#"id="auth-prompt""#));

    let resp = ctx.post("/auth/logout", &[]).await;
    assert_eq!(location(&resp), "/auth?mode=login");
    let prompt = ctx.page("/auth?mode=login").await;
    assert!(prompt.contains("You have been logged out."));
    assert!(!prompt.contains("Hi, ana"));
    assert!(ctx.page("/").await.contains(r#"id="auth-prompt""#));

    let resp = ctx
        .post("/auth/login", &[("username", "ana"), ("password", "hunter22")])
        .await;
    assert_eq!(location(&resp), "/");
    assert!(ctx.page("/").await.contains("Welcome back, ana!"));
}

#[tokio::test]
async fn test_signed_out_home_offers_login_panel() {
    let ctx = TestContext::start().await;

    let home = ctx.page("/").await;
    assert!(home.contains(r#"id="auth-prompt""#));
    assert!(home.contains(r#"action="/auth/login""#));
    assert!(home.contains("Ceramic mug"));
}

#[tokio::test]
async fn test_bad_credentials_return_to_prompt() {
    let ctx = TestContext::start().await;
    ctx.register("ana").await;
    ctx.post("/auth/logout", &[]).await;

    let resp = ctx
        .post("/auth/login", &[("username", "ana"), ("password", "wrong")])
        .await;
    assert_eq!(location(&resp), "/auth?mode=login");

    let prompt = ctx.page("/auth?mode=login").await;
    assert!(prompt.contains("Incorrect username or password."));
    assert!(!prompt.contains("Hi, ana"));
}

#[tokio::test]
async fn test_registration_validation() {
    let ctx = TestContext::start().await;
    ctx.register("ana").await;
    ctx.post("/auth/logout", &[]).await;

    let resp = ctx
        .post(
            "/auth/register",
            &[("username", "ana"), ("password", "x"), ("email", "ana@example.com")],
        )
        .await;
    assert_eq!(location(&resp), "/auth?mode=register");
    assert!(
        ctx.page("/auth?mode=register")
            .await
            .contains("That username is already taken.")
    );

    ctx.post(
        "/auth/register",
        &[("username", "bo"), ("password", "x"), ("email", "not-an-email")],
    )
    .await;
    assert!(ctx.page("/auth?mode=register").await.contains("Invalid email format."));

    ctx.post(
        "/auth/register",
        &[("username", "bo"), ("password", ""), ("email", "bo@example.com")],
    )
    .await;
    assert!(ctx.page("/auth?mode=register").await.contains("All fields are required."));
}

// ============================================================================
// Checkout
// ============================================================================

const CARD: [(&str, &str); 3] = [
    ("name", "Ana Ruiz"),
    ("card_number", "4242 4242 4242 4242"),
    ("expiry", "12/29"),
];

#[tokio::test]
async fn test_checkout_requires_sign_in() {
    let ctx = TestContext::start().await;
    ctx.add_to_cart(1).await;

    let resp = ctx.get("/checkout").await;
    assert_eq!(location(&resp), "/auth?mode=login");
    assert!(
        ctx.page("/auth?mode=login")
            .await
            .contains("Please log in or register to check out.")
    );

    let resp = ctx.post("/checkout", &CARD).await;
    assert_eq!(location(&resp), "/auth?mode=login");
    assert!(ctx.page("/").await.contains("Cart (1)"));
}

#[tokio::test]
async fn test_checkout_with_empty_cart_is_rejected() {
    let ctx = TestContext::start().await;
    ctx.register("ana").await;
    ctx.page("/").await;

    let resp = ctx.get("/checkout").await;
    assert_eq!(location(&resp), "/");
    let home = ctx.page("/").await;
    assert!(home.contains(r#"<div class="notice notice-error" role="status">Your cart is empty.</div>"#));
}

#[tokio::test]
async fn test_successful_checkout_empties_cart() {
    let ctx = TestContext::start().await;
    ctx.register("ana").await;
    ctx.add_to_cart(2).await;
    ctx.add_to_cart(5).await;
    ctx.page("/").await;

    let form = ctx.page("/checkout").await;
    assert!(form.contains("payment-form"));
    assert!(form.contains("$49.65"));

    let resp = ctx.post("/checkout", &CARD).await;
    assert_eq!(location(&resp), "/");

    let home = ctx.page("/").await;
    assert!(home.contains("Payment successful! Order reference"));
    assert!(home.contains("Cart (0)"));
    assert!(home.contains("Hi, ana"));
}

#[tokio::test]
async fn test_declined_payment_keeps_cart() {
    let ctx = TestContext::start_with(
        Ok(tienda_integration_tests::bundled_catalog()),
        &[("CHECKOUT_SUCCESS_RATE", "0")],
    )
    .await;
    ctx.register("ana").await;
    ctx.add_to_cart(4).await;

    let resp = ctx.post("/checkout", &CARD).await;
    assert_eq!(location(&resp), "/checkout");

    let form = ctx.page("/checkout").await;
    assert!(form.contains("There was a problem processing your payment. Please try again."));
    assert!(form.contains("Cart (1)"));
}

#[tokio::test]
async fn test_incomplete_payment_form_is_rejected() {
    let ctx = TestContext::start().await;
    ctx.register("ana").await;
    ctx.add_to_cart(4).await;

    let resp = ctx
        .post(
            "/checkout",
            &[("name", ""), ("card_number", "4242"), ("expiry", "12/29")],
        )
        .await;
    assert_eq!(location(&resp), "/checkout");
    assert!(ctx.page("/checkout").await.contains("All payment fields are required."));

    ctx.post(
        "/checkout",
        &[("name", "Ana"), ("card_number", "4242-abcd"), ("expiry", "12/29")],
    )
    .await;
    assert!(ctx.page("/checkout").await.contains("Please enter a valid card number."));
    assert!(ctx.page("/").await.contains("Cart (1)"));
}

#[tokio::test]
async fn test_cancel_checkout_returns_home() {
    let ctx = TestContext::start().await;
    ctx.register("ana").await;
    ctx.add_to_cart(4).await;

    let resp = ctx.post("/checkout/cancel", &[]).await;
    assert_eq!(location(&resp), "/");
    assert!(ctx.page("/").await.contains("Cart (1)"));
}
