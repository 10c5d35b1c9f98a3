//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Product list (optional ?category=), cart panel, login panel when signed out
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (503 while the catalog is missing)
//!
//! # Cart
//! POST /cart/add               - Add one unit (product_id)
//! POST /cart/remove            - Remove one unit (product_id)
//! GET  /cart/clear             - "Empty your cart?" prompt
//! POST /cart/clear             - Answer the prompt (confirm=yes|no)
//!
//! # Auth
//! GET  /auth                   - Login / register prompt (?mode=login|register)
//! POST /auth/login             - Login action
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action, back to the login prompt
//!
//! # Checkout
//! GET  /checkout               - Payment form (redirects to /auth when signed out)
//! POST /checkout               - Submit payment
//! POST /checkout/cancel        - Close the form
//! ```
//!
//! Every mutating route answers with a redirect; notifications travel in the
//! session and are shown on the next page.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware;
use crate::models::Notification;
use crate::services::Shop;
use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", get(cart::clear_page).post(cart::clear))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::page))
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/cancel", post(checkout::cancel))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/cart", cart_routes())
        .nest("/auth", auth_routes())
        .nest("/checkout", checkout_routes())
}

/// Build the complete application: pages, health checks, static files and
/// the middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the catalog failed to load.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.catalog_error().is_some() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

// =============================================================================
// Shared View Data
// =============================================================================

/// A notification ready for the page script.
#[derive(Clone)]
pub struct NoticeView {
    pub level: &'static str,
    pub message: String,
}

impl From<Notification> for NoticeView {
    fn from(notice: Notification) -> Self {
        Self {
            level: notice.level.as_str(),
            message: notice.message,
        }
    }
}

/// Data every page layout needs.
#[derive(Clone)]
pub struct LayoutView {
    pub store_name: String,
    pub user: Option<String>,
    pub cart_count: u32,
    pub notices: Vec<NoticeView>,
    pub notice_visible_ms: u128,
    pub notice_fade_ms: u128,
    /// Shown as a banner on every page while the catalog is missing.
    pub catalog_error: Option<String>,
}

impl LayoutView {
    #[must_use]
    pub fn new(state: &AppState, shop: &Shop, notices: Vec<Notification>) -> Self {
        let timing = state.config().notifications;
        Self {
            store_name: state.config().store_name.clone(),
            user: shop.session().username().map(ToString::to_string),
            cart_count: shop.cart().item_count(),
            notices: notices.into_iter().map(NoticeView::from).collect(),
            notice_visible_ms: timing.visible.as_millis(),
            notice_fade_ms: timing.fade.as_millis(),
            catalog_error: state.catalog_error().map(String::from),
        }
    }
}
