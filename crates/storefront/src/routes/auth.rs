//! Authentication route handlers.
//!
//! Handles the login / register prompt against the simulated user registry.
//! Failures redirect back to the prompt with the error queued as a
//! notification.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use super::LayoutView;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::ShopSession;
use crate::services::Intent;
use crate::services::auth::{LoginForm, RegisterForm};
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Which tab of the prompt to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    const fn redirect(self) -> &'static str {
        match self {
            Self::Login => "/auth?mode=login",
            Self::Register => "/auth?mode=register",
        }
    }
}

/// Query parameters for the auth prompt.
#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    #[serde(default)]
    pub mode: AuthMode,
}

// =============================================================================
// Templates
// =============================================================================

/// Login / register prompt.
#[derive(Template, WebTemplate)]
#[template(path = "pages/auth.html")]
pub struct AuthTemplate {
    pub layout: LayoutView,
    pub register: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the auth prompt.
#[instrument(skip(state, shop))]
pub async fn page(
    State(state): State<AppState>,
    mut shop: ShopSession,
    Query(query): Query<AuthQuery>,
) -> Result<AuthTemplate> {
    let notices = shop.take_notices().await?;
    Ok(AuthTemplate {
        layout: LayoutView::new(&state, shop.shop(), notices),
        register: query.mode == AuthMode::Register,
    })
}

/// Handle login form submission.
#[instrument(skip(state, shop, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    mut shop: ShopSession,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let outcome = shop.apply(state.catalog(), Intent::Login(form));
    signed_in(shop, outcome.is_ok(), AuthMode::Login).await
}

/// Handle registration form submission.
#[instrument(skip(state, shop, form), fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    mut shop: ShopSession,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect> {
    let outcome = shop.apply(state.catalog(), Intent::Register(form));
    signed_in(shop, outcome.is_ok(), AuthMode::Register).await
}

/// Handle logout, returning to the login prompt.
#[instrument(skip(state, shop))]
pub async fn logout(State(state): State<AppState>, mut shop: ShopSession) -> Result<Redirect> {
    let _ = shop.apply(state.catalog(), Intent::Logout);
    shop.commit().await?;
    clear_sentry_user();
    Ok(Redirect::to(AuthMode::Login.redirect()))
}

async fn signed_in(shop: ShopSession, succeeded: bool, mode: AuthMode) -> Result<Redirect> {
    let username = shop.shop().session().username().cloned();
    shop.commit().await?;

    match username {
        Some(username) if succeeded => {
            set_sentry_user(&username);
            Ok(Redirect::to("/"))
        }
        _ => Ok(Redirect::to(mode.redirect())),
    }
}
