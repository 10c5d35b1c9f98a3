//! Cart route handlers.
//!
//! Add and remove answer with a redirect back to the storefront. Clearing
//! goes through a confirmation page first.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use tienda_core::ProductId;

use super::LayoutView;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::ShopSession;
use crate::models::{Cart, CartLine, Confirmation};
use crate::services::{Intent, Screen};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub total: String,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        let unit = line.product.unit_price();
        Self {
            product_id: line.product.id,
            name: line.product.name.clone(),
            image: line.product.image.clone(),
            quantity: line.quantity,
            unit_price: unit.to_string(),
            line_price: unit.times(line.quantity).to_string(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            item_count: cart.item_count(),
            total: cart.total_price().to_string(),
        }
    }
}

impl Default for CartView {
    fn default() -> Self {
        Self::from(&Cart::new())
    }
}

// =============================================================================
// Forms & Templates
// =============================================================================

/// Form naming a single product.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: ProductId,
}

/// Answer to the clear-cart prompt.
#[derive(Debug, Deserialize)]
pub struct ClearForm {
    #[serde(default)]
    pub confirm: String,
}

/// Clear-cart confirmation page.
#[derive(Template, WebTemplate)]
#[template(path = "pages/cart_clear.html")]
pub struct ClearCartTemplate {
    pub layout: LayoutView,
    pub cart: CartView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Add one unit of a product.
#[instrument(skip(state, shop))]
pub async fn add(
    State(state): State<AppState>,
    mut shop: ShopSession,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    if shop
        .apply(state.catalog(), Intent::AddToCart(form.product_id))
        .is_ok()
    {
        let product_id = form.product_id.to_string();
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));
    }
    shop.commit().await?;
    Ok(Redirect::to("/"))
}

/// Remove one unit of a product.
#[instrument(skip(state, shop))]
pub async fn remove(
    State(state): State<AppState>,
    mut shop: ShopSession,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let _ = shop.apply(state.catalog(), Intent::RemoveFromCart(form.product_id));
    shop.commit().await?;
    Ok(Redirect::to("/"))
}

/// Show the "empty your cart?" prompt. An empty cart skips straight back.
#[instrument(skip(state, shop))]
pub async fn clear_page(
    State(state): State<AppState>,
    mut shop: ShopSession,
) -> Result<axum::response::Response> {
    let transition = shop.apply(state.catalog(), Intent::RequestClearCart);
    if !matches!(transition, Ok(ref t) if t.screen == Screen::ConfirmClear) {
        shop.commit().await?;
        return Ok(Redirect::to("/").into_response());
    }

    let notices = shop.take_notices().await?;
    Ok(ClearCartTemplate {
        layout: LayoutView::new(&state, shop.shop(), notices),
        cart: CartView::from(shop.shop().cart()),
    }
    .into_response())
}

/// Answer the clear-cart prompt.
#[instrument(skip(state, shop))]
pub async fn clear(
    State(state): State<AppState>,
    mut shop: ShopSession,
    Form(form): Form<ClearForm>,
) -> Result<Redirect> {
    let confirmation = Confirmation::from_answer(&form.confirm);
    let _ = shop.apply(state.catalog(), Intent::ClearCart(confirmation));
    shop.commit().await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use rust_decimal::Decimal;

    fn product(id: i32, name: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::new(cents, 2),
            image: format!("/static/img/{id}.svg"),
            category: "misc".to_string(),
        }
    }

    #[test]
    fn test_cart_view_formats_prices() {
        let mut cart = Cart::new();
        let mug = product(1, "Mug", 1250);
        cart.add(&mug);
        cart.add(&mug);
        cart.add(&product(2, "Pen", 199));

        let view = CartView::from(&cart);

        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, "$26.99");
        assert_eq!(view.lines[0].unit_price, "$12.50");
        assert_eq!(view.lines[0].line_price, "$25.00");
        assert_eq!(view.lines[1].quantity, 1);
    }

    #[test]
    fn test_cart_view_is_deterministic() {
        let mut cart = Cart::new();
        cart.add(&product(1, "Mug", 1000));
        assert_eq!(CartView::from(&cart), CartView::from(&cart));
    }

    #[test]
    fn test_clear_page_renders_with_layout() {
        let mut cart = Cart::new();
        cart.add(&product(1, "Mug", 1250));

        let page = ClearCartTemplate {
            layout: LayoutView {
                store_name: "Tienda".to_string(),
                user: None,
                cart_count: cart.item_count(),
                notices: Vec::new(),
                notice_visible_ms: 1500,
                notice_fade_ms: 300,
                catalog_error: None,
            },
            cart: CartView::from(&cart),
        }
        .render()
        .unwrap();

        assert!(page.contains("Yes, empty it"));
        assert!(page.contains("Cart (1)"));
        assert!(page.contains("Tienda"));
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::default();
        assert!(view.is_empty());
        assert_eq!(view.total, "$0.00");
        assert_eq!(view.item_count, 0);
    }
}
