//! Home page route handler: product list and cart panel.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use tienda_core::ProductId;

use super::LayoutView;
use super::cart::CartView;
use crate::catalog::Product;
use crate::error::Result;
use crate::filters;
use crate::middleware::ShopSession;
use crate::state::AppState;

/// Query parameters for the product list.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub category: Option<String>,
}

/// Product card display data.
#[derive(Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub category: String,
    /// Units of this product already in the cart.
    pub in_cart: u32,
}

/// Category filter link.
#[derive(Clone)]
pub struct CategoryLink {
    pub name: String,
    pub active: bool,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/index.html")]
pub struct IndexTemplate {
    pub layout: LayoutView,
    pub products: Vec<ProductView>,
    pub categories: Vec<CategoryLink>,
    pub showing_all: bool,
    pub cart: CartView,
    /// Offer the login panel to signed-out visitors.
    pub show_auth_prompt: bool,
}

/// Display the product list and cart panel.
#[instrument(skip(state, shop))]
pub async fn home(
    State(state): State<AppState>,
    mut shop: ShopSession,
    Query(query): Query<HomeQuery>,
) -> Result<IndexTemplate> {
    let catalog = state.catalog();
    let cart = shop.shop().cart();

    let selected = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let to_view = |product: &Product| ProductView {
        id: product.id,
        name: product.name.clone(),
        price: product.price,
        image: product.image.clone(),
        category: product.category.clone(),
        in_cart: cart.quantity_of(product.id),
    };

    let products: Vec<ProductView> = match selected {
        Some(category) => catalog.in_category(category).map(to_view).collect(),
        None => catalog.products().iter().map(to_view).collect(),
    };

    let categories = catalog
        .categories()
        .into_iter()
        .map(|name| CategoryLink {
            active: selected == Some(name),
            name: name.to_string(),
        })
        .collect();

    let cart_view = CartView::from(cart);
    let show_auth_prompt = !shop.shop().session().is_authenticated();
    let notices = shop.take_notices().await?;

    Ok(IndexTemplate {
        layout: LayoutView::new(&state, shop.shop(), notices),
        products,
        categories,
        showing_all: selected.is_none(),
        cart: cart_view,
        show_auth_prompt,
    })
}
