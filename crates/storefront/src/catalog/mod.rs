//! Product catalog loading.
//!
//! The catalog is a static JSON array of product records, read once at
//! startup from a local file or fetched from a URL:
//!
//! ```json
//! [
//!   { "id": 1, "name": "Coffee mug", "price": 12.5, "image": "/static/img/mug.svg", "category": "kitchen" }
//! ]
//! ```
//!
//! Loading is all-or-nothing. A missing file, a non-success HTTP status or a
//! record that fails validation yields a [`LoadError`] and no products.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use tienda_core::{Price, ProductId};

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Catalog file does not exist.
    #[error("catalog file not found: {0}")]
    NotFound(PathBuf),

    /// Catalog file could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// Remote catalog answered with a non-success status.
    #[error("catalog request failed with HTTP status {0}")]
    Status(u16),

    /// Remote catalog could not be fetched.
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog content is not a valid product list.
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two records share the same product ID.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),

    /// A record has a negative price.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// A purchasable product. Immutable once loaded; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub category: String,
}

impl Product {
    /// Unit price with currency, for display.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::from_amount(self.price)
    }
}

/// Where the catalog is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// A JSON file on the local filesystem.
    File(PathBuf),
    /// A JSON document served over HTTP(S).
    Url(Url),
}

impl FromStr for CatalogSource {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Url::parse(s).map(Self::Url)
        } else {
            Ok(Self::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// The in-memory product catalog, in source order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from already-parsed products.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::DuplicateId` or `LoadError::NegativePrice` if a
    /// record breaks catalog invariants.
    pub fn new(products: Vec<Product>) -> Result<Self, LoadError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(LoadError::DuplicateId(product.id));
            }
            if product.price.is_sign_negative() {
                return Err(LoadError::NegativePrice(product.id));
            }
        }

        Ok(Self { products })
    }

    /// Parse a catalog from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Parse` for malformed JSON, or a validation error
    /// from [`Catalog::new`].
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Load the catalog from its source.
    ///
    /// # Errors
    ///
    /// Returns a `LoadError` if the resource is absent, unreadable, answers
    /// with a non-success status, or does not parse.
    pub async fn load(source: &CatalogSource, client: &reqwest::Client) -> Result<Self, LoadError> {
        let catalog = match source {
            CatalogSource::File(path) => Self::load_file(path).await?,
            CatalogSource::Url(url) => Self::fetch(url, client).await?,
        };

        tracing::info!(
            source = %source,
            products = catalog.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    async fn load_file(path: &Path) -> Result<Self, LoadError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
                _ => LoadError::Io(e),
            })?;
        Self::from_json(&content)
    }

    async fn fetch(url: &Url, client: &reqwest::Client) -> Result<Self, LoadError> {
        let response = client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Self::from_json(&body)
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// All products, in source order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products in a category, in source order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Distinct categories, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.products.iter().map(|p| p.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
