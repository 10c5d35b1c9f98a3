//! Integration test support for the Tienda storefront.
//!
//! [`TestContext`] serves the full application on an ephemeral local port
//! and talks to it through a cookie-keeping HTTP client, so each context is
//! one browser with its own session.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tienda-integration-tests
//! ```
//!
//! Payments are approved instantly unless a test overrides
//! `CHECKOUT_SUCCESS_RATE`.

use reqwest::{Client, Response, header, redirect};
use tokio::task::JoinHandle;

use tienda_storefront::catalog::{Catalog, LoadError};
use tienda_storefront::config::StorefrontConfig;
use tienda_storefront::routes;
use tienda_storefront::state::AppState;

/// The catalog shipped with the storefront.
pub const BUNDLED_CATALOG: &str = include_str!("../../storefront/data/products.json");

/// Settings every test server starts from.
const TEST_VARS: [(&str, &str); 4] = [
    ("STOREFRONT_NAME", "Tienda Test"),
    ("CHECKOUT_DELAY_MS", "0"),
    ("CHECKOUT_SUCCESS_RATE", "1"),
    ("CHECKOUT_SEED", "42"),
];

/// Parse the bundled catalog.
///
/// # Panics
///
/// Panics if the bundled catalog is invalid.
#[must_use]
pub fn bundled_catalog() -> Catalog {
    Catalog::from_json(BUNDLED_CATALOG).expect("bundled catalog is valid")
}

/// A running storefront and a browser pointed at it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Serve the bundled catalog with default test settings.
    pub async fn start() -> Self {
        Self::start_with(Ok(bundled_catalog()), &[]).await
    }

    /// Serve with a given catalog load result and extra settings.
    ///
    /// `vars` take precedence over the defaults.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid or no port can be bound.
    pub async fn start_with(catalog: Result<Catalog, LoadError>, vars: &[(&str, &str)]) -> Self {
        let config = StorefrontConfig::from_lookup(|key| {
            vars.iter()
                .chain(TEST_VARS.iter())
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_string())
        })
        .expect("test configuration is valid");

        let app = routes::app(AppState::new(config, catalog));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("bound address");

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            client: browser(),
            base_url: format!("http://{addr}"),
            server,
        }
    }

    /// A second browser on the same server, with no cookies.
    #[must_use]
    pub fn new_browser(&self) -> Client {
        browser()
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET without following redirects.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// GET a page and return its body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the page is not a 200.
    pub async fn page(&self, path: &str) -> String {
        let resp = self.get(path).await;
        assert_eq!(resp.status(), 200, "GET {path}");
        resp.text().await.expect("page body")
    }

    /// POST a form without following redirects.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Register and sign in as `username`.
    ///
    /// # Panics
    ///
    /// Panics if registration does not redirect home.
    pub async fn register(&self, username: &str) {
        let email = format!("{username}@example.com");
        let resp = self
            .post(
                "/auth/register",
                &[
                    ("username", username),
                    ("password", "hunter22"),
                    ("email", email.as_str()),
                ],
            )
            .await;
        assert_eq!(location(&resp), "/", "registration of {username} failed");
    }

    /// Add one unit of a product to the cart.
    pub async fn add_to_cart(&self, product_id: i32) -> Response {
        self.post("/cart/add", &[("product_id", product_id.to_string().as_str())])
            .await
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// The redirect target of a response, or "" if there is none.
#[must_use]
pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}
