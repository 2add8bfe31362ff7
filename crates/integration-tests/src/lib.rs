//! Integration tests for the Fakeshop storefront.
//!
//! Tests drive the full router in-process with `tower::ServiceExt::oneshot`
//! against an `httpmock` catalog, an in-memory session store and an
//! in-memory `SQLite` pool. [`TestBrowser`] carries the session cookie
//! between requests the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fakeshop-integration-tests
//! ```

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, StatusCode, header},
};
use fakeshop_storefront::config::{CatalogConfig, StorefrontConfig};
use fakeshop_storefront::middleware::create_session_layer;
use fakeshop_storefront::state::AppState;
use httpmock::MockServer;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

/// A catalog product in the remote API's JSON shape.
#[must_use]
pub fn product_json(id: i32, title: &str, category: &str, price: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": price,
        "description": format!("{title} description"),
        "category": category,
        "image": format!("https://fakestoreapi.test/img/{id}.png"),
        "rating": { "rate": 4.2, "count": 87 }
    })
}

/// Storefront wired to a mock catalog.
pub struct TestApp {
    pub catalog: MockServer,
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// Start a mock catalog and build the storefront against it.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory session database cannot be opened.
    pub async fn spawn() -> Self {
        let catalog = MockServer::start_async().await;

        let config = StorefrontConfig {
            catalog: CatalogConfig {
                base_url: catalog.base_url(),
                ..CatalogConfig::default()
            },
            ..StorefrontConfig::default()
        };

        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .unwrap_or_else(|e| panic!("in-memory sqlite: {e}"));
        let state = AppState::new(config, pool);
        let session_layer = create_session_layer(MemoryStore::default(), state.config());
        let router = fakeshop_storefront::app(state.clone(), session_layer);

        Self {
            catalog,
            state,
            router,
        }
    }

    /// Serve `GET /products` with `products`.
    pub async fn mock_products(&self, products: &[Value]) {
        let body = Value::Array(products.to_vec());
        self.catalog
            .mock_async(|when, then| {
                when.method(httpmock::Method::GET).path("/products");
                then.status(200).json_body(body);
            })
            .await;
    }

    /// Serve `GET /products/{id}` with `product`.
    pub async fn mock_product(&self, id: i32, product: Value) {
        self.catalog
            .mock_async(|when, then| {
                when.method(httpmock::Method::GET)
                    .path(format!("/products/{id}"));
                then.status(200).json_body(product);
            })
            .await;
    }

    /// A fresh browser with no session cookie yet.
    #[must_use]
    pub fn browser(&self) -> TestBrowser {
        TestBrowser {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// The router, for tests that build their own requests.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// One browser: sends requests with its session cookie, shared by its tabs.
#[derive(Clone)]
pub struct TestBrowser {
    router: Router,
    cookie: Option<String>,
}

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub hx_trigger: Option<String>,
    pub body: String,
}

impl TestBrowser {
    /// The session cookie this browser currently holds, if any.
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// `GET uri`, returning the buffered response.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let response = self.send(Method::GET, uri, None).await;
        buffer(response).await
    }

    /// `POST uri` with an urlencoded form body.
    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        let response = self.send(Method::POST, uri, Some(form.to_string())).await;
        buffer(response).await
    }

    /// Send a request and return the unbuffered response, for streams.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn send(&mut self, method: Method, uri: &str, form: Option<String>) -> Response<Body> {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let body = match form {
            Some(form) => {
                request = request.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form)
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap_or_else(|e| panic!("request: {e}")))
            .await
            .unwrap_or_else(|e| match e {});

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.to_string());
        }

        response
    }
}

async fn buffer(response: Response<Body>) -> TestResponse {
    let status = response.status();
    let hx_trigger = response
        .headers()
        .get("HX-Trigger")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_else(|e| panic!("body: {e}"));

    TestResponse {
        status,
        hx_trigger,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}
