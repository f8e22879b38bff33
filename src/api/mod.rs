//! HTTP boundary to the library REST backend.
//!
//! [`LibraryApi`] is the seam every view talks through; [`ApiClient`] is the
//! `reqwest` implementation. Endpoint-specific calls live in the submodules
//! as inherent methods on `ApiClient`.

pub mod books;
pub mod health;
pub mod requests;
pub mod search;
pub mod session;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{cookie::Jar, header::HeaderValue, Url};
use serde::de::DeserializeOwned;

use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
    models::{Book, BookUpdate, BorrowRequest, RequestAction, SearchCriteria, SearchResponse},
};

pub use health::HealthStatus;

/// Backend URL construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    origin: String,
}

impl Endpoints {
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// `{origin}/api`
    pub fn api_base(&self) -> String {
        format!("{}/api", self.origin)
    }

    /// Absolute URL of an API path (`path` starts with `/`)
    pub fn api(&self, path: &str) -> String {
        format!("{}/api{}", self.origin, path)
    }

    /// Canonical cover image URL for a bare filename
    pub fn cover(&self, filename: &str) -> String {
        self.api(&format!("/databasecontent/cover/{}", filename))
    }
}

/// Operations the client needs from the backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryApi: Send + Sync {
    /// `GET /api/books`
    async fn list_books(&self) -> AppResult<Vec<Book>>;

    /// `GET /api/books/{id}`
    async fn get_book(&self, id: i64) -> AppResult<Book>;

    /// `GET /api/admin/requests`
    async fn list_requests(&self) -> AppResult<Vec<BorrowRequest>>;

    /// `PUT /api/admin/requests/{id}/{approve|reject|return}`
    async fn update_request(&self, id: i64, action: RequestAction) -> AppResult<()>;

    /// `POST /api/admin/requests/check-due`; returns the server summary
    async fn check_due(&self) -> AppResult<String>;

    /// `GET /api/search`
    async fn search(&self, criteria: &SearchCriteria) -> AppResult<SearchResponse>;

    /// `GET /api/health`
    async fn health(&self) -> AppResult<HealthStatus>;

    /// `POST /api/logout`
    async fn logout(&self) -> AppResult<()>;

    /// `GET /api/admin/books/{id}`
    async fn get_admin_book(&self, id: i64) -> AppResult<Book>;

    /// `PUT /api/admin/books/{id}`
    async fn update_book(&self, id: i64, update: &BookUpdate) -> AppResult<()>;
}

/// `reqwest`-backed client. Every call carries the session cookies.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let endpoints = Endpoints::new(&config.base_url);

        // Cookies set by the backend replace the configured session
        let jar = Arc::new(Jar::default());
        if let Some(cookie) = &config.session_cookie {
            HeaderValue::from_str(cookie)
                .map_err(|e| AppError::Validation(format!("Invalid session cookie: {}", e)))?;
            let origin = Url::parse(endpoints.origin())
                .map_err(|e| AppError::Validation(format!("Invalid base URL {}: {}", config.base_url, e)))?;
            jar.add_cookie_str(cookie, &origin);
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("libdesk/", env!("CARGO_PKG_VERSION")))
            .cookie_provider(jar)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            endpoints,
            config: config.clone(),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Send a request and decode a JSON success body.
    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> AppResult<T> {
        let response = Self::check(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send a request whose success body is irrelevant.
    async fn send_empty(&self, request: reqwest::RequestBuilder) -> AppResult<()> {
        Self::check(request.send().await?).await?;
        Ok(())
    }

    /// Turn a non-success status into [`AppError::Http`], keeping the
    /// server's `error` message.
    async fn check(response: reqwest::Response) -> AppResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        let err = AppError::from_status(status.as_u16(), &body);
        tracing::warn!("{} returned {}: {}", url, status, err);
        Err(err)
    }
}

#[async_trait]
impl LibraryApi for ApiClient {
    async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.books_list().await
    }

    async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.books_get(id).await
    }

    async fn list_requests(&self) -> AppResult<Vec<BorrowRequest>> {
        self.requests_list().await
    }

    async fn update_request(&self, id: i64, action: RequestAction) -> AppResult<()> {
        self.requests_update(id, action).await
    }

    async fn check_due(&self) -> AppResult<String> {
        self.requests_check_due().await
    }

    async fn search(&self, criteria: &SearchCriteria) -> AppResult<SearchResponse> {
        self.search_books(criteria).await
    }

    async fn health(&self) -> AppResult<HealthStatus> {
        self.health_check().await
    }

    async fn logout(&self) -> AppResult<()> {
        self.session_logout().await
    }

    async fn get_admin_book(&self, id: i64) -> AppResult<Book> {
        self.books_get_admin(id).await
    }

    async fn update_book(&self, id: i64, update: &BookUpdate) -> AppResult<()> {
        self.books_update(id, update).await
    }
}
