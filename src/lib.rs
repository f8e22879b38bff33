//! Libdesk - school library desk client
//!
//! Client side of the school library borrowing system: catalog browsing and
//! filtering, the borrow-request admin console, and the advanced search
//! overlay, talking to the library REST backend over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use api::{ApiClient, Endpoints, LibraryApi};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
