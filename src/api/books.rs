//! Catalog endpoints

use super::ApiClient;
use crate::{
    error::AppResult,
    models::{Book, BookUpdate},
};

impl ApiClient {
    /// Fetch the full catalog
    pub async fn books_list(&self) -> AppResult<Vec<Book>> {
        let url = self.endpoints.api("/books");
        tracing::debug!("GET {}", url);
        self.send_json(self.http.get(url)).await
    }

    /// Fetch one book's details
    pub async fn books_get(&self, id: i64) -> AppResult<Book> {
        let url = self.endpoints.api(&format!("/books/{}", id));
        tracing::debug!("GET {}", url);
        self.send_json(self.http.get(url)).await
    }

    /// Fetch a book for editing (admin view)
    pub async fn books_get_admin(&self, id: i64) -> AppResult<Book> {
        let url = self.endpoints.api(&format!("/admin/books/{}", id));
        tracing::debug!("GET {}", url);
        self.send_json(self.http.get(url)).await
    }

    /// Replace a book's editable fields
    pub async fn books_update(&self, id: i64, update: &BookUpdate) -> AppResult<()> {
        let url = self.endpoints.api(&format!("/admin/books/{}", id));
        tracing::debug!("PUT {}", url);
        self.send_empty(self.http.put(url).json(update)).await
    }
}
