//! Borrow request administration endpoints

use serde::Deserialize;

use super::ApiClient;
use crate::{
    error::AppResult,
    models::{BorrowRequest, RequestAction},
};

/// Summary returned by the overdue sweep
#[derive(Debug, Deserialize)]
pub struct CheckDueResponse {
    #[serde(default)]
    pub message: String,
}

impl ApiClient {
    /// Fetch every borrow request
    pub async fn requests_list(&self) -> AppResult<Vec<BorrowRequest>> {
        let url = self.endpoints.api("/admin/requests");
        tracing::debug!("GET {}", url);
        // The backend answers `null` when there are no requests yet
        let requests: Option<Vec<BorrowRequest>> = self.send_json(self.http.get(url)).await?;
        Ok(requests.unwrap_or_default())
    }

    /// Ask the server to move a request through its lifecycle
    pub async fn requests_update(&self, id: i64, action: RequestAction) -> AppResult<()> {
        let url = self
            .endpoints
            .api(&format!("/admin/requests/{}/{}", id, action.as_path()));
        tracing::debug!("PUT {}", url);
        self.send_empty(self.http.put(url)).await
    }

    /// Run the server-side overdue sweep (approved -> toReturn)
    pub async fn requests_check_due(&self) -> AppResult<String> {
        let url = self.endpoints.api("/admin/requests/check-due");
        tracing::debug!("POST {}", url);
        let response: CheckDueResponse = self.send_json(self.http.post(url)).await?;
        Ok(response.message)
    }
}
