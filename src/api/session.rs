//! Session endpoints

use super::ApiClient;
use crate::error::AppResult;

impl ApiClient {
    /// Terminate the current session
    pub async fn session_logout(&self) -> AppResult<()> {
        let url = self.endpoints.api("/logout");
        tracing::debug!("POST {}", url);
        self.send_empty(self.http.post(url)).await
    }
}
