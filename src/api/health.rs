//! Backend health probe

use serde::Deserialize;

use super::ApiClient;
use crate::error::AppResult;

/// `GET /api/health` response body
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    /// Current status of the service
    #[serde(default)]
    pub status: Option<String>,
    /// Whether the search engine backing `/api/search` is up
    #[serde(default)]
    pub search_engine_available: bool,
}

impl ApiClient {
    /// Liveness check, bounded by the health timeout
    pub async fn health_check(&self) -> AppResult<HealthStatus> {
        let url = self.endpoints.api("/health");
        tracing::debug!("GET {}", url);
        let request = self.http.get(url).timeout(self.config.health_timeout());
        self.send_json(request).await
    }
}
