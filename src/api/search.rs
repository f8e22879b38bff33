//! Advanced search endpoint

use super::ApiClient;
use crate::{
    error::AppResult,
    models::{SearchCriteria, SearchResponse},
};

impl ApiClient {
    /// Query the search engine. Uses the shorter search timeout.
    pub async fn search_books(&self, criteria: &SearchCriteria) -> AppResult<SearchResponse> {
        let url = self.endpoints.api("/search");
        let pairs = criteria.to_query_pairs();
        tracing::debug!("GET {} {:?}", url, pairs);

        let request = self
            .http
            .get(url)
            .query(&pairs)
            .timeout(self.config.search_timeout());
        self.send_json(request).await
    }
}
