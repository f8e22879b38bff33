//! Advanced search request and response types

use serde::Deserialize;

use super::{count, opt_text};
use crate::error::{AppError, AppResult};

/// Raw search form input, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub query: String,
    pub category: String,
    pub author: String,
    pub year: String,
    pub exact_match: bool,
    pub include_description: bool,
    pub available_only: bool,
}

/// Validated search parameters for `GET /api/search`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub query: String,
    pub category: Option<String>,
    pub author: Option<String>,
    pub year: Option<String>,
    pub exact_match: bool,
    pub include_description: bool,
    pub available_only: bool,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl TryFrom<&SearchForm> for SearchCriteria {
    type Error = AppError;

    fn try_from(form: &SearchForm) -> AppResult<Self> {
        let query = form.query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("Please enter a search term".to_string()));
        }

        Ok(Self {
            query: query.to_string(),
            category: non_empty(&form.category),
            author: non_empty(&form.author),
            year: non_empty(&form.year),
            exact_match: form.exact_match,
            include_description: form.include_description,
            available_only: form.available_only,
        })
    }
}

impl SearchCriteria {
    /// Query string pairs; optional filters and flags appear only when set.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("q", self.query.clone())];

        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(author) = &self.author {
            pairs.push(("author", author.clone()));
        }
        if let Some(year) = &self.year {
            pairs.push(("year", year.clone()));
        }
        if self.exact_match {
            pairs.push(("exact", "true".to_string()));
        }
        if self.include_description {
            pairs.push(("description", "true".to_string()));
        }
        if self.available_only {
            pairs.push(("available", "true".to_string()));
        }

        pairs
    }
}

/// Book as returned by the search engine. The search index is looser than
/// the catalog, so every field but the id is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    pub id: i64,
    #[serde(default, deserialize_with = "opt_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "count")]
    pub quantity: u32,
    #[serde(rename = "bookType", default, deserialize_with = "opt_text")]
    pub book_type: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub strand: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub genre: Option<String>,
}

/// Search endpoint response body
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub books: Vec<SearchHit>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub message: Option<String>,
}
