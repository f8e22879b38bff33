//! Borrow request list: filtering and table rendering

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{
    api::{Endpoints, LibraryApi},
    error::AppResult,
    models::{BorrowRequest, RequestAction, RequestStatus},
};

const LOAD_FAILED: &str = "Failed to load requests. Please try again.";
const NO_REQUESTS: &str = "No requests found";

/// Request filter values; empty text and `None` status match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCriteria {
    pub text: String,
    pub status: Option<RequestStatus>,
}

impl RequestCriteria {
    pub fn matches(&self, request: &BorrowRequest) -> bool {
        let term = self.text.to_lowercase();
        let matches_text = term.is_empty()
            || request.user_name.to_lowercase().contains(&term)
            || request.book_title.to_lowercase().contains(&term)
            || request.user_email.to_lowercase().contains(&term);

        let matches_status = self
            .status
            .as_ref()
            .map_or(true, |s| &request.book_status == s);

        matches_text && matches_status
    }
}

/// Requests matching `criteria`, in source order
pub fn filter_requests(requests: &[BorrowRequest], criteria: &RequestCriteria) -> Vec<BorrowRequest> {
    requests.iter().filter(|r| criteria.matches(r)).cloned().collect()
}

/// Display form of a backend date, `-` when absent.
/// Unparseable values are shown as sent.
pub fn format_date(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return "-".to_string();
    };

    let date = DateTime::parse_from_rfc3339(raw)
        .map(|d| d.date_naive())
        .or_else(|_| DateTime::parse_from_rfc2822(raw).map(|d| d.date_naive()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|d| d.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|d| d.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Action button on a request row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionButton {
    pub request_id: i64,
    pub action: RequestAction,
    pub label: &'static str,
}

/// One row of the request table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRow {
    pub id: i64,
    pub cover_url: Option<String>,
    pub book_title: String,
    pub user_name: String,
    pub user_email: String,
    pub grade_section: String,
    pub status: RequestStatus,
    pub status_label: String,
    pub status_class: String,
    pub borrow_date: String,
    pub return_date: String,
    pub actions: Vec<ActionButton>,
}

pub fn render_row(request: &BorrowRequest, endpoints: &Endpoints) -> RequestRow {
    let status = &request.book_status;
    let actions = status
        .actions()
        .iter()
        .map(|&action| ActionButton {
            request_id: request.id,
            action,
            label: action.label(),
        })
        .collect();

    RequestRow {
        id: request.id,
        cover_url: request.book_cover.as_deref().map(|c| endpoints.cover(c)),
        book_title: request.book_title.clone(),
        user_name: request.user_name.clone(),
        user_email: request.user_email.clone(),
        grade_section: format!(
            "{} - {}",
            request.grade_level.as_deref().unwrap_or(""),
            request.section.as_deref().unwrap_or("")
        ),
        status: status.clone(),
        status_label: status.label().to_string(),
        status_class: format!("status-{}", status.as_str()),
        borrow_date: format_date(request.borrow_date.as_deref()),
        return_date: format_date(request.return_date.as_deref()),
        actions,
    }
}

/// Rendered request table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTable {
    pub rows: Vec<RequestRow>,
    /// Set when there is nothing to list
    pub empty_message: Option<&'static str>,
}

pub fn render_requests(requests: &[BorrowRequest], endpoints: &Endpoints) -> RequestTable {
    RequestTable {
        rows: requests.iter().map(|r| render_row(r, endpoints)).collect(),
        empty_message: requests.is_empty().then_some(NO_REQUESTS),
    }
}

/// Request list state for one admin page view
#[derive(Debug, Clone)]
pub struct RequestsView {
    endpoints: Endpoints,
    all: Vec<BorrowRequest>,
    filtered: Vec<BorrowRequest>,
    criteria: RequestCriteria,
}

impl RequestsView {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            all: Vec::new(),
            filtered: Vec::new(),
            criteria: RequestCriteria::default(),
        }
    }

    pub fn all(&self) -> &[BorrowRequest] {
        &self.all
    }

    pub fn filtered(&self) -> &[BorrowRequest] {
        &self.filtered
    }

    pub fn criteria(&self) -> &RequestCriteria {
        &self.criteria
    }

    /// Fetch every request. A reload clears the criteria and lists all
    /// requests; on failure nothing changes.
    pub async fn load(&mut self, api: &dyn LibraryApi) -> AppResult<()> {
        let requests = api.list_requests().await.map_err(|e| {
            tracing::error!("Error loading requests: {}", e);
            e
        })?;

        tracing::info!("Loaded {} borrow requests", requests.len());
        self.filtered = requests.clone();
        self.all = requests;
        self.criteria = RequestCriteria::default();
        Ok(())
    }

    /// User-facing text for a failed [`load`](Self::load)
    pub fn load_failure_message() -> &'static str {
        LOAD_FAILED
    }

    /// Replace the criteria and rebuild the filtered subset
    pub fn apply(&mut self, criteria: RequestCriteria) {
        self.filtered = filter_requests(&self.all, &criteria);
        tracing::debug!("Request filter kept {}/{} requests", self.filtered.len(), self.all.len());
        self.criteria = criteria;
    }

    pub fn render(&self) -> RequestTable {
        render_requests(&self.filtered, &self.endpoints)
    }
}
