//! Advanced search overlay.
//!
//! The overlay moves through `Idle -> Searching -> Results | Empty | Error`.
//! Only one search runs at a time: a submission made while another holds the
//! in-flight token is dropped, never queued, and the running search is not
//! interrupted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    api::{HealthStatus, LibraryApi},
    error::AppError,
    models::{SearchCriteria, SearchForm, SearchHit, SearchResponse},
};

use super::truncate;

const CONNECT_FAILED: &str = "Cannot connect to server. Please check if the backend is running.";
const TIMED_OUT: &str = "Request timed out. Please try again.";
const NETWORK_ERROR: &str = "Network error. Please try again.";
const NO_RESULTS: &str = "No books found";
const NO_RESULTS_HINT: &str = "Try different keywords or check your spelling";

/// Result descriptions longer than this are cut
pub const RESULT_DESCRIPTION_LIMIT: usize = 150;

/// Map a search failure to the message shown in the overlay
pub fn classify_error(err: &AppError) -> String {
    match err {
        AppError::Validation(msg) => msg.clone(),
        AppError::Connect(_) => CONNECT_FAILED.to_string(),
        AppError::Timeout(_) => TIMED_OUT.to_string(),
        _ => NETWORK_ERROR.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available(u32),
    NotAvailable,
}

impl Availability {
    pub fn label(&self) -> String {
        match self {
            Availability::Available(n) => format!("Available ({})", n),
            Availability::NotAvailable => "Not Available".to_string(),
        }
    }
}

/// One search result card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCard {
    pub id: i64,
    /// Placeholder cover letter
    pub initial: char,
    pub title: String,
    pub byline: String,
    pub meta: Option<String>,
    pub description: String,
    pub availability: Availability,
}

pub fn render_hit(hit: &SearchHit) -> SearchCard {
    let meta: Vec<String> = [
        hit.book_type.clone(),
        hit.level.as_ref().map(|l| format!("Grade {}", l)),
        hit.strand.clone(),
        hit.genre.clone(),
    ]
    .into_iter()
    .flatten()
    .collect();

    SearchCard {
        id: hit.id,
        initial: hit
            .title
            .as_deref()
            .and_then(|t| t.chars().next())
            .map_or('B', |c| c.to_uppercase().next().unwrap_or(c)),
        title: hit.title.clone().unwrap_or_else(|| "Untitled".to_string()),
        byline: format!("by {}", hit.author.as_deref().unwrap_or("Unknown Author")),
        meta: (!meta.is_empty()).then(|| meta.join(" • ")),
        description: hit
            .description
            .as_deref()
            .map_or_else(|| "No description available".to_string(), |d| truncate(d, RESULT_DESCRIPTION_LIMIT)),
        availability: match hit.quantity {
            0 => Availability::NotAvailable,
            n => Availability::Available(n),
        },
    }
}

/// What the overlay currently shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchView {
    #[default]
    Idle,
    Searching,
    Results {
        header: String,
        cards: Vec<SearchCard>,
    },
    Empty {
        message: String,
        hint: &'static str,
    },
    Error {
        message: String,
    },
}

/// Render a successful search response
pub fn render_response(response: &SearchResponse) -> SearchView {
    if response.books.is_empty() {
        return SearchView::Empty {
            message: response
                .message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| NO_RESULTS.to_string()),
            hint: NO_RESULTS_HINT,
        };
    }

    SearchView::Results {
        header: format!("Found {} book(s)", response.total),
        cards: response.books.iter().map(render_hit).collect(),
    }
}

/// Single-flight slot. Holds the id of the search in progress, 0 when idle.
#[derive(Debug, Default)]
pub struct SingleFlight {
    current: AtomicU64,
    issued: AtomicU64,
}

/// Proof of holding the in-flight slot; releases it on drop.
#[derive(Debug)]
pub struct FlightToken<'a> {
    flight: &'a SingleFlight,
    id: u64,
}

impl SingleFlight {
    /// Take the slot, or `None` if another search holds it
    pub fn try_acquire(&self) -> Option<FlightToken<'_>> {
        let id = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        self.current
            .compare_exchange(0, id, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightToken { flight: self, id })
    }

    pub fn is_busy(&self) -> bool {
        self.current.load(Ordering::Acquire) != 0
    }
}

impl FlightToken<'_> {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for FlightToken<'_> {
    fn drop(&mut self) {
        let _ = self
            .flight
            .current
            .compare_exchange(self.id, 0, Ordering::AcqRel, Ordering::Acquire);
    }
}

/// Outcome of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Another search was in flight; this one was dropped
    Suppressed,
    /// The overlay rendered this view
    Rendered(SearchView),
}

/// Search overlay state, owned by the page that opens it
pub struct SearchOverlay {
    api: Arc<dyn LibraryApi>,
    flight: SingleFlight,
    view: Mutex<SearchView>,
}

impl SearchOverlay {
    pub fn new(api: Arc<dyn LibraryApi>) -> Self {
        Self {
            api,
            flight: SingleFlight::default(),
            view: Mutex::new(SearchView::Idle),
        }
    }

    pub fn is_searching(&self) -> bool {
        self.flight.is_busy()
    }

    pub async fn view(&self) -> SearchView {
        self.view.lock().await.clone()
    }

    /// Back to the initial state, e.g. when the overlay is closed
    pub async fn reset(&self) {
        *self.view.lock().await = SearchView::Idle;
    }

    /// Probe the backend when the overlay opens. Failures are only logged.
    pub async fn check_backend_health(&self) -> Option<HealthStatus> {
        match self.api.health().await {
            Ok(health) => {
                tracing::info!("Backend health: {:?}", health);
                if !health.search_engine_available {
                    tracing::warn!("Search engine not available, using fallback");
                }
                Some(health)
            }
            Err(e) => {
                tracing::error!("Backend health check error: {}", e);
                None
            }
        }
    }

    /// Run a search from the form contents
    pub async fn submit(&self, form: &SearchForm) -> SearchOutcome {
        let Some(token) = self.flight.try_acquire() else {
            tracing::debug!("Search already in flight, ignoring submission");
            return SearchOutcome::Suppressed;
        };

        let view = match SearchCriteria::try_from(form) {
            Ok(criteria) => self.run(&criteria, token.id()).await,
            Err(e) => SearchView::Error {
                message: classify_error(&e),
            },
        };

        *self.view.lock().await = view.clone();
        drop(token);
        SearchOutcome::Rendered(view)
    }

    async fn run(&self, criteria: &SearchCriteria, id: u64) -> SearchView {
        *self.view.lock().await = SearchView::Searching;
        tracing::info!("Search #{} started: {:?}", id, criteria.to_query_pairs());

        match self.api.search(criteria).await {
            Ok(response) => {
                tracing::info!("Search #{} returned {} of {} books", id, response.books.len(), response.total);
                render_response(&response)
            }
            Err(e) => {
                tracing::error!("Search #{} failed: {}", id, e);
                SearchView::Error {
                    message: classify_error(&e),
                }
            }
        }
    }
}
