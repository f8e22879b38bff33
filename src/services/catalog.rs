//! Catalog view: filtering, card rendering and cover URL resolution

use crate::{
    api::{Endpoints, LibraryApi},
    error::{AppError, AppResult},
    models::{Book, BookKind, BookType},
};

use super::truncate;

/// Card descriptions longer than this are cut
pub const DESCRIPTION_LIMIT: usize = 50;

const DETAILS_FALLBACK: &str = "No additional details available.";

/// Catalog filter values; `None` and empty text match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogCriteria {
    pub text: String,
    pub book_type: Option<BookType>,
    pub strand: Option<String>,
    pub genre: Option<String>,
    pub level: Option<String>,
}

impl CatalogCriteria {
    pub fn matches(&self, book: &Book) -> bool {
        let term = self.text.to_lowercase();
        let matches_text = term.is_empty()
            || book.title.to_lowercase().contains(&term)
            || book
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term));

        let matches_type = self.book_type.map_or(true, |t| book.book_type() == t);

        // Strand only classifies modules, genre only classifies novels
        let matches_strand = match (&self.strand, &book.kind) {
            (Some(strand), BookKind::Module { .. }) => book.kind.strand() == Some(strand.as_str()),
            _ => true,
        };
        let matches_genre = match (&self.genre, &book.kind) {
            (Some(genre), BookKind::Novel { .. }) => book.kind.genre() == Some(genre.as_str()),
            _ => true,
        };

        let matches_level = self
            .level
            .as_deref()
            .map_or(true, |level| book.kind.level().unwrap_or("") == level);

        matches_text && matches_type && matches_strand && matches_genre && matches_level
    }
}

/// Books matching `criteria`, in catalog order
pub fn filter_books(books: &[Book], criteria: &CatalogCriteria) -> Vec<Book> {
    books.iter().filter(|b| criteria.matches(b)).cloned().collect()
}

/// Resolve a stored cover reference to a displayable URL.
///
/// First match wins:
/// 1. empty -> `""` (no image)
/// 2. `databasecontent/...` -> API base + path
/// 3. `static/...` -> unchanged
/// 4. `./...` or `../...` -> unchanged
/// 5. any other path -> leading slashes stripped
/// 6. bare filename -> cover endpoint URL
pub fn resolve_cover_url(cover: Option<&str>, endpoints: &Endpoints) -> String {
    let cover = match cover {
        Some(c) if !c.is_empty() => c,
        _ => return String::new(),
    };

    if cover.starts_with("databasecontent/") {
        format!("{}/{}", endpoints.api_base(), cover)
    } else if cover.starts_with("static/") || cover.starts_with("./") || cover.starts_with("../") {
        cover.to_string()
    } else if cover.contains('/') {
        cover.trim_start_matches('/').to_string()
    } else {
        endpoints.cover(cover)
    }
}

/// Compact type label, e.g. `Module - STEM - Grade 10 - Quarter 2` or `Novel - SciFi`
pub fn book_info_label(book: &Book) -> String {
    let book_type = book.book_type();
    match &book.kind {
        BookKind::Novel { genre: Some(genre), .. } => format!("{} - {}", book_type, genre),
        BookKind::Novel { genre: None, .. } => book_type.to_string(),
        BookKind::Module { level, strand, qtr } => {
            let mut parts = vec![book_type.to_string()];
            parts.extend(strand.clone());
            parts.extend(level.as_ref().map(|l| format!("Grade {}", l)));
            parts.extend(qtr.as_ref().map(|q| q.replacen("qtr", "Quarter ", 1)));
            parts.join(" - ")
        }
    }
}

/// Card description: `None` when there is nothing to show
pub fn truncate_description(description: Option<&str>) -> Option<String> {
    description
        .filter(|d| !d.is_empty())
        .map(|d| truncate(d, DESCRIPTION_LIMIT))
}

/// One catalog card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCard {
    pub id: i64,
    pub title: String,
    pub cover_url: Option<String>,
    pub info: String,
    /// `Author: ...`, novels only
    pub author_line: Option<String>,
    pub publisher_line: Option<String>,
    pub description: Option<String>,
}

pub fn render_card(book: &Book, endpoints: &Endpoints) -> CatalogCard {
    let cover_url = resolve_cover_url(book.cover.as_deref(), endpoints);
    let author_line = match (&book.kind, &book.author) {
        (BookKind::Novel { .. }, Some(author)) => Some(format!("Author: {}", author)),
        _ => None,
    };

    CatalogCard {
        id: book.id,
        title: book.title.clone(),
        cover_url: (!cover_url.is_empty()).then_some(cover_url),
        info: book_info_label(book),
        author_line,
        publisher_line: book.publisher.as_ref().map(|p| format!("Publisher: {}", p)),
        description: truncate_description(book.description.as_deref()),
    }
}

pub fn render_books(books: &[Book], endpoints: &Endpoints) -> Vec<CatalogCard> {
    books.iter().map(|b| render_card(b, endpoints)).collect()
}

/// Rendered catalog page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    pub cards: Vec<CatalogCard>,
    pub error: Option<String>,
}

/// Catalog state for one page view: the last fetched catalog and the
/// subset matching the current criteria.
#[derive(Debug, Clone)]
pub struct CatalogView {
    endpoints: Endpoints,
    all: Vec<Book>,
    filtered: Vec<Book>,
    criteria: CatalogCriteria,
    error: Option<String>,
}

impl CatalogView {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            all: Vec::new(),
            filtered: Vec::new(),
            criteria: CatalogCriteria::default(),
            error: None,
        }
    }

    pub fn all(&self) -> &[Book] {
        &self.all
    }

    pub fn filtered(&self) -> &[Book] {
        &self.filtered
    }

    pub fn criteria(&self) -> &CatalogCriteria {
        &self.criteria
    }

    /// Fetch the catalog and show all of it.
    /// On failure the previous collections stay and the page shows an error.
    pub async fn load(&mut self, api: &dyn LibraryApi) -> AppResult<()> {
        match api.list_books().await {
            Ok(books) => {
                tracing::info!("Loaded {} books", books.len());
                self.filtered = books.clone();
                self.all = books;
                self.criteria = CatalogCriteria::default();
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error loading books: {}", e);
                let message = match e {
                    AppError::Http { .. } => "Failed to load books. Please try again later.",
                    _ => "Error loading books. Please check your connection.",
                };
                self.error = Some(message.to_string());
                Err(e)
            }
        }
    }

    /// Replace the criteria and rebuild the filtered subset
    pub fn apply(&mut self, criteria: CatalogCriteria) {
        self.filtered = filter_books(&self.all, &criteria);
        tracing::debug!("Catalog filter kept {}/{} books", self.filtered.len(), self.all.len());
        self.criteria = criteria;
    }

    pub fn render(&self) -> CatalogPage {
        CatalogPage {
            cards: render_books(&self.filtered, &self.endpoints),
            error: self.error.clone(),
        }
    }

    /// Full record for the detail popup. When the detail call fails the
    /// cached catalog record is used with a placeholder description.
    pub async fn details(&self, api: &dyn LibraryApi, id: i64) -> AppResult<Book> {
        match api.get_book(id).await {
            Ok(book) => Ok(book),
            Err(e) => {
                tracing::error!("Error fetching book details for {}: {}", id, e);
                let mut cached = self.all.iter().find(|b| b.id == id).cloned().ok_or(e)?;
                cached.description = Some(DETAILS_FALLBACK.to_string());
                Ok(cached)
            }
        }
    }
}
