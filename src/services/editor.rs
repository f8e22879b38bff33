//! Admin book editor.
//!
//! Loads a book into an editable form whose visible fields depend on the
//! book type, and submits the form back as a full update. Cover and file
//! uploads are handled elsewhere.

use crate::{
    api::LibraryApi,
    error::{AppError, AppResult},
    models::{Book, BookKind, BookType, BookUpdate},
};

use super::{catalog::CatalogView, Notice};

/// Type-dependent form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Level,
    Strand,
    Qtr,
    Genre,
}

const MODULE_FIELDS: &[EditField] = &[EditField::Level, EditField::Qtr, EditField::Strand];
const NOVEL_FIELDS: &[EditField] = &[EditField::Genre];

/// Edit form contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookEditForm {
    pub id: i64,
    pub title: String,
    pub book_type: BookType,
    pub level: String,
    pub strand: String,
    pub qtr: String,
    pub genre: String,
    pub quantity: u32,
    pub publisher: String,
    pub description: String,
    pub author: String,
    pub link: String,
}

impl BookEditForm {
    pub fn from_book(book: &Book) -> Self {
        let text = |v: Option<&str>| v.unwrap_or_default().to_string();
        let (level, strand, qtr, genre) = match &book.kind {
            BookKind::Module { level, strand, qtr } => (
                text(level.as_deref()),
                text(strand.as_deref()),
                text(qtr.as_deref()),
                String::new(),
            ),
            BookKind::Novel { genre, .. } => (String::new(), String::new(), String::new(), text(genre.as_deref())),
        };

        Self {
            id: book.id,
            title: book.title.clone(),
            book_type: book.book_type(),
            level,
            strand,
            qtr,
            genre,
            quantity: book.quantity,
            publisher: text(book.publisher.as_deref()),
            description: text(book.description.as_deref()),
            author: text(book.author.as_deref()),
            link: text(book.link.as_deref()),
        }
    }

    /// Fields shown for the current book type
    pub fn visible_fields(&self) -> &'static [EditField] {
        match self.book_type {
            BookType::Module => MODULE_FIELDS,
            BookType::Novel => NOVEL_FIELDS,
        }
    }

    pub fn set_book_type(&mut self, book_type: BookType) {
        self.book_type = book_type;
    }

    /// Request body; fields hidden for the book type are sent empty.
    pub fn to_update(&self) -> AppResult<BookUpdate> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }

        let visible = self.visible_fields();
        let keep = |field: EditField, value: &str| {
            if visible.contains(&field) {
                value.trim().to_string()
            } else {
                String::new()
            }
        };

        Ok(BookUpdate {
            title: title.to_string(),
            description: self.description.clone(),
            quantity: self.quantity,
            publisher: self.publisher.clone(),
            book_type: self.book_type,
            level: keep(EditField::Level, &self.level),
            strand: keep(EditField::Strand, &self.strand),
            qtr: keep(EditField::Qtr, &self.qtr),
            genre: keep(EditField::Genre, &self.genre),
            author: self.author.clone(),
            link: self.link.clone(),
        })
    }
}

pub struct BookEditor<'a> {
    api: &'a dyn LibraryApi,
}

impl<'a> BookEditor<'a> {
    pub fn new(api: &'a dyn LibraryApi) -> Self {
        Self { api }
    }

    pub async fn open(&self, id: i64) -> Result<BookEditForm, Notice> {
        match self.api.get_admin_book(id).await {
            Ok(book) => Ok(BookEditForm::from_book(&book)),
            Err(e) => {
                tracing::error!("Error loading book {} for edit: {}", id, e);
                Err(Notice::error("Failed to load book details. Please try again."))
            }
        }
    }

    /// Send the form and reload the catalog on success
    pub async fn submit(&self, form: &BookEditForm, catalog: &mut CatalogView) -> Result<Notice, Notice> {
        let result = match form.to_update() {
            Ok(update) => self.api.update_book(form.id, &update).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::error!("Error updating book {}: {}", form.id, e);
            return Err(Notice::error(e.user_message("Failed to update book")));
        }

        tracing::info!("Book {} updated", form.id);
        if let Err(e) = catalog.load(self.api).await {
            tracing::warn!("Catalog reload after edit failed: {}", e);
        }
        Ok(Notice::success("Book updated successfully"))
    }
}
