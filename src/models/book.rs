//! Book (catalog entry) model and related types.
//!
//! The backend stores Modules and Novels in one flat record; only the fields
//! belonging to the record's `bookType` are meaningful, so decoding folds the
//! flat record into a [`BookKind`] and discards the other variant's fields.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{count, opt_text};
use crate::error::AppError;

/// Book type as stored in the `bookType` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum BookType {
    #[default]
    Module,
    Novel,
}

impl BookType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookType::Module => "Module",
            BookType::Novel => "Novel",
        }
    }
}

impl FromStr for BookType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Module" => Ok(BookType::Module),
            "Novel" => Ok(BookType::Novel),
            other => Err(AppError::Validation(format!("Unknown book type: {}", other))),
        }
    }
}

impl std::fmt::Display for BookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Type-specific classification of a book
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookKind {
    /// Curriculum module: grade level, strand and quarter code (`qtrN`)
    Module {
        level: Option<String>,
        strand: Option<String>,
        qtr: Option<String>,
    },
    /// Leisure reading, classified by genre. A level sent for a novel is
    /// kept for filtering but never shown.
    Novel {
        genre: Option<String>,
        level: Option<String>,
    },
}

impl BookKind {
    pub fn book_type(&self) -> BookType {
        match self {
            BookKind::Module { .. } => BookType::Module,
            BookKind::Novel { .. } => BookType::Novel,
        }
    }

    pub fn is_novel(&self) -> bool {
        matches!(self, BookKind::Novel { .. })
    }

    pub fn level(&self) -> Option<&str> {
        match self {
            BookKind::Module { level, .. } | BookKind::Novel { level, .. } => level.as_deref(),
        }
    }

    pub fn strand(&self) -> Option<&str> {
        match self {
            BookKind::Module { strand, .. } => strand.as_deref(),
            BookKind::Novel { .. } => None,
        }
    }

    pub fn qtr(&self) -> Option<&str> {
        match self {
            BookKind::Module { qtr, .. } => qtr.as_deref(),
            BookKind::Novel { .. } => None,
        }
    }

    pub fn genre(&self) -> Option<&str> {
        match self {
            BookKind::Novel { genre, .. } => genre.as_deref(),
            BookKind::Module { .. } => None,
        }
    }
}

/// Catalog entry as displayed by the client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "BookRecord")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub link: Option<String>,
    pub cover: Option<String>,
    pub quantity: u32,
    pub kind: BookKind,
}

impl Book {
    pub fn book_type(&self) -> BookType {
        self.kind.book_type()
    }
}

/// Flat wire representation of a book
#[derive(Debug, Deserialize)]
struct BookRecord {
    id: i64,
    title: String,
    #[serde(default, deserialize_with = "opt_text")]
    description: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    author: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    publisher: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    link: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    cover: Option<String>,
    #[serde(default, deserialize_with = "count")]
    quantity: u32,
    #[serde(rename = "bookType", default, deserialize_with = "opt_text")]
    book_type: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    level: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    strand: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    qtr: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    genre: Option<String>,
}

impl From<BookRecord> for Book {
    fn from(r: BookRecord) -> Self {
        let book_type = match r.book_type.as_deref() {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Book {} has unknown type {:?}, shelving as Module", r.id, raw);
                BookType::Module
            }),
            None => BookType::default(),
        };
        let kind = match book_type {
            BookType::Novel => BookKind::Novel {
                genre: r.genre,
                level: r.level,
            },
            BookType::Module => BookKind::Module {
                level: r.level,
                strand: r.strand,
                qtr: r.qtr,
            },
        };

        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            author: r.author,
            publisher: r.publisher,
            link: r.link,
            cover: r.cover,
            quantity: r.quantity,
            kind,
        }
    }
}

/// Update book request body (`PUT /api/admin/books/{id}`).
///
/// Fields that do not apply to the book type are sent as empty strings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BookUpdate {
    pub title: String,
    pub description: String,
    pub quantity: u32,
    pub publisher: String,
    #[serde(rename = "bookType")]
    pub book_type: BookType,
    pub level: String,
    pub strand: String,
    pub qtr: String,
    pub genre: String,
    pub author: String,
    pub link: String,
}
