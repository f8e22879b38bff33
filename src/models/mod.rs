//! Data models for Libdesk

pub mod book;
pub mod request;
pub mod search;

// Re-export commonly used types
pub use book::{Book, BookKind, BookType, BookUpdate};
pub use request::{BorrowRequest, RequestAction, RequestStatus};
pub use search::{SearchCriteria, SearchForm, SearchHit, SearchResponse};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Optional text field that the backend may send as a string, a number or null.
/// Empty strings are treated as absent.
pub(crate) fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s).filter(|s| !s.is_empty()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Non-negative count sent as a number or a numeric string; anything else is 0.
pub(crate) fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let n = match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    };
    Ok(u32::try_from(n.max(0)).unwrap_or(u32::MAX))
}
