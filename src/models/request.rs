//! Borrow request model and its status lifecycle

use serde::{Deserialize, Serialize};

use super::opt_text;

/// Request lifecycle status.
///
/// `pending -> approved -> toReturn -> returned`, or `pending -> rejected`.
/// Transitions happen on the server; unrecognised values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    ToReturn,
    Returned,
    Other(String),
}

impl RequestStatus {
    /// Wire value of the status
    pub fn as_str(&self) -> &str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::ToReturn => "toReturn",
            RequestStatus::Returned => "returned",
            RequestStatus::Other(raw) => raw,
        }
    }

    /// Badge text
    pub fn label(&self) -> &str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::ToReturn => "To Return",
            RequestStatus::Returned => "Returned",
            RequestStatus::Other(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::Returned)
    }

    /// Actions an admin may take on a request in this status
    pub fn actions(&self) -> &'static [RequestAction] {
        match self {
            RequestStatus::Pending => &[RequestAction::Approve, RequestAction::Reject],
            RequestStatus::Approved | RequestStatus::ToReturn => &[RequestAction::Return],
            RequestStatus::Rejected | RequestStatus::Returned | RequestStatus::Other(_) => &[],
        }
    }
}

impl From<&str> for RequestStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => RequestStatus::Pending,
            "approved" => RequestStatus::Approved,
            "rejected" => RequestStatus::Rejected,
            "toReturn" => RequestStatus::ToReturn,
            "returned" => RequestStatus::Returned,
            other => RequestStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for RequestStatus {
    fn from(s: String) -> Self {
        match RequestStatus::from(s.as_str()) {
            RequestStatus::Other(_) => RequestStatus::Other(s),
            known => known,
        }
    }
}

impl From<RequestStatus> for String {
    fn from(s: RequestStatus) -> Self {
        match s {
            RequestStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Per-request admin action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestAction {
    Approve,
    Reject,
    Return,
}

impl RequestAction {
    /// Trailing path segment of `/api/admin/requests/{id}/{action}`
    pub fn as_path(&self) -> &'static str {
        match self {
            RequestAction::Approve => "approve",
            RequestAction::Reject => "reject",
            RequestAction::Return => "return",
        }
    }

    /// Button text
    pub fn label(&self) -> &'static str {
        match self {
            RequestAction::Approve => "Approve",
            RequestAction::Reject => "Reject",
            RequestAction::Return => "Mark Returned",
        }
    }
}

/// Borrow request as listed in the admin console
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BorrowRequest {
    pub id: i64,
    pub book_title: String,
    #[serde(default, deserialize_with = "opt_text")]
    pub book_cover: Option<String>,
    pub user_name: String,
    pub user_email: String,
    #[serde(default, deserialize_with = "opt_text")]
    pub grade_level: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub section: Option<String>,
    pub book_status: RequestStatus,
    #[serde(default, deserialize_with = "opt_text")]
    pub borrow_date: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub return_date: Option<String>,
}
