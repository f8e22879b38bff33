//! Admin actions on borrow requests.
//!
//! Every action asks for confirmation, makes one mutating call and, when the
//! server accepts it, reloads the whole request list. The local collection is
//! never patched in place: what is displayed always comes from a fetch.

use crate::{api::LibraryApi, models::RequestAction};

use super::{requests::RequestsView, Confirm, Notice};

/// Action triggered from the request console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeskAction {
    Approve(i64),
    Reject(i64),
    Return(i64),
    /// Server-side sweep moving overdue approved requests to `toReturn`
    CheckDue,
}

impl DeskAction {
    pub fn for_request(id: i64, action: RequestAction) -> Self {
        match action {
            RequestAction::Approve => DeskAction::Approve(id),
            RequestAction::Reject => DeskAction::Reject(id),
            RequestAction::Return => DeskAction::Return(id),
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            DeskAction::Approve(_) => "Are you sure you want to approve this request?",
            DeskAction::Reject(_) => "Are you sure you want to reject this request?",
            DeskAction::Return(_) => "Are you sure you want to mark this book as returned?",
            DeskAction::CheckDue => "Check all approved requests for overdue books?",
        }
    }

    fn fallback(&self) -> &'static str {
        match self {
            DeskAction::Approve(_) => "Failed to approve request",
            DeskAction::Reject(_) => "Failed to reject request",
            DeskAction::Return(_) => "Failed to process return",
            DeskAction::CheckDue => "Failed to check due books",
        }
    }

    fn success(&self) -> &'static str {
        match self {
            DeskAction::Approve(_) => "Request approved successfully",
            DeskAction::Reject(_) => "Request rejected successfully",
            DeskAction::Return(_) => "Book marked as returned successfully",
            DeskAction::CheckDue => "Due books checked",
        }
    }
}

/// Result of dispatching a [`DeskAction`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Confirmation refused; nothing was sent
    Cancelled,
    /// The server refused or could not be reached; local state untouched
    Failed(Notice),
    /// The server accepted the action and the list was reloaded
    Applied {
        notice: Notice,
        reload_error: Option<Notice>,
    },
}

pub struct RequestDispatcher<'a> {
    api: &'a dyn LibraryApi,
    confirm: &'a dyn Confirm,
}

impl<'a> RequestDispatcher<'a> {
    pub fn new(api: &'a dyn LibraryApi, confirm: &'a dyn Confirm) -> Self {
        Self { api, confirm }
    }

    pub async fn dispatch(&self, action: DeskAction, view: &mut RequestsView) -> ActionOutcome {
        if !self.confirm.confirm(action.prompt()) {
            tracing::debug!("{:?} cancelled", action);
            return ActionOutcome::Cancelled;
        }

        let result = match action {
            DeskAction::Approve(id) => self.api.update_request(id, RequestAction::Approve).await.map(|_| None),
            DeskAction::Reject(id) => self.api.update_request(id, RequestAction::Reject).await.map(|_| None),
            DeskAction::Return(id) => self.api.update_request(id, RequestAction::Return).await.map(|_| None),
            DeskAction::CheckDue => self.api.check_due().await.map(Some),
        };

        let summary = match result {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!("{:?} failed: {}", action, e);
                return ActionOutcome::Failed(Notice::error(e.user_message(action.fallback())));
            }
        };

        tracing::info!("{:?} applied", action);
        let notice = Notice::success(
            summary
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| action.success().to_string()),
        );

        let reload_error = view
            .load(self.api)
            .await
            .err()
            .map(|_| Notice::error(RequestsView::load_failure_message()));

        ActionOutcome::Applied { notice, reload_error }
    }
}
