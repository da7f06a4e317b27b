//! Report modal: one shared target slot for the whole feed.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::services::feed_api::FeedApi;
use crate::types::comment::{CommentId, ReportDraft, MAX_REPORT_CHARS};
use crate::types::errors::{ActionError, ValidationError};
use crate::ui::markup::{char_counter, escape_html};
use crate::ui::notice::{Notifier, REPORT_FAILED, REPORT_SENT};
use crate::ui::optimistic;

/// Validates a report reason. Empty is allowed.
pub fn validate_reason(reason: &str) -> Result<(), ValidationError> {
    let actual = reason.chars().count();
    if actual > MAX_REPORT_CHARS {
        return Err(ValidationError::TooLong {
            field: "Reason",
            max: MAX_REPORT_CHARS,
            actual,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportModal {
    draft: Option<ReportDraft>,
    submit_enabled: bool,
    inline_error: Option<String>,
}

impl Default for ReportModal {
    fn default() -> Self {
        Self {
            draft: None,
            submit_enabled: true,
            inline_error: None,
        }
    }
}

impl ReportModal {
    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    pub fn target(&self) -> Option<CommentId> {
        self.draft.as_ref().map(|d| d.comment_id)
    }

    pub fn draft(&self) -> Option<&ReportDraft> {
        self.draft.as_ref()
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn inline_error(&self) -> Option<&str> {
        self.inline_error.as_deref()
    }

    pub fn counter(&self) -> String {
        let reason = self.draft.as_ref().map(|d| d.reason.as_str()).unwrap_or("");
        char_counter(reason, MAX_REPORT_CHARS)
    }

    pub fn render(&self) -> String {
        let Some(draft) = &self.draft else {
            return "<div id=\"report-modal\" class=\"modal\" hidden></div>".to_string();
        };
        let error = self
            .inline_error
            .as_deref()
            .map(|e| format!("<p class=\"form-error\">{}</p>", escape_html(e)))
            .unwrap_or_default();
        format!(
            concat!(
                "<div id=\"report-modal\" class=\"modal\" data-comment-id=\"{id}\">",
                "<h4>Report comment</h4>",
                "<textarea class=\"report-reason\" maxlength=\"{max}\" placeholder=\"Why are you reporting this comment? (optional)\">{reason}</textarea>",
                "<span class=\"char-counter\">{counter}</span>{error}",
                "<button class=\"report-submit\" data-action=\"report-submit\"{disabled}>Submit Report</button>",
                "<button class=\"report-cancel\" data-action=\"report-cancel\">Cancel</button>",
                "</div>"
            ),
            id = draft.comment_id,
            max = MAX_REPORT_CHARS,
            reason = escape_html(&draft.reason),
            counter = self.counter(),
            error = error,
            disabled = if self.submit_enabled { "" } else { " disabled" },
        )
    }
}

/// Process-wide report flow. Opening a report for one comment replaces any other target.
pub struct ReportController {
    api: FeedApi,
    notifier: Arc<dyn Notifier>,
    modal: Mutex<ReportModal>,
}

impl ReportController {
    pub fn new(api: FeedApi, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            modal: Mutex::new(ReportModal::default()),
        }
    }

    pub fn modal(&self) -> ReportModal {
        self.modal.lock().clone()
    }

    pub fn render(&self) -> String {
        self.modal.lock().render()
    }

    /// Records `comment_id` as the target and resets the reason and counter.
    pub fn open(&self, comment_id: CommentId) {
        let mut modal = self.modal.lock();
        modal.draft = Some(ReportDraft {
            comment_id,
            reason: String::new(),
        });
        modal.submit_enabled = true;
        modal.inline_error = None;
    }

    pub fn set_reason(&self, reason: &str) {
        let mut modal = self.modal.lock();
        if let Some(draft) = modal.draft.as_mut() {
            draft.reason = reason.to_string();
        }
    }

    pub fn cancel(&self) {
        *self.modal.lock() = ReportModal::default();
    }

    /// `POST /comments/{id}/report` for the current target.
    ///
    /// Returns `Ok(false)` when no report is open. On success the modal closes
    /// and a confirmation notice fires; on failure it stays open with the reason intact.
    pub async fn submit(&self) -> Result<bool, ActionError> {
        let draft = {
            let mut modal = self.modal.lock();
            let Some(draft) = modal.draft.clone() else {
                return Ok(false);
            };
            if let Err(e) = validate_reason(&draft.reason) {
                modal.inline_error = Some(e.to_string());
                return Err(e.into());
            }
            modal.inline_error = None;
            draft
        };

        let comment_id = draft.comment_id;
        let reason = draft.reason.trim().to_string();
        let result = optimistic::run(
            &self.modal,
            |modal| modal.submit_enabled = false,
            self.api.report_comment(comment_id, &reason),
            |modal, ()| {
                if modal.target() == Some(comment_id) {
                    *modal = ReportModal::default();
                } else {
                    modal.submit_enabled = true;
                }
            },
            |modal, ()| modal.submit_enabled = true,
        )
        .await;

        match &result {
            Ok(()) => self.notifier.alert(REPORT_SENT),
            Err(e) => {
                log::warn!("report failed for comment {}: {}", comment_id, e);
                self.notifier.alert(REPORT_FAILED);
            }
        }
        result.map(|()| true)
    }
}
