//! Comment thread: lazy load, post, in-place edit, delete, and the report entry point.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::services::feed_api::FeedApi;
use crate::types::article::{Article, ArticleId};
use crate::types::comment::{CommentId, CommentList, CommentRecord, MAX_COMMENT_CHARS};
use crate::types::errors::{ActionError, ValidationError};
use crate::ui::markup::{char_counter, escape_html};
use crate::ui::notice::{
    Notifier, COMMENT_DELETE_CONFIRM, COMMENT_DELETE_FAILED, COMMENT_EDIT_FAILED,
    COMMENT_POST_FAILED,
};
use crate::ui::optimistic;
use crate::ui::report::ReportController;

pub const NO_COMMENTS_TEXT: &str = "No comments yet. Be the first to comment!";

/// Trims `content` and checks it is non-empty and within the comment limit.
pub fn validate_comment(content: &str) -> Result<String, ValidationError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty("Comment"));
    }
    let actual = trimmed.chars().count();
    if actual > MAX_COMMENT_CHARS {
        return Err(ValidationError::TooLong {
            field: "Comment",
            max: MAX_COMMENT_CHARS,
            actual,
        });
    }
    Ok(trimmed.to_string())
}

fn render_comment(record: &CommentRecord, can_delete: bool) -> String {
    let mut actions = String::new();
    if record.is_owner {
        actions.push_str("<button class=\"comment-edit\" data-action=\"comment-edit\">Edit</button>");
    }
    if can_delete {
        actions.push_str("<button class=\"comment-delete\" data-action=\"comment-delete\">Delete</button>");
    }
    if !record.is_owner {
        actions.push_str("<button class=\"comment-report\" data-action=\"comment-report\">Report</button>");
    }
    let edited = if record.is_edited() {
        " <span class=\"comment-edited\">(edited)</span>"
    } else {
        ""
    };
    format!(
        concat!(
            "<div class=\"comment\" data-comment-id=\"{id}\">",
            "<div class=\"comment-header\"><span class=\"comment-author\">{user}</span>",
            "<span class=\"comment-date\">{date}</span>{edited}</div>",
            "<p class=\"comment-content\">{content}</p>",
            "<div class=\"comment-actions\">{actions}</div>",
            "</div>"
        ),
        id = record.id,
        user = escape_html(&record.username),
        date = escape_html(&record.created_at),
        edited = edited,
        content = escape_html(&record.content),
        actions = actions,
    )
}

/// In-place editor state. `retained` is the markup shown before editing began.
#[derive(Debug, Clone, PartialEq)]
pub struct EditState {
    pub draft: String,
    pub save_enabled: bool,
    retained: String,
}

/// One rendered comment, `Viewing` when `editing` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentNode {
    record: CommentRecord,
    can_delete: bool,
    markup: String,
    editing: Option<EditState>,
}

impl CommentNode {
    fn new(record: CommentRecord, viewer_is_admin: bool) -> Self {
        let can_delete = record.is_owner || viewer_is_admin;
        let markup = render_comment(&record, can_delete);
        Self {
            record,
            can_delete,
            markup,
            editing: None,
        }
    }

    pub fn record(&self) -> &CommentRecord {
        &self.record
    }

    pub fn id(&self) -> CommentId {
        self.record.id
    }

    pub fn can_delete(&self) -> bool {
        self.can_delete
    }

    pub fn editing(&self) -> Option<&EditState> {
        self.editing.as_ref()
    }

    pub fn render(&self) -> String {
        match &self.editing {
            None => self.markup.clone(),
            Some(edit) => format!(
                concat!(
                    "<div class=\"comment editing\" data-comment-id=\"{id}\">",
                    "<textarea class=\"comment-edit-input\" maxlength=\"{max}\">{draft}</textarea>",
                    "<span class=\"char-counter\">{counter}</span>",
                    "<button class=\"comment-save\" data-action=\"comment-save\"{disabled}>Save</button>",
                    "<button class=\"comment-cancel\" data-action=\"comment-cancel\">Cancel</button>",
                    "</div>"
                ),
                id = self.record.id,
                max = MAX_COMMENT_CHARS,
                draft = escape_html(&edit.draft),
                counter = char_counter(&edit.draft, MAX_COMMENT_CHARS),
                disabled = if edit.save_enabled { "" } else { " disabled" },
            ),
        }
    }
}

/// Everything drawn inside one article's comments section.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentThreadView {
    expanded: bool,
    count: u32,
    nodes: Vec<CommentNode>,
    listed: bool,
    viewer_is_admin: bool,
    draft: String,
    submit_enabled: bool,
    inline_error: Option<String>,
    load_failed: bool,
}

impl CommentThreadView {
    pub fn new(article: &Article) -> Self {
        Self {
            expanded: false,
            count: article.comment_count,
            nodes: Vec::new(),
            listed: false,
            viewer_is_admin: false,
            draft: String::new(),
            submit_enabled: true,
            inline_error: None,
            load_failed: false,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// The number shown next to the comments toggle.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Comments in display order, newest first.
    pub fn nodes(&self) -> &[CommentNode] {
        &self.nodes
    }

    pub fn node(&self, comment_id: CommentId) -> Option<&CommentNode> {
        self.nodes.iter().find(|n| n.id() == comment_id)
    }

    fn node_mut(&mut self, comment_id: CommentId) -> Option<&mut CommentNode> {
        self.nodes.iter_mut().find(|n| n.id() == comment_id)
    }

    pub fn shows_placeholder(&self) -> bool {
        self.listed && self.nodes.is_empty()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn counter(&self) -> String {
        char_counter(&self.draft, MAX_COMMENT_CHARS)
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn inline_error(&self) -> Option<&str> {
        self.inline_error.as_deref()
    }

    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    fn replace_list(&mut self, list: CommentList) {
        self.viewer_is_admin = list.is_admin;
        self.nodes = list
            .comments
            .into_iter()
            .map(|record| CommentNode::new(record, list.is_admin))
            .collect();
        self.listed = true;
        self.load_failed = false;
    }

    pub fn render(&self, article_id: ArticleId) -> String {
        let body = if !self.expanded {
            String::new()
        } else {
            let mut list = String::new();
            if self.load_failed {
                list.push_str("<p class=\"comments-error\">Failed to load comments.</p>");
            } else if self.shows_placeholder() {
                list.push_str(&format!("<p class=\"no-comments\">{}</p>", NO_COMMENTS_TEXT));
            }
            for node in &self.nodes {
                list.push_str(&node.render());
            }
            let error = self
                .inline_error
                .as_deref()
                .map(|e| format!("<p class=\"form-error\">{}</p>", escape_html(e)))
                .unwrap_or_default();
            format!(
                concat!(
                    "<div class=\"comment-form\">",
                    "<textarea class=\"comment-input\" maxlength=\"{max}\" placeholder=\"Write a comment...\">{draft}</textarea>",
                    "<span class=\"char-counter\">{counter}</span>{error}",
                    "<button class=\"comment-submit\" data-action=\"comment-post\"{disabled}>Post</button>",
                    "</div>",
                    "<div class=\"comments-list\">{list}</div>"
                ),
                max = MAX_COMMENT_CHARS,
                draft = escape_html(&self.draft),
                counter = self.counter(),
                error = error,
                disabled = if self.submit_enabled { "" } else { " disabled" },
                list = list,
            )
        };
        format!(
            concat!(
                "<section class=\"comments-section\" data-article-id=\"{id}\">",
                "<button class=\"comments-toggle\" data-action=\"comments-toggle\" aria-expanded=\"{expanded}\">",
                "💬 <span class=\"comment-count\">{count}</span> Comments</button>",
                "<div class=\"comments-body\"{hidden}>{body}</div>",
                "</section>"
            ),
            id = article_id,
            expanded = self.expanded,
            count = self.count,
            hidden = if self.expanded { "" } else { " hidden" },
            body = body,
        )
    }
}

/// Owns one article's comment thread. Clones share the same view.
#[derive(Clone)]
pub struct CommentController {
    article_id: ArticleId,
    api: FeedApi,
    notifier: Arc<dyn Notifier>,
    report: Arc<ReportController>,
    view: Arc<Mutex<CommentThreadView>>,
}

impl CommentController {
    pub fn new(
        article: &Article,
        api: FeedApi,
        notifier: Arc<dyn Notifier>,
        report: Arc<ReportController>,
    ) -> Self {
        Self {
            article_id: article.id,
            api,
            notifier,
            report,
            view: Arc::new(Mutex::new(CommentThreadView::new(article))),
        }
    }

    pub fn view(&self) -> CommentThreadView {
        self.view.lock().clone()
    }

    pub fn render(&self) -> String {
        self.view.lock().render(self.article_id)
    }

    /// Shows or hides the thread. Expanding an empty list fetches it.
    pub async fn toggle(&self) -> Result<(), ActionError> {
        let needs_load = {
            let mut view = self.view.lock();
            view.expanded = !view.expanded;
            view.expanded && view.nodes.is_empty()
        };
        if needs_load {
            self.load().await?;
        }
        Ok(())
    }

    /// `GET /articles/{id}/comments`, replacing the rendered list.
    pub async fn load(&self) -> Result<(), ActionError> {
        self.fetch(true).await
    }

    /// A failed fetch only shows the error banner when `flag_failure` is set;
    /// otherwise the current list stays as it is.
    async fn fetch(&self, flag_failure: bool) -> Result<(), ActionError> {
        match self.api.comments(self.article_id).await {
            Ok(list) => {
                self.view.lock().replace_list(list);
                Ok(())
            }
            Err(e) => {
                log::warn!("loading comments failed for article {}: {}", self.article_id, e);
                if flag_failure {
                    self.view.lock().load_failed = true;
                }
                Err(e)
            }
        }
    }

    pub fn set_draft(&self, text: &str) {
        let mut view = self.view.lock();
        view.draft = text.to_string();
        view.inline_error = None;
    }

    /// `POST /articles/{id}/comments` with the current draft.
    ///
    /// Success clears the input, puts the comment on top and bumps the shown
    /// count by one. Failure keeps the typed text for a retry.
    pub async fn post(&self) -> Result<(), ActionError> {
        let content = {
            let mut view = self.view.lock();
            match validate_comment(&view.draft) {
                Ok(content) => {
                    view.inline_error = None;
                    content
                }
                Err(e) => {
                    view.inline_error = Some(e.to_string());
                    return Err(e.into());
                }
            }
        };

        let result = optimistic::run(
            &self.view,
            |view| view.submit_enabled = false,
            self.api.post_comment(self.article_id, &content),
            |view, record| {
                view.submit_enabled = true;
                view.draft.clear();
                let node = CommentNode::new(record, view.viewer_is_admin);
                view.nodes.insert(0, node);
                view.count += 1;
            },
            |view, ()| view.submit_enabled = true,
        )
        .await;

        if let Err(e) = &result {
            log::warn!("posting comment failed for article {}: {}", self.article_id, e);
            self.notifier.alert(COMMENT_POST_FAILED);
        }
        result
    }

    /// Swaps the comment text for an editor seeded with the current content.
    pub fn begin_edit(&self, comment_id: CommentId) -> Result<(), ActionError> {
        let mut view = self.view.lock();
        let Some(node) = view.node_mut(comment_id) else {
            return Ok(());
        };
        if !node.record.is_owner {
            return Err(ValidationError::NotOwner(comment_id).into());
        }
        if node.editing.is_none() {
            node.editing = Some(EditState {
                draft: node.record.content.clone(),
                save_enabled: true,
                retained: std::mem::take(&mut node.markup),
            });
        }
        Ok(())
    }

    pub fn set_edit_draft(&self, comment_id: CommentId, text: &str) {
        let mut view = self.view.lock();
        if let Some(edit) = view.node_mut(comment_id).and_then(|n| n.editing.as_mut()) {
            edit.draft = text.to_string();
        }
    }

    /// Restores the pre-edit markup without a request.
    pub fn cancel_edit(&self, comment_id: CommentId) {
        let mut view = self.view.lock();
        if let Some(node) = view.node_mut(comment_id) {
            if let Some(edit) = node.editing.take() {
                node.markup = edit.retained;
            }
        }
    }

    /// `PUT /comments/{id}`, then reloads the whole thread.
    ///
    /// On failure the editor stays open with the text intact.
    pub async fn save_edit(&self, comment_id: CommentId) -> Result<(), ActionError> {
        let content = {
            let view = self.view.lock();
            let Some(edit) = view.node(comment_id).and_then(|n| n.editing.as_ref()) else {
                return Ok(());
            };
            validate_comment(&edit.draft)?
        };

        let result = optimistic::run(
            &self.view,
            |view| {
                if let Some(edit) = view.node_mut(comment_id).and_then(|n| n.editing.as_mut()) {
                    edit.save_enabled = false;
                }
            },
            self.api.edit_comment(comment_id, &content),
            |view, ()| {
                let admin = view.viewer_is_admin;
                if let Some(node) = view.node_mut(comment_id) {
                    let mut record = node.record.clone();
                    record.content = content.clone();
                    *node = CommentNode::new(record, admin);
                }
            },
            |view, ()| {
                if let Some(edit) = view.node_mut(comment_id).and_then(|n| n.editing.as_mut()) {
                    edit.save_enabled = true;
                }
            },
        )
        .await;

        match result {
            Ok(()) => {
                // The reload failing leaves the locally updated comment in place.
                let _ = self.fetch(false).await;
                Ok(())
            }
            Err(e) => {
                log::warn!("editing comment {} failed: {}", comment_id, e);
                self.notifier.alert(COMMENT_EDIT_FAILED);
                Err(e)
            }
        }
    }

    /// Asks for confirmation, then `DELETE /comments/{id}`.
    ///
    /// Returns `Ok(false)` if the user declined. The shown count never goes
    /// below zero and only drops when a node was actually removed.
    pub async fn delete(&self, comment_id: CommentId) -> Result<bool, ActionError> {
        if !self.notifier.confirm(COMMENT_DELETE_CONFIRM) {
            return Ok(false);
        }

        let result = optimistic::run(
            &self.view,
            |_| {},
            self.api.delete_comment(comment_id),
            |view, ()| {
                let before = view.nodes.len();
                view.nodes.retain(|n| n.id() != comment_id);
                if view.nodes.len() < before {
                    view.count = view.count.saturating_sub(1);
                }
                view.listed = true;
            },
            |_, ()| {},
        )
        .await;

        match result {
            Ok(()) => Ok(true),
            Err(e) => {
                log::warn!("deleting comment {} failed: {}", comment_id, e);
                self.notifier.alert(COMMENT_DELETE_FAILED);
                Err(e)
            }
        }
    }

    /// Points the shared report modal at `comment_id`.
    pub fn open_report(&self, comment_id: CommentId) {
        self.report.open(comment_id);
    }
}
