use serde::{Deserialize, Serialize};

pub type CommentId = i64;

/// Longest comment body accepted, in characters.
pub const MAX_COMMENT_CHARS: usize = 1000;

/// Longest report reason accepted, in characters.
pub const MAX_REPORT_CHARS: usize = 500;

/// One comment in an article thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentRecord {
    pub id: CommentId,
    pub username: String,
    pub content: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub is_owner: bool,
}

impl CommentRecord {
    pub fn is_edited(&self) -> bool {
        self.updated_at.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Body of `GET /api/articles/{id}/comments`, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentList {
    pub comments: Vec<CommentRecord>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Reason text held while the report modal is open.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub comment_id: CommentId,
    pub reason: String,
}
