//! Typed wrapper over the backend endpoints.
//!
//! Every interaction endpoint answers with a `success` flag; `success: false`
//! becomes `ActionError::Business` carrying the server's `error` text.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::services::http_client::{HttpMethod, Transport};
use crate::types::article::{Article, ArticleId, HappinessSummary, LikeSummary};
use crate::types::comment::{CommentId, CommentList, CommentRecord};
use crate::types::errors::{ActionError, NetworkError};

/// Typed client shared by every controller. Cheap to clone.
#[derive(Clone)]
pub struct FeedApi {
    transport: Arc<dyn Transport>,
}

impl FeedApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `GET /api/feed?page=N`. An empty list means the feed is exhausted.
    pub async fn feed_page(&self, page: u32) -> Result<Vec<Article>, ActionError> {
        let value = self
            .transport
            .call(HttpMethod::Get, &format!("/feed?page={}", page), None)
            .await?;
        decode(value)
    }

    pub async fn toggle_like(&self, article_id: ArticleId) -> Result<LikeSummary, ActionError> {
        self.envelope(HttpMethod::Post, format!("/articles/{}/like", article_id), None)
            .await
    }

    pub async fn likes(&self, article_id: ArticleId) -> Result<LikeSummary, ActionError> {
        self.envelope(HttpMethod::Get, format!("/articles/{}/likes", article_id), None)
            .await
    }

    pub async fn comments(&self, article_id: ArticleId) -> Result<CommentList, ActionError> {
        self.envelope(HttpMethod::Get, format!("/articles/{}/comments", article_id), None)
            .await
    }

    pub async fn post_comment(
        &self,
        article_id: ArticleId,
        content: &str,
    ) -> Result<CommentRecord, ActionError> {
        let value = self
            .checked(
                HttpMethod::Post,
                format!("/articles/{}/comments", article_id),
                Some(json!({ "content": content })),
            )
            .await?;
        let comment = value
            .get("comment")
            .cloned()
            .ok_or_else(|| NetworkError::Decode("missing `comment` field".to_string()))?;
        decode(comment)
    }

    pub async fn edit_comment(&self, comment_id: CommentId, content: &str) -> Result<(), ActionError> {
        self.checked(
            HttpMethod::Put,
            format!("/comments/{}", comment_id),
            Some(json!({ "content": content })),
        )
        .await
        .map(|_| ())
    }

    pub async fn delete_comment(&self, comment_id: CommentId) -> Result<(), ActionError> {
        self.checked(HttpMethod::Delete, format!("/comments/{}", comment_id), None)
            .await
            .map(|_| ())
    }

    pub async fn report_comment(&self, comment_id: CommentId, reason: &str) -> Result<(), ActionError> {
        self.checked(
            HttpMethod::Post,
            format!("/comments/{}/report", comment_id),
            Some(json!({ "reason": reason })),
        )
        .await
        .map(|_| ())
    }

    pub async fn rate_happiness(
        &self,
        article_id: ArticleId,
        rating: u8,
    ) -> Result<HappinessSummary, ActionError> {
        self.envelope(
            HttpMethod::Post,
            format!("/articles/{}/happiness", article_id),
            Some(json!({ "rating": rating })),
        )
        .await
    }

    pub async fn happiness(&self, article_id: ArticleId) -> Result<HappinessSummary, ActionError> {
        self.envelope(HttpMethod::Get, format!("/articles/{}/happiness", article_id), None)
            .await
    }

    pub async fn mark_read(&self, article_id: ArticleId) -> Result<(), ActionError> {
        self.checked(HttpMethod::Post, format!("/articles/{}/mark-read", article_id), None)
            .await
            .map(|_| ())
    }

    /// Issues the call and rejects `success: false` bodies.
    async fn checked(
        &self,
        method: HttpMethod,
        path: String,
        body: Option<Value>,
    ) -> Result<Value, ActionError> {
        let value = self.transport.call(method, &path, body).await?;
        match value.get("success").and_then(Value::as_bool) {
            Some(true) => Ok(value),
            _ => {
                let reason = value
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("request was not successful")
                    .to_string();
                log::warn!("{} {} unsuccessful: {}", method.as_str(), path, reason);
                Err(ActionError::Business(reason))
            }
        }
    }

    /// `checked` followed by decoding the whole body into `T`.
    async fn envelope<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: String,
        body: Option<Value>,
    ) -> Result<T, ActionError> {
        let value = self.checked(method, path, body).await?;
        decode(value)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ActionError> {
    serde_json::from_value(value)
        .map_err(|e| ActionError::Network(NetworkError::Decode(e.to_string())))
}
