//! Like button: optimistic toggle with rollback, and the likes summary line.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::services::feed_api::FeedApi;
use crate::types::article::{Article, ArticleId, LikeSummary, UserRef};
use crate::types::errors::ActionError;
use crate::ui::markup::escape_html;
use crate::ui::notice::{Notifier, LIKE_FAILED};
use crate::ui::optimistic;

/// Formats the line under the like button from the authoritative count and names.
///
/// Missing names (the server lists at most a handful of likers) read as "Someone".
pub fn format_likes_summary(count: u32, users: &[UserRef]) -> String {
    let name = |i: usize| users.get(i).map(|u| u.username.as_str()).unwrap_or("Someone");
    match count {
        0 => "Be the first to like this".to_string(),
        1 => format!("{} likes this", name(0)),
        2 => format!("{} and {} like this", name(0), name(1)),
        n => {
            let others = n - 1;
            let noun = if others == 1 { "other" } else { "others" };
            format!("{} and {} {}", name(0), others, noun)
        }
    }
}

/// Which heart is visible. There is exactly one at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeGlyph {
    Outline,
    Filled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LikeView {
    liked: bool,
    like_count: u32,
    summary: String,
}

impl LikeView {
    pub fn new(article: &Article) -> Self {
        Self {
            liked: article.user_has_liked,
            like_count: article.like_count,
            summary: format_likes_summary(article.like_count, &article.liked_by_users),
        }
    }

    pub fn liked(&self) -> bool {
        self.liked
    }

    pub fn glyph(&self) -> LikeGlyph {
        if self.liked {
            LikeGlyph::Filled
        } else {
            LikeGlyph::Outline
        }
    }

    pub fn like_count(&self) -> u32 {
        self.like_count
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    fn reconcile(&mut self, summary: &LikeSummary) {
        self.like_count = summary.like_count;
        self.summary = format_likes_summary(summary.like_count, &summary.liked_by_users);
    }

    pub fn render(&self, article_id: ArticleId) -> String {
        let (outline_hidden, filled_hidden) = match self.glyph() {
            LikeGlyph::Outline => ("", " hidden"),
            LikeGlyph::Filled => (" hidden", ""),
        };
        format!(
            concat!(
                "<div class=\"like-region\" data-article-id=\"{id}\">",
                "<button class=\"like-btn{active}\" data-action=\"like\" aria-pressed=\"{pressed}\">",
                "<svg class=\"heart-outline\"{oh} viewBox=\"0 0 24 24\"><path d=\"M12 21l-1.5-1.3C5.4 15.4 2 12.3 2 8.5 2 5.4 4.4 3 7.5 3c1.7 0 3.4.8 4.5 2.1C13.1 3.8 14.8 3 16.5 3 19.6 3 22 5.4 22 8.5c0 3.8-3.4 6.9-8.5 11.2L12 21z\" fill=\"none\" stroke=\"currentColor\"/></svg>",
                "<svg class=\"heart-filled\"{fh} viewBox=\"0 0 24 24\"><path d=\"M12 21l-1.5-1.3C5.4 15.4 2 12.3 2 8.5 2 5.4 4.4 3 7.5 3c1.7 0 3.4.8 4.5 2.1C13.1 3.8 14.8 3 16.5 3 19.6 3 22 5.4 22 8.5c0 3.8-3.4 6.9-8.5 11.2L12 21z\" fill=\"currentColor\"/></svg>",
                "</button>",
                "<p class=\"likes-summary\">{summary}</p>",
                "</div>"
            ),
            id = article_id,
            active = if self.liked { " liked" } else { "" },
            pressed = self.liked,
            oh = outline_hidden,
            fh = filled_hidden,
            summary = escape_html(&self.summary),
        )
    }
}

/// Owns one article's like state. Clones share the same view.
///
/// Overlapping toggles are not serialized: each click flips whatever is
/// visible, and responses may land in any order.
#[derive(Clone)]
pub struct LikeController {
    article_id: ArticleId,
    api: FeedApi,
    notifier: Arc<dyn Notifier>,
    view: Arc<Mutex<LikeView>>,
}

impl LikeController {
    pub fn new(article: &Article, api: FeedApi, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            article_id: article.id,
            api,
            notifier,
            view: Arc::new(Mutex::new(LikeView::new(article))),
        }
    }

    pub fn view(&self) -> LikeView {
        self.view.lock().clone()
    }

    pub fn render(&self) -> String {
        self.view.lock().render(self.article_id)
    }

    /// Flips the heart immediately, then `POST /articles/{id}/like`.
    ///
    /// Success rewrites the summary from the response; failure restores the
    /// pre-click heart and raises one notice.
    pub async fn toggle(&self) -> Result<(), ActionError> {
        let result = optimistic::run(
            &self.view,
            |view| {
                let before = view.liked;
                view.liked = !before;
                before
            },
            self.api.toggle_like(self.article_id),
            |view, summary| view.reconcile(&summary),
            |view, before| view.liked = before,
        )
        .await;

        if let Err(e) = &result {
            log::warn!("like toggle failed for article {}: {}", self.article_id, e);
            self.notifier.alert(LIKE_FAILED);
        }
        result
    }

    /// Re-reads like state from `GET /articles/{id}/likes`, heart included.
    pub async fn refresh(&self) -> Result<(), ActionError> {
        let summary = self.api.likes(self.article_id).await.map_err(|e| {
            log::warn!("likes refresh failed for article {}: {}", self.article_id, e);
            e
        })?;
        let mut view = self.view.lock();
        view.reconcile(&summary);
        if let Some(liked) = summary.user_has_liked {
            view.liked = liked;
        }
        Ok(())
    }
}
