//! Happiness meter: live slider preview, commit on release, authoritative re-render.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::services::feed_api::FeedApi;
use crate::types::article::{Article, ArticleId, HappinessSummary};
use crate::types::errors::{ActionError, ValidationError};
use crate::ui::notice::{Notifier, RATING_FAILED};
use crate::ui::optimistic;

/// Emoji for a percentage. Zero shares the neutral face; "no rating yet" is told by the count text.
pub fn happiness_emoji(percentage: u8) -> &'static str {
    match percentage {
        80.. => "🤩",
        60..=79 => "😃",
        40..=59 => "😊",
        20..=39 => "🙂",
        _ => "😐",
    }
}

pub fn rating_count_text(count: u32) -> String {
    match count {
        0 => "Be the first to rate this post!".to_string(),
        1 => "1 person rated this".to_string(),
        n => format!("{} people rated this", n),
    }
}

/// What the meter currently paints.
///
/// `display` drives the percentage text, bar width and emoji; during a drag it
/// holds the preview value, otherwise the last server-confirmed average.
#[derive(Debug, Clone, PartialEq)]
pub struct HappinessView {
    display: u8,
    slider: u8,
    average: u8,
    count: u32,
    user_rating: Option<u8>,
}

impl HappinessView {
    pub fn new(article: &Article) -> Self {
        Self {
            display: article.happiness_average.min(100),
            slider: article.user_happiness_rating.unwrap_or(0).min(100),
            average: article.happiness_average.min(100),
            count: article.happiness_count,
            user_rating: article.user_happiness_rating,
        }
    }

    pub fn display(&self) -> u8 {
        self.display
    }

    pub fn slider(&self) -> u8 {
        self.slider
    }

    pub fn average(&self) -> u8 {
        self.average
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn user_rating(&self) -> Option<u8> {
        self.user_rating
    }

    pub fn emoji(&self) -> &'static str {
        happiness_emoji(self.display)
    }

    pub fn count_text(&self) -> String {
        rating_count_text(self.count)
    }

    fn paint_preview(&mut self, value: u8) {
        self.display = value;
        self.slider = value;
    }

    fn reconcile(&mut self, summary: &HappinessSummary, submitted: u8) {
        let average = summary.happiness_average.min(100);
        self.average = average;
        self.display = average;
        self.count = summary.happiness_count;
        self.user_rating = summary.user_happiness_rating;
        self.slider = summary.user_happiness_rating.unwrap_or(submitted).min(100);
    }

    /// Emoji and percentage line.
    pub fn render_header(&self) -> String {
        format!(
            concat!(
                "<div class=\"happiness-header\"><span class=\"happiness-emoji\">{emoji}</span>",
                "<span class=\"happiness-percentage\">{p}%</span></div>"
            ),
            emoji = self.emoji(),
            p = self.display,
        )
    }

    pub fn render_bar(&self) -> String {
        format!(
            "<div class=\"happiness-bar\"><div class=\"happiness-fill\" style=\"width: {}%\"></div></div>",
            self.display
        )
    }

    pub fn render(&self, article_id: ArticleId) -> String {
        format!(
            concat!(
                "<div class=\"happiness-meter\" data-article-id=\"{id}\">",
                "{header}{bar}",
                "<input type=\"range\" class=\"happiness-slider\" min=\"0\" max=\"100\" value=\"{slider}\">",
                "<p class=\"happiness-count\">{count}</p>",
                "</div>"
            ),
            id = article_id,
            header = self.render_header(),
            bar = self.render_bar(),
            slider = self.slider,
            count = self.count_text(),
        )
    }
}

/// Owns one article's happiness meter. Clones share the same view.
#[derive(Clone)]
pub struct HappinessController {
    article_id: ArticleId,
    api: FeedApi,
    notifier: Arc<dyn Notifier>,
    view: Arc<Mutex<HappinessView>>,
}

impl HappinessController {
    pub fn new(article: &Article, api: FeedApi, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            article_id: article.id,
            api,
            notifier,
            view: Arc::new(Mutex::new(HappinessView::new(article))),
        }
    }

    pub fn view(&self) -> HappinessView {
        self.view.lock().clone()
    }

    pub fn render(&self) -> String {
        self.view.lock().render(self.article_id)
    }

    /// Slider movement: repaint locally, no request.
    pub fn preview(&self, value: u8) {
        self.view.lock().paint_preview(value.min(100));
    }

    /// Slider release: `POST /articles/{id}/happiness`.
    ///
    /// Zero is "not yet rated" and is rejected without a request. On failure
    /// the preview stays painted and a notice is raised.
    pub async fn commit(&self, value: u8) -> Result<(), ActionError> {
        let value = value.min(100);
        if value == 0 {
            return Err(ValidationError::ZeroRating.into());
        }

        let result = optimistic::run(
            &self.view,
            |view| view.paint_preview(value),
            self.api.rate_happiness(self.article_id, value),
            |view, summary| view.reconcile(&summary, value),
            |_, _| {},
        )
        .await;

        if let Err(e) = &result {
            log::warn!("happiness rating failed for article {}: {}", self.article_id, e);
            self.notifier.alert(RATING_FAILED);
        }
        result
    }

    /// Re-reads the meter from `GET /articles/{id}/happiness`.
    pub async fn refresh(&self) -> Result<(), ActionError> {
        let summary = self.api.happiness(self.article_id).await.map_err(|e| {
            log::warn!("happiness refresh failed for article {}: {}", self.article_id, e);
            e
        })?;
        let mut view = self.view.lock();
        let slider = view.slider;
        view.reconcile(&summary, slider);
        Ok(())
    }
}
