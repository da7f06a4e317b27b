//! Article cards: the visual unit for one feed record and its three controllers.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::services::feed_api::FeedApi;
use crate::types::article::{Article, ArticleId};
use crate::ui::comments::CommentController;
use crate::ui::happiness::HappinessController;
use crate::ui::like::LikeController;
use crate::ui::markup::{escape_html, escape_url};
use crate::ui::notice::Notifier;
use crate::ui::report::ReportController;

pub const PLACEHOLDER_GLYPH: &str = "📰";

/// The card's image slot. Falls back to the placeholder when the image is
/// absent or reports a load error.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageRegion {
    Image { url: String, alt: String },
    Placeholder,
}

impl ImageRegion {
    fn render(&self) -> String {
        match self {
            ImageRegion::Image { url, alt } => format!(
                "<div class=\"card-image\"><img src=\"{}\" alt=\"{}\" data-action=\"image-error\"></div>",
                escape_url(url),
                escape_html(alt)
            ),
            ImageRegion::Placeholder => format!(
                "<div class=\"card-image\"><div class=\"placeholder-image\"><span>{}</span></div></div>",
                PLACEHOLDER_GLYPH
            ),
        }
    }
}

/// One mounted article. Controllers are bound at construction and address
/// their own regions directly.
pub struct ArticleCard {
    article_id: ArticleId,
    title: String,
    source_name: String,
    source_url: String,
    published_at: Option<String>,
    description: Option<String>,
    image: Mutex<ImageRegion>,
    pub like: LikeController,
    pub happiness: HappinessController,
    pub comments: CommentController,
}

impl ArticleCard {
    pub fn article_id(&self) -> ArticleId {
        self.article_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn image(&self) -> ImageRegion {
        self.image.lock().clone()
    }

    /// Handles the image element's error signal.
    pub fn on_image_error(&self) {
        let mut image = self.image.lock();
        if *image != ImageRegion::Placeholder {
            log::debug!("image failed for article {}, showing placeholder", self.article_id);
            *image = ImageRegion::Placeholder;
        }
    }

    pub fn render(&self) -> String {
        let mut meta = format!("<span class=\"source\">{}</span>", escape_html(&self.source_name));
        if let Some(date) = &self.published_at {
            meta.push_str(&format!(
                "<span class=\"separator\">•</span><span class=\"date\">{}</span>",
                escape_html(date)
            ));
        }
        let description = self
            .description
            .as_deref()
            .map(|d| format!("<p class=\"description\">{}</p>", escape_html(d)))
            .unwrap_or_default();

        format!(
            concat!(
                "<article class=\"news-card\" data-article-id=\"{id}\">",
                "{image}",
                "<div class=\"card-content\">",
                "<h3>{title}</h3>",
                "<p class=\"meta\">{meta}</p>",
                "{description}",
                "<a class=\"read-more\" href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">Read Full Article →</a>",
                "<div class=\"card-actions\">{like}</div>",
                "{happiness}",
                "{comments}",
                "</div>",
                "</article>"
            ),
            id = self.article_id,
            image = self.image.lock().render(),
            title = escape_html(&self.title),
            meta = meta,
            description = description,
            url = escape_url(&self.source_url),
            like = self.like.render(),
            happiness = self.happiness.render(),
            comments = self.comments.render(),
        )
    }
}

/// Builds cards from feed records, wiring each to the shared API, notifier and report modal.
#[derive(Clone)]
pub struct ArticleCardFactory {
    api: FeedApi,
    notifier: Arc<dyn Notifier>,
    report: Arc<ReportController>,
}

impl ArticleCardFactory {
    pub fn new(api: FeedApi, notifier: Arc<dyn Notifier>, report: Arc<ReportController>) -> Self {
        Self { api, notifier, report }
    }

    pub fn build(&self, article: &Article) -> Arc<ArticleCard> {
        let image = match article.image_url() {
            Some(url) => ImageRegion::Image {
                url: url.to_string(),
                alt: article.title.clone(),
            },
            None => ImageRegion::Placeholder,
        };

        Arc::new(ArticleCard {
            article_id: article.id,
            title: article.title.clone(),
            source_name: article.source_name.clone().unwrap_or_default(),
            source_url: article.source_url.clone(),
            published_at: article.published_at().map(str::to_string),
            description: article.description().map(str::to_string),
            image: Mutex::new(image),
            like: LikeController::new(article, self.api.clone(), self.notifier.clone()),
            happiness: HappinessController::new(article, self.api.clone(), self.notifier.clone()),
            comments: CommentController::new(
                article,
                self.api.clone(),
                self.notifier.clone(),
                self.report.clone(),
            ),
        })
    }
}
