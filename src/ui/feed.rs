//! The feed: mounted cards, and the pager that appends pages on demand.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::services::feed_api::FeedApi;
use crate::types::article::{Article, ArticleId};
use crate::types::errors::ActionError;
use crate::ui::card::{ArticleCard, ArticleCardFactory};
use crate::ui::markup::escape_html;
use crate::ui::notice::{Notifier, FEED_LOAD_FAILED};

/// Page 1 is rendered with the shell; the client starts at page 2.
pub const FIRST_CLIENT_PAGE: u32 = 2;

pub const LABEL_LOAD_MORE: &str = "Load More Good News";
pub const LABEL_LOADING: &str = "Loading...";
pub const LABEL_EXHAUSTED: &str = "No More Articles";
pub const LABEL_RETRY: &str = "Try Again";

#[derive(Default)]
struct FeedView {
    cards: Vec<Arc<ArticleCard>>,
    scroll_target: Option<ArticleId>,
}

/// The mounted cards, in feed order. Clones share the same list.
#[derive(Clone, Default)]
pub struct Feed {
    view: Arc<Mutex<FeedView>>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends cards; returns the id of the first one appended.
    pub fn mount(&self, cards: Vec<Arc<ArticleCard>>) -> Option<ArticleId> {
        let first = cards.first().map(|c| c.article_id());
        self.view.lock().cards.extend(cards);
        first
    }

    pub fn card(&self, article_id: ArticleId) -> Option<Arc<ArticleCard>> {
        self.view
            .lock()
            .cards
            .iter()
            .find(|c| c.article_id() == article_id)
            .cloned()
    }

    pub fn cards(&self) -> Vec<Arc<ArticleCard>> {
        self.view.lock().cards.clone()
    }

    pub fn article_ids(&self) -> Vec<ArticleId> {
        self.view.lock().cards.iter().map(|c| c.article_id()).collect()
    }

    pub fn len(&self) -> usize {
        self.view.lock().cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Card the viewport should smooth-scroll to after the last append.
    pub fn scroll_target(&self) -> Option<ArticleId> {
        self.view.lock().scroll_target
    }

    fn set_scroll_target(&self, article_id: Option<ArticleId>) {
        self.view.lock().scroll_target = article_id;
    }

    pub fn render(&self) -> String {
        let cards = self.cards();
        let mut html = String::from("<div id=\"articles-container\">");
        for card in cards {
            html.push_str(&card.render());
        }
        html.push_str("</div>");
        html
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    Idle,
    Loading,
    Exhausted,
}

/// The load-more trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadMoreButton {
    pub enabled: bool,
    pub label: &'static str,
}

impl LoadMoreButton {
    pub fn render(&self) -> String {
        format!(
            "<button id=\"load-more-btn\" data-action=\"load-more\"{}>{}</button>",
            if self.enabled { "" } else { " disabled" },
            escape_html(self.label)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was appended; carries the number of new cards.
    Appended(usize),
    /// The server returned an empty page.
    Exhausted,
    /// A load was already running, or the feed is exhausted.
    Skipped,
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadOutcome::Appended(1) => write!(f, "appended 1 article"),
            LoadOutcome::Appended(n) => write!(f, "appended {} articles", n),
            LoadOutcome::Exhausted => write!(f, "no more articles"),
            LoadOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

struct PagerInner {
    state: PagerState,
    cursor: u32,
    button: LoadMoreButton,
}

/// Sequential page loader. Only one page request is ever in flight.
pub struct FeedPager {
    api: FeedApi,
    notifier: Arc<dyn Notifier>,
    factory: ArticleCardFactory,
    feed: Feed,
    inner: Mutex<PagerInner>,
}

impl FeedPager {
    pub fn new(api: FeedApi, notifier: Arc<dyn Notifier>, factory: ArticleCardFactory, feed: Feed) -> Self {
        Self {
            api,
            notifier,
            factory,
            feed,
            inner: Mutex::new(PagerInner {
                state: PagerState::Idle,
                cursor: FIRST_CLIENT_PAGE,
                button: LoadMoreButton {
                    enabled: true,
                    label: LABEL_LOAD_MORE,
                },
            }),
        }
    }

    pub fn state(&self) -> PagerState {
        self.inner.lock().state
    }

    /// The next page to request.
    pub fn cursor(&self) -> u32 {
        self.inner.lock().cursor
    }

    pub fn button(&self) -> LoadMoreButton {
        self.inner.lock().button.clone()
    }

    /// Fetches the next page and appends it.
    ///
    /// A no-op while loading or once exhausted. An empty page exhausts the
    /// pager for good; a failure re-arms it with a retry label and a notice.
    pub async fn load_more(&self) -> Result<LoadOutcome, ActionError> {
        let page = {
            let mut inner = self.inner.lock();
            if inner.state != PagerState::Idle {
                return Ok(LoadOutcome::Skipped);
            }
            inner.state = PagerState::Loading;
            inner.button = LoadMoreButton {
                enabled: false,
                label: LABEL_LOADING,
            };
            inner.cursor
        };

        match self.api.feed_page(page).await {
            Ok(articles) if articles.is_empty() => {
                let mut inner = self.inner.lock();
                inner.state = PagerState::Exhausted;
                inner.button = LoadMoreButton {
                    enabled: false,
                    label: LABEL_EXHAUSTED,
                };
                log::info!("feed exhausted at page {}", page);
                Ok(LoadOutcome::Exhausted)
            }
            Ok(articles) => {
                let appended = self.append(&articles);
                let mut inner = self.inner.lock();
                inner.cursor += 1;
                inner.state = PagerState::Idle;
                inner.button = LoadMoreButton {
                    enabled: true,
                    label: LABEL_LOAD_MORE,
                };
                log::debug!("appended {} article(s) from page {}", appended, page);
                Ok(LoadOutcome::Appended(appended))
            }
            Err(e) => {
                {
                    let mut inner = self.inner.lock();
                    inner.state = PagerState::Idle;
                    inner.button = LoadMoreButton {
                        enabled: true,
                        label: LABEL_RETRY,
                    };
                }
                log::warn!("loading feed page {} failed: {}", page, e);
                self.notifier.alert(FEED_LOAD_FAILED);
                Err(e)
            }
        }
    }

    fn append(&self, articles: &[Article]) -> usize {
        let cards: Vec<_> = articles.iter().map(|a| self.factory.build(a)).collect();
        let count = cards.len();
        let first = self.feed.mount(cards);
        self.feed.set_scroll_target(first);
        count
    }
}
