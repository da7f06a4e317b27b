//! App Core for the Good News client.
//!
//! Central struct holding the API client, the mounted feed, the pager, the
//! shared report modal, the theme and the read tracker.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::services::feed_api::FeedApi;
use crate::services::http_client::{HttpClient, Transport};
use crate::services::local_store::LocalStore;
use crate::services::read_tracker::{ReadReport, ReadTracker};
use crate::services::theme_store::ThemeStore;
use crate::types::article::Article;
use crate::types::errors::{ActionError, NetworkError};
use crate::types::settings::ClientSettings;
use crate::ui::card::ArticleCardFactory;
use crate::ui::feed::{Feed, FeedPager};
use crate::ui::notice::Notifier;
use crate::ui::report::ReportController;

pub struct App {
    pub settings: ClientSettings,
    pub api: FeedApi,
    pub notifier: Arc<dyn Notifier>,
    pub feed: Feed,
    pub pager: FeedPager,
    pub report: Arc<ReportController>,
    pub factory: ArticleCardFactory,
    pub theme: Mutex<ThemeStore<LocalStore>>,
    pub read_tracker: ReadTracker,
}

impl App {
    /// Wires every component around `transport`.
    ///
    /// The theme is read from `store` here, before anything is rendered.
    pub fn new(
        settings: ClientSettings,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        store: LocalStore,
    ) -> Self {
        let api = FeedApi::new(transport);
        let report = Arc::new(ReportController::new(api.clone(), notifier.clone()));
        let factory = ArticleCardFactory::new(api.clone(), notifier.clone(), report.clone());
        let feed = Feed::new();
        let pager = FeedPager::new(api.clone(), notifier.clone(), factory.clone(), feed.clone());
        let read_tracker = ReadTracker::new(api.clone(), Duration::from_secs(settings.read_dwell_secs));
        let theme = Mutex::new(ThemeStore::load(store));

        Self {
            settings,
            api,
            notifier,
            feed,
            pager,
            report,
            factory,
            theme,
            read_tracker,
        }
    }

    /// Builds the app against the real backend named in `settings`.
    pub fn connect(
        settings: ClientSettings,
        notifier: Arc<dyn Notifier>,
        store: LocalStore,
    ) -> Result<Self, NetworkError> {
        let transport: Arc<dyn Transport> = Arc::new(HttpClient::new(&settings)?);
        log::info!("using backend {}", settings.base_url);
        Ok(Self::new(settings, transport, notifier, store))
    }

    /// Mounts the records of the server-rendered first page without moving the pager.
    pub fn mount_initial(&self, articles: &[Article]) {
        let cards = articles.iter().map(|a| self.factory.build(a)).collect();
        self.feed.mount(cards);
    }

    /// Fetches page 1 and mounts it; used when no shell pre-rendered it.
    pub async fn load_first_page(&self) -> Result<usize, ActionError> {
        let articles = self.api.feed_page(1).await?;
        self.mount_initial(&articles);
        Ok(articles.len())
    }

    /// Waits the dwell time, then marks every card present at that moment as read.
    pub async fn mark_read_after_dwell(&self) -> ReadReport {
        let feed = self.feed.clone();
        self.read_tracker.run(move || feed.article_ids()).await
    }

    /// The feed region, load-more button, report modal and theme toggle.
    pub fn render_page(&self) -> String {
        let theme = self.theme.lock();
        format!(
            concat!(
                "<main id=\"feed\" class=\"{root}\">",
                "<button id=\"theme-toggle\" data-action=\"theme-toggle\">{icon}</button>",
                "{feed}{button}{modal}",
                "</main>"
            ),
            root = theme.root_class(),
            icon = theme.icon().glyph(),
            feed = self.feed.render(),
            button = self.pager.button().render(),
            modal = self.report.render(),
        )
    }
}
