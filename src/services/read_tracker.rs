//! Read Tracker: marks every card on screen as read after a fixed dwell time.
//!
//! Marking is best-effort and invisible: requests go out concurrently in no
//! particular order, and failures are logged and dropped.

use std::time::Duration;

use futures::future::join_all;

use crate::services::feed_api::FeedApi;
use crate::types::article::ArticleId;

/// Counts of one marking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadReport {
    pub marked: usize,
    pub failed: usize,
}

pub struct ReadTracker {
    api: FeedApi,
    dwell: Duration,
}

impl ReadTracker {
    pub fn new(api: FeedApi, dwell: Duration) -> Self {
        Self { api, dwell }
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    /// Sleeps for the dwell time measured from the call, then marks the cards
    /// `present` reports at that moment.
    pub async fn run<F>(&self, present: F) -> ReadReport
    where
        F: FnOnce() -> Vec<ArticleId>,
    {
        tokio::time::sleep(self.dwell).await;
        self.mark_all(present()).await
    }

    pub async fn mark_all(&self, article_ids: Vec<ArticleId>) -> ReadReport {
        let requests = article_ids.into_iter().map(|id| {
            let api = self.api.clone();
            async move { (id, api.mark_read(id).await) }
        });

        let mut report = ReadReport::default();
        for (id, result) in join_all(requests).await {
            match result {
                Ok(()) => report.marked += 1,
                Err(e) => {
                    log::warn!("mark-read failed for article {}: {}", id, e);
                    report.failed += 1;
                }
            }
        }
        log::debug!("read tracker marked {} article(s), {} failed", report.marked, report.failed);
        report
    }
}
