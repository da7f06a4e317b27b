//! Unit tests for the feed pager: append, exhaustion, retry, single flight.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use common::{api, article_json, RecordingNotifier, ScriptedTransport};
use goodnews::ui::card::ArticleCardFactory;
use goodnews::ui::feed::{
    Feed, FeedPager, LoadOutcome, PagerState, FIRST_CLIENT_PAGE, LABEL_EXHAUSTED, LABEL_LOADING,
    LABEL_LOAD_MORE, LABEL_RETRY,
};
use goodnews::ui::notice::FEED_LOAD_FAILED;
use goodnews::ui::report::ReportController;
use serde_json::json;

fn pager(transport: &Arc<ScriptedTransport>, notifier: &Arc<RecordingNotifier>) -> (FeedPager, Feed) {
    let report = Arc::new(ReportController::new(api(transport), notifier.clone()));
    let factory = ArticleCardFactory::new(api(transport), notifier.clone(), report);
    let feed = Feed::new();
    let pager = FeedPager::new(api(transport), notifier.clone(), factory, feed.clone());
    (pager, feed)
}

#[test]
fn test_starts_idle_at_page_two() {
    let transport = ScriptedTransport::new();
    let notifier = RecordingNotifier::new();
    let (pager, _) = pager(&transport, &notifier);

    assert_eq!(FIRST_CLIENT_PAGE, 2);
    assert_eq!(pager.cursor(), 2);
    assert_eq!(pager.state(), PagerState::Idle);
    assert_eq!(pager.button().label, LABEL_LOAD_MORE);
    assert!(pager.button().enabled);
}

#[tokio::test]
async fn test_load_appends_and_advances() {
    let transport = ScriptedTransport::new();
    transport.ok("GET /feed?page=2", json!([article_json(21), article_json(22)]));
    let notifier = RecordingNotifier::new();
    let (pager, feed) = pager(&transport, &notifier);

    assert_eq!(pager.load_more().await, Ok(LoadOutcome::Appended(2)));

    assert_eq!(feed.article_ids(), vec![21, 22]);
    assert_eq!(feed.scroll_target(), Some(21));
    assert_eq!(pager.cursor(), 3);
    assert_eq!(pager.state(), PagerState::Idle);
    assert_eq!(pager.button().label, LABEL_LOAD_MORE);
}

/// The button reads "Loading..." and is disabled while the page is in flight.
#[tokio::test]
async fn test_button_disabled_while_loading() {
    let transport = ScriptedTransport::new();
    transport.ok("GET /feed?page=2", json!([article_json(21)]));
    let notifier = RecordingNotifier::new();
    let (pager, _) = pager(&transport, &notifier);

    let (result, during) = tokio::join!(pager.load_more(), async { pager.button() });

    assert!(result.is_ok());
    assert!(!during.enabled);
    assert_eq!(during.label, LABEL_LOADING);
}

/// An empty page on the first client load exhausts the feed for good.
#[tokio::test]
async fn test_empty_page_exhausts_permanently() {
    let transport = ScriptedTransport::new();
    transport.ok("GET /feed?page=2", json!([]));
    let notifier = RecordingNotifier::new();
    let (pager, feed) = pager(&transport, &notifier);

    assert_eq!(pager.load_more().await, Ok(LoadOutcome::Exhausted));
    assert_eq!(pager.state(), PagerState::Exhausted);
    assert_eq!(pager.button().label, LABEL_EXHAUSTED);
    assert!(!pager.button().enabled);
    assert!(feed.is_empty());

    for _ in 0..3 {
        assert_eq!(pager.load_more().await, Ok(LoadOutcome::Skipped));
    }
    assert_eq!(transport.total(), 1);
}

#[test]
fn test_outcome_reads_as_console_text() {
    assert_eq!(LoadOutcome::Appended(3).to_string(), "appended 3 articles");
    assert_eq!(LoadOutcome::Appended(1).to_string(), "appended 1 article");
    assert_eq!(LoadOutcome::Exhausted.to_string(), "no more articles");
    assert_eq!(LoadOutcome::Skipped.to_string(), "skipped");
}

/// Two triggers in the same turn make one request.
#[tokio::test]
async fn test_concurrent_triggers_issue_one_request() {
    let transport = ScriptedTransport::new();
    transport.ok("GET /feed?page=2", json!([article_json(21)]));
    let notifier = RecordingNotifier::new();
    let (pager, feed) = pager(&transport, &notifier);

    let (a, b) = tokio::join!(pager.load_more(), pager.load_more());

    assert_eq!(a, Ok(LoadOutcome::Appended(1)));
    assert_eq!(b, Ok(LoadOutcome::Skipped));
    assert_eq!(transport.count("GET /feed?page=2"), 1);
    assert_eq!(feed.len(), 1);
}

/// Failure re-arms the same page with a retry label.
#[tokio::test]
async fn test_failure_allows_retry_of_same_page() {
    let transport = ScriptedTransport::new();
    transport.fail("GET /feed?page=2", 502);
    transport.ok("GET /feed?page=2", json!([article_json(21)]));
    let notifier = RecordingNotifier::new();
    let (pager, feed) = pager(&transport, &notifier);

    assert!(pager.load_more().await.is_err());
    assert_eq!(pager.state(), PagerState::Idle);
    assert_eq!(pager.cursor(), 2);
    assert_eq!(pager.button().label, LABEL_RETRY);
    assert!(pager.button().enabled);
    assert_eq!(notifier.alerts(), vec![FEED_LOAD_FAILED.to_string()]);

    assert_eq!(pager.load_more().await, Ok(LoadOutcome::Appended(1)));
    assert_eq!(feed.article_ids(), vec![21]);
    assert_eq!(pager.cursor(), 3);
}

#[tokio::test]
async fn test_pages_requested_in_order() {
    let transport = ScriptedTransport::new();
    transport.ok("GET /feed?page=2", json!([article_json(21)]));
    transport.ok("GET /feed?page=3", json!([article_json(31)]));
    transport.ok("GET /feed?page=4", json!([]));
    let notifier = RecordingNotifier::new();
    let (pager, feed) = pager(&transport, &notifier);

    pager.load_more().await.unwrap();
    pager.load_more().await.unwrap();
    assert_eq!(feed.scroll_target(), Some(31));
    assert_eq!(pager.load_more().await, Ok(LoadOutcome::Exhausted));

    let routes: Vec<_> = transport.calls().into_iter().map(|c| c.route).collect();
    assert_eq!(routes, vec!["GET /feed?page=2", "GET /feed?page=3", "GET /feed?page=4"]);
    assert_eq!(feed.article_ids(), vec![21, 31]);
}

#[tokio::test]
async fn test_button_render() {
    let transport = ScriptedTransport::new();
    transport.ok("GET /feed?page=2", json!([]));
    let notifier = RecordingNotifier::new();
    let (pager, _) = pager(&transport, &notifier);

    assert!(pager.button().render().contains(LABEL_LOAD_MORE));
    pager.load_more().await.unwrap();
    let html = pager.button().render();
    assert!(html.contains(LABEL_EXHAUSTED));
    assert!(html.contains("disabled"));
}
