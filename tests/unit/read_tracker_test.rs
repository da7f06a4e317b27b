//! Unit tests for the read tracker: dwell timing and best-effort marking.

#[path = "../common/mod.rs"]
mod common;

use std::time::Duration;

use common::{api, article, article_json, RecordingNotifier, ScriptedTransport};
use goodnews::app::App;
use goodnews::services::local_store::LocalStore;
use goodnews::services::read_tracker::{ReadReport, ReadTracker};
use goodnews::types::settings::ClientSettings;
use serde_json::json;
use tempfile::TempDir;

#[tokio::test(start_paused = true)]
async fn test_nothing_marked_before_dwell() {
    let transport = ScriptedTransport::new();
    transport.ok("POST /articles/1/mark-read", json!({ "success": true }));
    let tracker = ReadTracker::new(api(&transport), Duration::from_secs(3));

    let run = tracker.run(|| vec![1]);
    tokio::pin!(run);
    let early = tokio::time::timeout(Duration::from_millis(2900), &mut run).await;
    assert!(early.is_err());
    assert_eq!(transport.total(), 0);

    let report = run.await;
    assert_eq!(report, ReadReport { marked: 1, failed: 0 });
}

/// Failures are counted, never raised.
#[tokio::test]
async fn test_failures_are_swallowed() {
    let transport = ScriptedTransport::new();
    transport.ok("POST /articles/1/mark-read", json!({ "success": true }));
    transport.fail("POST /articles/2/mark-read", 500);
    transport.ok("POST /articles/3/mark-read", json!({ "success": false }));
    let tracker = ReadTracker::new(api(&transport), Duration::ZERO);

    let report = tracker.mark_all(vec![1, 2, 3]).await;

    assert_eq!(report, ReadReport { marked: 1, failed: 2 });
    assert_eq!(transport.total(), 3);
}

/// Cards present when the dwell ends are marked, including ones appended during it.
#[tokio::test(start_paused = true)]
async fn test_app_marks_cards_present_after_dwell() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    for id in [1, 2, 21] {
        transport.ok(&format!("POST /articles/{}/mark-read", id), json!({ "success": true }));
    }
    transport.ok("GET /feed?page=2", json!([article_json(21)]));
    let notifier = RecordingNotifier::new();
    let store = LocalStore::open(Some(dir.path().join("local_storage.json"))).unwrap();
    let app = App::new(ClientSettings::default(), transport.clone(), notifier.clone(), store);
    app.mount_initial(&[article(1), article(2)]);

    let (report, _) = tokio::join!(app.mark_read_after_dwell(), app.pager.load_more());

    assert_eq!(report, ReadReport { marked: 3, failed: 0 });
    assert_eq!(app.read_tracker.dwell(), Duration::from_secs(3));
    assert_eq!(transport.count("POST /articles/21/mark-read"), 1);
}
