//! Unit tests for IPC dispatch: each page event reaches its controller and the
//! reply carries the regions to swap.

#[path = "../common/mod.rs"]
mod common;

use std::sync::{Arc, Mutex};

use common::{article, article_json, comment_json, RecordingNotifier, ScriptedTransport};
use goodnews::app::App;
use goodnews::ipc_handler::{handle_message, repaints_page};
use goodnews::services::local_store::{LocalStore, LocalStoreTrait};
use goodnews::types::settings::ClientSettings;
use serde_json::{json, Value};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    transport: Arc<ScriptedTransport>,
    notifier: Arc<RecordingNotifier>,
    app: App,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    let notifier = RecordingNotifier::new();
    let store = LocalStore::open(Some(dir.path().join("local_storage.json"))).unwrap();
    let app = App::new(ClientSettings::default(), transport.clone(), notifier.clone(), store);
    app.mount_initial(&[article(5)]);
    Fixture {
        dir,
        transport,
        notifier,
        app,
    }
}

fn ignore(_: Value) {}

async fn send(app: &App, message: Value) -> Result<Value, String> {
    handle_message(app, &message, &ignore).await
}

fn selectors(reply: &Value) -> Vec<String> {
    reply["patches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["selector"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_unknown_and_missing_commands_are_errors() {
    let f = fixture();
    assert_eq!(
        send(&f.app, json!({ "cmd": "nope" })).await,
        Err("unknown command: nope".to_string())
    );
    assert!(send(&f.app, json!({})).await.is_err());
    assert!(send(&f.app, json!({ "cmd": "like.toggle" })).await.is_err());
    assert!(send(&f.app, json!({ "cmd": "like.toggle", "article_id": 99 })).await.is_err());
}

#[tokio::test]
async fn test_like_toggle_patches_like_region() {
    let f = fixture();
    f.transport.ok(
        "POST /articles/5/like",
        json!({ "success": true, "like_count": 1, "liked_by_users": [{"id": 1, "username": "ana"}] }),
    );

    let reply = send(&f.app, json!({ "cmd": "like.toggle", "article_id": 5 }))
        .await
        .unwrap();

    assert_eq!(reply["ok"], json!(true));
    assert_eq!(selectors(&reply), vec![".like-region[data-article-id=\"5\"]"]);
    assert!(reply["patches"][0]["html"].as_str().unwrap().contains("ana likes this"));
}

/// A failed action still answers, with the rolled-back region and the error text.
#[tokio::test]
async fn test_failed_action_reports_error() {
    let f = fixture();
    f.transport.fail("POST /articles/5/like", 500);

    let reply = send(&f.app, json!({ "cmd": "like.toggle", "article_id": 5 }))
        .await
        .unwrap();

    assert_eq!(reply["ok"], json!(false));
    assert_eq!(reply["error"], json!("Network error: Server responded with status 500"));
    assert!(reply["patches"][0]["html"].as_str().unwrap().contains("class=\"heart-filled\" hidden"));
    assert_eq!(f.notifier.alerts().len(), 1);
}

#[tokio::test]
async fn test_load_more_patches_feed_and_button() {
    let f = fixture();
    f.transport.ok("GET /feed?page=2", json!([article_json(21)]));

    let reply = send(&f.app, json!({ "cmd": "feed.load_more" })).await.unwrap();

    assert_eq!(selectors(&reply), vec!["#articles-container", "#load-more-btn"]);
    assert_eq!(reply["scroll_to"], json!(21));
}

#[tokio::test]
async fn test_happiness_preview_and_zero_commit() {
    let f = fixture();

    let reply = send(&f.app, json!({ "cmd": "happiness.preview", "article_id": 5, "value": 85 }))
        .await
        .unwrap();
    assert!(reply["patches"][0]["html"].as_str().unwrap().contains("🤩"));
    assert!(reply["patches"][1]["html"].as_str().unwrap().contains("width: 85%"));

    let reply = send(&f.app, json!({ "cmd": "happiness.commit", "article_id": 5, "value": 0 }))
        .await
        .unwrap();
    assert_eq!(reply["ok"], json!(false));
    assert_eq!(f.transport.total(), 0);
}

#[tokio::test]
async fn test_comment_flow_through_messages() {
    let f = fixture();
    f.transport.ok("GET /articles/5/comments", json!({ "success": true, "comments": [] }));
    f.transport.ok(
        "POST /articles/5/comments",
        json!({ "success": true, "comment": comment_json(40, "me", "hello", true) }),
    );

    send(&f.app, json!({ "cmd": "comments.toggle", "article_id": 5 })).await.unwrap();
    send(&f.app, json!({ "cmd": "comments.draft", "article_id": 5, "text": "hello" }))
        .await
        .unwrap();
    let reply = send(&f.app, json!({ "cmd": "comments.post", "article_id": 5 }))
        .await
        .unwrap();

    assert_eq!(reply["ok"], json!(true));
    assert_eq!(selectors(&reply), vec![".comments-section[data-article-id=\"5\"]"]);
    let html = reply["patches"][0]["html"].as_str().unwrap();
    assert!(html.contains("data-comment-id=\"40\""));
    assert!(html.contains("<span class=\"comment-count\">1</span>"));
}

#[tokio::test]
async fn test_report_flow_through_messages() {
    let f = fixture();
    f.transport.ok("POST /comments/8/report", json!({ "success": true }));

    let reply = send(&f.app, json!({ "cmd": "comment.report", "article_id": 5, "comment_id": 8 }))
        .await
        .unwrap();
    assert_eq!(selectors(&reply), vec!["#report-modal"]);

    send(&f.app, json!({ "cmd": "report.reason", "text": "spam" })).await.unwrap();
    let reply = send(&f.app, json!({ "cmd": "report.submit" })).await.unwrap();

    assert_eq!(reply["ok"], json!(true));
    assert_eq!(f.transport.calls()[0].body, Some(json!({ "reason": "spam" })));
    assert!(!f.app.report.modal().is_open());
}

#[tokio::test]
async fn test_image_error_patches_card() {
    let f = fixture();
    let reply = send(&f.app, json!({ "cmd": "image.error", "article_id": 5 }))
        .await
        .unwrap();

    assert_eq!(selectors(&reply), vec![".news-card[data-article-id=\"5\"]"]);
    assert!(!reply["patches"][0]["html"].as_str().unwrap().contains("<img"));
}

#[tokio::test]
async fn test_theme_toggle_persists() {
    let f = fixture();

    let reply = send(&f.app, json!({ "cmd": "theme.toggle" })).await.unwrap();

    assert_eq!(reply["theme"], json!("dark"));
    assert_eq!(reply["root_class"], json!("dark-mode"));
    assert!(reply["patches"][0]["html"].as_str().unwrap().contains("☀️"));
    let store = LocalStore::open(Some(f.dir.path().join("local_storage.json"))).unwrap();
    assert_eq!(store.get("theme"), Some("dark"));
}

/// Dragging repaints the emoji, percentage and bar but leaves the slider input alone.
#[tokio::test]
async fn test_happiness_preview_repaints_readout_only() {
    let f = fixture();
    let message = json!({ "cmd": "happiness.preview", "article_id": 5, "value": 64 });

    let reply = send(&f.app, message.clone()).await.unwrap();

    assert!(repaints_page(&message));
    assert_eq!(
        selectors(&reply),
        vec![
            ".happiness-meter[data-article-id=\"5\"] .happiness-header",
            ".happiness-meter[data-article-id=\"5\"] .happiness-bar",
        ]
    );
    let html: String = reply["patches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["html"].as_str().unwrap())
        .collect();
    assert!(html.contains("😃"));
    assert!(html.contains("64%"));
    assert!(!html.contains("happiness-slider"));
}

#[test]
fn test_only_typing_replies_are_dropped() {
    for cmd in ["comments.draft", "comment.edit_draft", "report.reason"] {
        assert!(!repaints_page(&json!({ "cmd": cmd, "text": "x" })), "{}", cmd);
    }
    for cmd in ["happiness.preview", "happiness.commit", "like.toggle", "comments.post", "report.submit"] {
        assert!(repaints_page(&json!({ "cmd": cmd })), "{}", cmd);
    }
}

/// The optimistic heart reaches the page while the request is still in flight.
#[tokio::test]
async fn test_like_toggle_emits_interim_patch_before_reply() {
    let f = fixture();
    f.transport.ok(
        "POST /articles/5/like",
        json!({ "success": true, "like_count": 1, "liked_by_users": [{"id": 1, "username": "ana"}] }),
    );
    let seen = Mutex::new(Vec::new());
    let sink = |reply: Value| seen.lock().unwrap().push((reply, f.transport.total()));

    let reply = handle_message(&f.app, &json!({ "cmd": "like.toggle", "article_id": 5 }), &sink)
        .await
        .unwrap();

    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.len(), 1);
    let (interim, calls_so_far) = &seen[0];
    assert_eq!(*calls_so_far, 1);
    assert_eq!(interim["pending"], json!(true));
    assert_eq!(selectors(interim), vec![".like-region[data-article-id=\"5\"]"]);
    let html = interim["patches"][0]["html"].as_str().unwrap();
    assert!(html.contains("class=\"heart-outline\" hidden"));
    assert!(!html.contains("ana likes this"));
    assert!(reply["patches"][0]["html"].as_str().unwrap().contains("ana likes this"));
}

#[tokio::test]
async fn test_load_more_shows_loading_button_while_pending() {
    let f = fixture();
    f.transport.ok("GET /feed?page=2", json!([article_json(21)]));
    let seen = Mutex::new(Vec::new());
    let sink = |reply: Value| seen.lock().unwrap().push(reply);

    handle_message(&f.app, &json!({ "cmd": "feed.load_more" }), &sink).await.unwrap();

    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(selectors(&seen[0]), vec!["#load-more-btn"]);
    let html = seen[0]["patches"][0]["html"].as_str().unwrap();
    assert!(html.contains("Loading..."));
    assert!(html.contains("disabled"));
}

/// Actions that finish without a request send no interim patch.
#[tokio::test]
async fn test_local_actions_emit_no_interim_patch() {
    let f = fixture();
    let seen = Mutex::new(Vec::new());
    let sink = |reply: Value| seen.lock().unwrap().push(reply);

    handle_message(&f.app, &json!({ "cmd": "happiness.commit", "article_id": 5, "value": 0 }), &sink)
        .await
        .unwrap();
    handle_message(&f.app, &json!({ "cmd": "image.error", "article_id": 5 }), &sink)
        .await
        .unwrap();

    assert!(seen.into_inner().unwrap().is_empty());
}

/// The text sent with the submit wins even if no draft message arrived first.
#[tokio::test]
async fn test_post_uses_text_sent_with_submit() {
    let f = fixture();
    f.transport.ok("GET /articles/5/comments", json!({ "success": true, "comments": [] }));
    f.transport.ok(
        "POST /articles/5/comments",
        json!({ "success": true, "comment": comment_json(41, "me", "typed fast", true) }),
    );

    send(&f.app, json!({ "cmd": "comments.toggle", "article_id": 5 })).await.unwrap();
    let reply = send(&f.app, json!({ "cmd": "comments.post", "article_id": 5, "text": "typed fast" }))
        .await
        .unwrap();

    assert_eq!(reply["ok"], json!(true));
    let post = f
        .transport
        .calls()
        .into_iter()
        .find(|c| c.route == "POST /articles/5/comments")
        .unwrap();
    assert_eq!(post.body, Some(json!({ "content": "typed fast" })));
}

#[tokio::test]
async fn test_report_submit_uses_text_sent_with_submit() {
    let f = fixture();
    f.transport.ok("POST /comments/8/report", json!({ "success": true }));

    send(&f.app, json!({ "cmd": "comment.report", "article_id": 5, "comment_id": 8 }))
        .await
        .unwrap();
    send(&f.app, json!({ "cmd": "report.reason", "text": "sp" })).await.unwrap();
    let reply = send(&f.app, json!({ "cmd": "report.submit", "text": "spam" })).await.unwrap();

    assert_eq!(reply["ok"], json!(true));
    assert_eq!(f.transport.calls()[0].body, Some(json!({ "reason": "spam" })));
}
