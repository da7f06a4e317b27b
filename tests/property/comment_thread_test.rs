//! Property-based tests for comment validation and the shown comment count.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use common::{api, article, comment_json, RecordingNotifier, ScriptedTransport};
use goodnews::types::comment::MAX_COMMENT_CHARS;
use goodnews::ui::comments::{validate_comment, CommentController};
use goodnews::ui::report::ReportController;
use proptest::prelude::*;
use serde_json::json;

proptest! {
    /// Accepted comments are exactly the trimmed, non-empty ones within the limit.
    #[test]
    fn validation_matches_limit(s in "\\PC{0,1100}") {
        let trimmed = s.trim();
        let expected_ok = !trimmed.is_empty() && trimmed.chars().count() <= MAX_COMMENT_CHARS;
        let result = validate_comment(&s);
        prop_assert_eq!(result.is_ok(), expected_ok);
        if let Ok(content) = result {
            prop_assert_eq!(content, trimmed);
        }
    }

    /// After posting `posts` comments and deleting `deletes` of them, the
    /// count equals what remains and the placeholder shows only at zero.
    #[test]
    fn count_tracks_posts_and_deletes(posts in 0usize..6, deletes in 0usize..8) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        runtime.block_on(async {
            let transport = ScriptedTransport::new();
            let notifier = RecordingNotifier::new();
            let report = Arc::new(ReportController::new(api(&transport), notifier.clone()));
            let thread = CommentController::new(&article(1), api(&transport), notifier.clone(), report);
            transport.ok("GET /articles/1/comments", json!({ "success": true, "comments": [] }));
            thread.toggle().await.unwrap();

            for i in 0..posts {
                let id = i as i64 + 1;
                transport.ok(
                    "POST /articles/1/comments",
                    json!({ "success": true, "comment": comment_json(id, "me", "hi", true) }),
                );
            }
            for _ in 0..posts {
                thread.set_draft("hi");
                thread.post().await.unwrap();
            }
            for i in 0..deletes {
                let id = i as i64 + 1;
                transport.ok(&format!("DELETE /comments/{}", id), json!({ "success": true }));
                thread.delete(id).await.unwrap();
            }

            let view = thread.view();
            let remaining = posts.saturating_sub(deletes) as u32;
            assert_eq!(view.count(), remaining);
            assert_eq!(view.nodes().len() as u32, remaining);
            assert_eq!(view.shows_placeholder(), remaining == 0);
        });
    }
}
