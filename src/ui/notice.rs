//! Blocking user-facing notices and confirmations.

use std::io::{self, BufRead, Write};

pub const FEED_LOAD_FAILED: &str = "Failed to load articles. Please try again.";
pub const LIKE_FAILED: &str = "Failed to update like. Please try again.";
pub const RATING_FAILED: &str = "Failed to submit rating. Please try again.";
pub const COMMENT_POST_FAILED: &str = "Failed to post comment. Please try again.";
pub const COMMENT_EDIT_FAILED: &str = "Failed to update comment. Please try again.";
pub const COMMENT_DELETE_FAILED: &str = "Failed to delete comment. Please try again.";
pub const COMMENT_DELETE_CONFIRM: &str = "Are you sure you want to delete this comment?";
pub const REPORT_FAILED: &str = "Failed to report comment. Please try again.";
pub const REPORT_SENT: &str = "Comment reported successfully. Admins will review it.";

/// Surface for notices that the user must dismiss.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
    /// Asks a yes/no question; `true` means the user agreed.
    fn confirm(&self, message: &str) -> bool;
}

/// Terminal notifier used by the console host.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        println!("  ⚠ {}", message);
    }

    fn confirm(&self, message: &str) -> bool {
        print!("  {} [y/N] ", message);
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}
