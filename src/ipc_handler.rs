//! IPC message handler for the webview host.
//!
//! Kept apart from the webview so it can be unit-tested without a window.
//! `handle_message` dispatches one page event to the owning controller and
//! answers with the re-rendered regions the page must swap in. Actions that
//! wait on the network also push the optimistic regions through `interim`
//! while the request is pending.

use std::future::Future;
use std::sync::Arc;
use std::task::Poll;

use serde_json::{json, Value};

use crate::app::App;
use crate::types::article::ArticleId;
use crate::types::comment::CommentId;
use crate::types::errors::ActionError;
use crate::ui::card::ArticleCard;

fn patch(selector: String, html: String) -> Value {
    json!({ "selector": selector, "html": html })
}

fn like_patch(card: &ArticleCard) -> Value {
    patch(
        format!(".like-region[data-article-id=\"{}\"]", card.article_id()),
        card.like.render(),
    )
}

fn happiness_patch(card: &ArticleCard) -> Value {
    patch(
        format!(".happiness-meter[data-article-id=\"{}\"]", card.article_id()),
        card.happiness.render(),
    )
}

fn comments_patch(card: &ArticleCard) -> Value {
    patch(
        format!(".comments-section[data-article-id=\"{}\"]", card.article_id()),
        card.comments.render(),
    )
}

fn card_patch(card: &ArticleCard) -> Value {
    patch(
        format!(".news-card[data-article-id=\"{}\"]", card.article_id()),
        card.render(),
    )
}

fn happiness_preview_patches(card: &ArticleCard) -> Vec<Value> {
    // The slider itself is left alone so an ongoing drag is not interrupted.
    let view = card.happiness.view();
    let scope = format!(".happiness-meter[data-article-id=\"{}\"]", card.article_id());
    vec![
        patch(format!("{} .happiness-header", scope), view.render_header()),
        patch(format!("{} .happiness-bar", scope), view.render_bar()),
    ]
}

fn report_patch(app: &App) -> Value {
    patch("#report-modal".to_string(), app.report.render())
}

/// Builds the reply: `ok` plus the regions to swap, and the error text if any.
fn reply<T>(result: Result<T, ActionError>, patches: Vec<Value>) -> Value {
    match result {
        Ok(_) => json!({ "ok": true, "patches": patches }),
        Err(e) => json!({ "ok": false, "error": e.to_string(), "patches": patches }),
    }
}

fn article_id(params: &Value) -> Result<ArticleId, String> {
    params
        .get("article_id")
        .and_then(Value::as_i64)
        .ok_or_else(|| "missing article_id".to_string())
}

fn comment_id(params: &Value) -> Result<CommentId, String> {
    params
        .get("comment_id")
        .and_then(Value::as_i64)
        .ok_or_else(|| "missing comment_id".to_string())
}

fn text(params: &Value) -> Result<&str, String> {
    params
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing text".to_string())
}

/// Field text sent along with a submit, so it never depends on earlier draft messages.
fn submitted_text(params: &Value) -> Option<&str> {
    params.get("text").and_then(Value::as_str)
}

fn rating(params: &Value) -> Result<u8, String> {
    let value = params
        .get("value")
        .and_then(Value::as_u64)
        .ok_or_else(|| "missing value".to_string())?;
    Ok(value.min(100) as u8)
}

fn card(app: &App, params: &Value) -> Result<Arc<ArticleCard>, String> {
    let id = article_id(params)?;
    app.feed
        .card(id)
        .ok_or_else(|| format!("no card for article {}", id))
}

/// Receives interim replies while an action waits on the network.
pub type PatchSink<'a> = &'a (dyn Fn(Value) + Send + Sync);

/// Polls `action` once. If it is then waiting on a request, its optimistic
/// state is already applied and `patches` is pushed to `interim` before the
/// rest of the action runs.
async fn staged<F, P>(action: F, interim: PatchSink<'_>, patches: P) -> F::Output
where
    F: Future,
    P: FnOnce() -> Vec<Value>,
{
    let mut action = std::pin::pin!(action);
    match futures::poll!(action.as_mut()) {
        Poll::Ready(output) => output,
        Poll::Pending => {
            interim(json!({ "ok": true, "pending": true, "patches": patches() }));
            action.await
        }
    }
}

/// Whether the page should apply the reply to `message`.
///
/// Typing updates its counter in the page and the textarea must keep focus,
/// so draft replies are dropped. Everything else repaints.
pub fn repaints_page(message: &Value) -> bool {
    !matches!(
        message.get("cmd").and_then(Value::as_str),
        Some("comments.draft" | "comment.edit_draft" | "report.reason")
    )
}

/// Dispatches one page event.
///
/// Returns `Err(String)` only for malformed messages; failed actions still
/// answer `Ok` with `"ok": false` and the rolled-back regions.
pub async fn handle_message(
    app: &App,
    message: &Value,
    interim: PatchSink<'_>,
) -> Result<Value, String> {
    let cmd = message
        .get("cmd")
        .and_then(Value::as_str)
        .ok_or("missing cmd")?;

    match cmd {
        // ─── Feed ───
        "feed.load_more" => {
            let result = staged(app.pager.load_more(), interim, || {
                vec![patch("#load-more-btn".to_string(), app.pager.button().render())]
            })
            .await;
            let mut response = reply(
                result,
                vec![
                    patch("#articles-container".to_string(), app.feed.render()),
                    patch("#load-more-btn".to_string(), app.pager.button().render()),
                ],
            );
            response["scroll_to"] = json!(app.feed.scroll_target());
            Ok(response)
        }
        "image.error" => {
            let card = card(app, message)?;
            card.on_image_error();
            Ok(reply::<()>(Ok(()), vec![card_patch(&card)]))
        }

        // ─── Likes ───
        "like.toggle" => {
            let card = card(app, message)?;
            let result = staged(card.like.toggle(), interim, || vec![like_patch(&card)]).await;
            Ok(reply(result, vec![like_patch(&card)]))
        }

        // ─── Happiness ───
        "happiness.preview" => {
            let card = card(app, message)?;
            card.happiness.preview(rating(message)?);
            Ok(reply::<()>(Ok(()), happiness_preview_patches(&card)))
        }
        "happiness.commit" => {
            let card = card(app, message)?;
            let value = rating(message)?;
            let result = staged(card.happiness.commit(value), interim, || {
                happiness_preview_patches(&card)
            })
            .await;
            Ok(reply(result, vec![happiness_patch(&card)]))
        }

        // ─── Comments ───
        "comments.toggle" => {
            let card = card(app, message)?;
            let result =
                staged(card.comments.toggle(), interim, || vec![comments_patch(&card)]).await;
            Ok(reply(result, vec![comments_patch(&card)]))
        }
        "comments.draft" => {
            let card = card(app, message)?;
            card.comments.set_draft(text(message)?);
            Ok(reply::<()>(Ok(()), vec![comments_patch(&card)]))
        }
        "comments.post" => {
            let card = card(app, message)?;
            if let Some(text) = submitted_text(message) {
                card.comments.set_draft(text);
            }
            let result =
                staged(card.comments.post(), interim, || vec![comments_patch(&card)]).await;
            Ok(reply(result, vec![comments_patch(&card)]))
        }
        "comment.edit" => {
            let card = card(app, message)?;
            let result = card.comments.begin_edit(comment_id(message)?);
            Ok(reply(result, vec![comments_patch(&card)]))
        }
        "comment.edit_draft" => {
            let card = card(app, message)?;
            card.comments.set_edit_draft(comment_id(message)?, text(message)?);
            Ok(reply::<()>(Ok(()), vec![comments_patch(&card)]))
        }
        "comment.edit_cancel" => {
            let card = card(app, message)?;
            card.comments.cancel_edit(comment_id(message)?);
            Ok(reply::<()>(Ok(()), vec![comments_patch(&card)]))
        }
        "comment.edit_save" => {
            let card = card(app, message)?;
            let id = comment_id(message)?;
            if let Some(text) = submitted_text(message) {
                card.comments.set_edit_draft(id, text);
            }
            let result =
                staged(card.comments.save_edit(id), interim, || vec![comments_patch(&card)]).await;
            Ok(reply(result, vec![comments_patch(&card)]))
        }
        "comment.delete" => {
            let card = card(app, message)?;
            let result = card.comments.delete(comment_id(message)?).await;
            Ok(reply(result, vec![comments_patch(&card)]))
        }

        // ─── Reports ───
        "comment.report" => {
            let card = card(app, message)?;
            card.comments.open_report(comment_id(message)?);
            Ok(reply::<()>(Ok(()), vec![report_patch(app)]))
        }
        "report.reason" => {
            app.report.set_reason(text(message)?);
            Ok(reply::<()>(Ok(()), vec![report_patch(app)]))
        }
        "report.submit" => {
            if let Some(text) = submitted_text(message) {
                app.report.set_reason(text);
            }
            let result = staged(app.report.submit(), interim, || vec![report_patch(app)]).await;
            Ok(reply(result, vec![report_patch(app)]))
        }
        "report.cancel" => {
            app.report.cancel();
            Ok(reply::<()>(Ok(()), vec![report_patch(app)]))
        }

        // ─── Theme ───
        "theme.toggle" => {
            let mut theme = app.theme.lock();
            if let Err(e) = theme.toggle() {
                log::warn!("could not persist theme preference: {}", e);
            }
            Ok(json!({
                "ok": true,
                "theme": theme.preference().as_str(),
                "root_class": theme.root_class(),
                "patches": [patch(
                    "#theme-toggle".to_string(),
                    format!(
                        "<button id=\"theme-toggle\" data-action=\"theme-toggle\">{}</button>",
                        theme.icon().glyph()
                    ),
                )],
            }))
        }

        _ => Err(format!("unknown command: {}", cmd)),
    }
}
