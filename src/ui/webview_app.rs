//! WebView host for the feed using `wry` + `tao`.
//!
//! Architecture:
//! - The page is the output of `App::render_page()` plus `BRIDGE_JS`.
//! - The bridge delegates clicks/inputs by `data-action` and posts
//!   `{"cmd": ..}` messages through `window.ipc.postMessage()`.
//! - Each message runs `ipc_handler::handle_message` on a tokio runtime; the
//!   reply's patches are applied with `window.__gn_apply(..)`. Interim patches
//!   for a pending request go through the same call.
//! - Submits carry their field text, so they never depend on an earlier draft
//!   message having been handled first.
//! - Deletion is confirmed in the page before the message is sent.

use std::sync::Arc;

use parking_lot::Mutex;
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy};
use tao::window::WindowBuilder;
use wry::WebViewBuilder;

use crate::app::App;
use crate::ipc_handler::{handle_message, repaints_page};
use crate::services::local_store::LocalStore;
use crate::services::settings_engine::load_client_settings;
use crate::ui::notice::Notifier;

#[derive(Debug)]
enum UserEvent {
    EvalScript(String),
}

/// Notices become `alert()` calls in the page.
struct WebviewNotifier {
    proxy: Mutex<EventLoopProxy<UserEvent>>,
}

impl Notifier for WebviewNotifier {
    fn alert(&self, message: &str) {
        let literal = serde_json::to_string(message).unwrap_or_else(|_| "\"\"".to_string());
        let _ = self
            .proxy
            .lock()
            .send_event(UserEvent::EvalScript(format!("alert({})", literal)));
    }

    /// The bridge only sends a delete after the page's own `confirm()`.
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

const BRIDGE_JS: &str = r#"
(function(){
  function send(msg){ window.ipc.postMessage(JSON.stringify(msg)); }
  function ids(el){
    var card = el.closest('[data-article-id]');
    var comment = el.closest('[data-comment-id]');
    return {
      article_id: card ? Number(card.dataset.articleId) : null,
      comment_id: comment ? Number(comment.dataset.commentId) : null
    };
  }
  window.__gn_apply = function(reply){
    (reply.patches || []).forEach(function(p){
      var el = document.querySelector(p.selector);
      if (el) el.outerHTML = p.html;
    });
    if (reply.root_class) document.getElementById('feed').className = reply.root_class;
    if (reply.scroll_to != null) {
      var card = document.querySelector('.news-card[data-article-id="' + reply.scroll_to + '"]');
      if (card) card.scrollIntoView({ behavior: 'smooth', block: 'start' });
    }
  };
  document.addEventListener('click', function(e){
    var el = e.target.closest('[data-action]');
    if (!el) return;
    var id = ids(el);
    switch (el.dataset.action) {
      case 'load-more': send({ cmd: 'feed.load_more' }); break;
      case 'theme-toggle': send({ cmd: 'theme.toggle' }); break;
      case 'like': send({ cmd: 'like.toggle', article_id: id.article_id }); break;
      case 'comments-toggle': send({ cmd: 'comments.toggle', article_id: id.article_id }); break;
      case 'comment-post': {
        var input = el.closest('.comments-section').querySelector('.comment-input');
        send({ cmd: 'comments.post', article_id: id.article_id, text: input ? input.value : '' });
        break;
      }
      case 'comment-edit': send({ cmd: 'comment.edit', article_id: id.article_id, comment_id: id.comment_id }); break;
      case 'comment-save': {
        var edit = el.closest('[data-comment-id]').querySelector('.comment-edit-input');
        var msg = { cmd: 'comment.edit_save', article_id: id.article_id, comment_id: id.comment_id };
        if (edit) msg.text = edit.value;
        send(msg);
        break;
      }
      case 'comment-cancel': send({ cmd: 'comment.edit_cancel', article_id: id.article_id, comment_id: id.comment_id }); break;
      case 'comment-delete':
        if (confirm('Are you sure you want to delete this comment?'))
          send({ cmd: 'comment.delete', article_id: id.article_id, comment_id: id.comment_id });
        break;
      case 'comment-report': send({ cmd: 'comment.report', article_id: id.article_id, comment_id: id.comment_id }); break;
      case 'report-submit': {
        var reason = document.querySelector('#report-modal .report-reason');
        send({ cmd: 'report.submit', text: reason ? reason.value : '' });
        break;
      }
      case 'report-cancel': send({ cmd: 'report.cancel' }); break;
    }
  });
  document.addEventListener('input', function(e){
    var el = e.target, id = ids(el);
    var counter = el.parentElement && el.parentElement.querySelector('.char-counter');
    if (counter && el.maxLength > 0) counter.textContent = el.value.length + '/' + el.maxLength;
    if (el.classList.contains('happiness-slider'))
      send({ cmd: 'happiness.preview', article_id: id.article_id, value: Number(el.value) });
    else if (el.classList.contains('comment-input'))
      send({ cmd: 'comments.draft', article_id: id.article_id, text: el.value });
    else if (el.classList.contains('comment-edit-input'))
      send({ cmd: 'comment.edit_draft', article_id: id.article_id, comment_id: id.comment_id, text: el.value });
    else if (el.classList.contains('report-reason'))
      send({ cmd: 'report.reason', text: el.value });
  });
  document.addEventListener('change', function(e){
    var el = e.target;
    if (el.classList.contains('happiness-slider') && Number(el.value) > 0)
      send({ cmd: 'happiness.commit', article_id: ids(el).article_id, value: Number(el.value) });
  });
  document.addEventListener('error', function(e){
    if (e.target.tagName === 'IMG') send({ cmd: 'image.error', article_id: ids(e.target).article_id });
  }, true);
})();
"#;

fn page_html(app: &App) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><title>Good News</title></head><body>{}<script>{}</script></body></html>",
        app.render_page(),
        BRIDGE_JS
    )
}

pub fn run() {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("cannot start async runtime: {}", e);
            return;
        }
    };

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let settings = load_client_settings();
    let store = match LocalStore::open(None) {
        Ok(store) => store,
        Err(e) => {
            log::error!("cannot open local storage: {}", e);
            return;
        }
    };
    let notifier = Arc::new(WebviewNotifier {
        proxy: Mutex::new(proxy.clone()),
    });
    let app = match App::connect(settings, notifier, store) {
        Ok(app) => Arc::new(app),
        Err(e) => {
            log::error!("cannot build HTTP client: {}", e);
            return;
        }
    };

    if let Err(e) = runtime.block_on(app.load_first_page()) {
        log::warn!("first page failed to load: {}", e);
    }

    let window = match WindowBuilder::new()
        .with_title("Good News")
        .with_inner_size(tao::dpi::LogicalSize::new(960.0, 900.0))
        .build(&event_loop)
    {
        Ok(window) => window,
        Err(e) => {
            log::error!("cannot create window: {}", e);
            return;
        }
    };

    let ipc_app = app.clone();
    let ipc_proxy = proxy.clone();
    let handle = runtime.handle().clone();
    let builder = WebViewBuilder::new()
        .with_html(page_html(&app))
        .with_ipc_handler(move |request: wry::http::Request<String>| {
            let message: serde_json::Value = match serde_json::from_str(request.body()) {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("dropping malformed IPC message: {}", e);
                    return;
                }
            };
            let app = ipc_app.clone();
            let proxy = Mutex::new(ipc_proxy.clone());
            handle.spawn(async move {
                let apply = |reply: serde_json::Value| {
                    let _ = proxy.lock().send_event(UserEvent::EvalScript(format!(
                        "window.__gn_apply({})",
                        reply
                    )));
                };
                match handle_message(&app, &message, &apply).await {
                    Ok(reply) if repaints_page(&message) => apply(reply),
                    Ok(_) => {}
                    Err(e) => log::warn!("IPC error: {}", e),
                }
            });
        })
        .with_devtools(cfg!(debug_assertions));

    #[cfg(target_os = "linux")]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        match window.default_vbox() {
            Some(vbox) => builder.build_gtk(vbox),
            None => {
                log::error!("window has no GTK container");
                return;
            }
        }
    };

    #[cfg(not(target_os = "linux"))]
    let webview = builder.build(&window);

    let webview = match webview {
        Ok(webview) => webview,
        Err(e) => {
            log::error!("cannot create webview: {}", e);
            return;
        }
    };

    let tracker_app = app.clone();
    runtime.spawn(async move {
        tracker_app.mark_read_after_dwell().await;
    });

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;
        // Keep the runtime alive for the lifetime of the loop.
        let _ = &runtime;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                *control_flow = ControlFlow::Exit;
            }
            Event::UserEvent(UserEvent::EvalScript(js)) => {
                let _ = webview.evaluate_script(&js);
            }
            _ => {}
        }
    });
}
