//! Good News UI layer.
//!
//! Each card region is a retained view model behind a controller. Controllers
//! mutate their own view and render it to escaped HTML; the hosts (console or
//! webview) only ever show what `render()` returns.

pub mod card;
pub mod comments;
pub mod feed;
pub mod happiness;
pub mod like;
pub mod markup;
pub mod notice;
pub mod optimistic;
pub mod report;

#[cfg(feature = "gui")]
pub mod webview_app;
