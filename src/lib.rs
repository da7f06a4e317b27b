//! Good News client, the interactive layer of a positive-news feed.
//!
//! Infinite-scroll paging, optimistic likes, happiness ratings, comment
//! threads with moderation reports, read tracking and a persisted theme.
//! This library crate exposes all modules for the binary and integration tests.

pub mod app;
pub mod ipc_handler;
pub mod platform;
pub mod services;
pub mod types;
pub mod ui;
